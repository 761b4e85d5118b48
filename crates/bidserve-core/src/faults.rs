//! Fault injection for simulated transfers.

use rand::Rng;

use crate::auction::Award;
use crate::worker::WorkerId;

/// A simulated transfer failed; the job is abandoned, not requeued.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransferError {
    #[error("transfer fault at step {step}/10: {reason}")]
    Fault { step: u8, reason: String },
}

/// Decides whether the next progress tick of a transfer faults.
/// Called before every tick with the number of steps already completed.
pub trait TransferFaults: Send + Sync {
    fn check(&self, worker: WorkerId, award: &Award, step: u8) -> Result<(), TransferError>;
}

/// Transfers never fail.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFaults;

impl TransferFaults for NoFaults {
    fn check(&self, _worker: WorkerId, _award: &Award, _step: u8) -> Result<(), TransferError> {
        Ok(())
    }
}

/// Each tick faults independently with probability `rate`.
#[derive(Debug, Clone, Copy)]
pub struct RandomFaults {
    rate: f64,
}

impl RandomFaults {
    pub fn new(rate: f64) -> Self {
        let rate = if rate.is_nan() { 0.0 } else { rate.clamp(0.0, 1.0) };
        Self { rate }
    }
}

impl TransferFaults for RandomFaults {
    fn check(&self, _worker: WorkerId, _award: &Award, step: u8) -> Result<(), TransferError> {
        if rand::rng().random_bool(self.rate) {
            return Err(TransferError::Fault {
                step,
                reason: "simulated link failure".to_string(),
            });
        }
        Ok(())
    }
}
