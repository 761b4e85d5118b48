//! Pool-wide progress (bytes done, rate, ETA).
//!
//! Consumers can compute rate = bytes_done / elapsed_secs and
//! ETA = (total_bytes - bytes_done) / rate, as with a single download.

use serde::Serialize;

/// Snapshot of transfer progress across the whole pool.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PoolStats {
    pub jobs_completed: usize,
    /// Jobs abandoned after a transfer fault.
    pub jobs_failed: usize,
    pub jobs_in_flight: usize,
    pub jobs_pending: usize,
    /// Bytes of completed jobs plus finished steps of in-flight jobs.
    pub bytes_done: u64,
    /// `bytes_done` plus everything still in flight or queued (abandoned jobs excluded).
    pub total_bytes: u64,
    /// Seconds since the scheduler was created.
    pub elapsed_secs: f64,
}

impl PoolStats {
    /// Aggregate transfer rate in bytes per second (0 if elapsed is 0).
    pub fn bytes_per_sec(&self) -> f64 {
        if self.elapsed_secs <= 0.0 {
            return 0.0;
        }
        self.bytes_done as f64 / self.elapsed_secs
    }

    /// Estimated seconds remaining (None if rate is 0 and work remains).
    pub fn eta_secs(&self) -> Option<f64> {
        let remaining = self.total_bytes.saturating_sub(self.bytes_done);
        if remaining == 0 {
            return Some(0.0);
        }
        let rate = self.bytes_per_sec();
        if rate <= 0.0 {
            return None;
        }
        Some(remaining as f64 / rate)
    }

    /// Fraction complete in [0.0, 1.0].
    pub fn fraction(&self) -> f64 {
        if self.total_bytes == 0 {
            return 1.0;
        }
        (self.bytes_done as f64 / self.total_bytes as f64).min(1.0)
    }
}
