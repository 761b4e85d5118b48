//! Simulated transfer: ten timed progress steps, parked while stopped.

use std::time::Duration;

use crate::auction::Award;
use crate::faults::{TransferError, TransferFaults};

use super::{WorkerSlot, PROGRESS_STEPS};

/// Ticks the slot's current transfer from its recorded step to completion.
///
/// Each tick sleeps `tick` then advances one step. While the stop flag is set
/// no step is taken and no time is charged; the flag is re-checked every
/// `poll`. A fault from `faults` ends the transfer early with the step count
/// left as it was.
pub(super) async fn simulate_transfer(
    slot: &WorkerSlot,
    award: &Award,
    tick: Duration,
    poll: Duration,
    faults: &dyn TransferFaults,
) -> Result<(), TransferError> {
    let mut steps = slot.progress_steps();
    while steps < PROGRESS_STEPS {
        if slot.stop_requested() {
            tokio::time::sleep(poll).await;
            continue;
        }
        faults.check(slot.id(), award, steps)?;
        tokio::time::sleep(tick).await;
        steps += 1;
        slot.set_steps(steps);
    }
    Ok(())
}
