//! Worker task loop.

use std::sync::Arc;
use tokio::time::Instant;

use crate::scheduler::Shared;

use super::transfer::simulate_transfer;
use super::WorkerSlot;

/// Runs one worker until its task is aborted.
///
/// Idle: park while stopped, otherwise bid; an empty auction waits one poll
/// interval. Transferring: tick to completion (or fault), record the outcome
/// in the event log, and go back to Idle.
pub(crate) async fn run_worker(slot: Arc<WorkerSlot>, shared: Arc<Shared>) {
    let id = slot.id();
    let poll = shared.config.poll_interval();
    tracing::debug!(worker = %id, "worker started");

    let mut parked = false;
    loop {
        if slot.stop_requested() {
            if !parked {
                tracing::debug!(worker = %id, "worker parked");
                parked = true;
            }
            tokio::time::sleep(poll).await;
            continue;
        }
        if parked {
            tracing::debug!(worker = %id, "worker resumed");
            parked = false;
        }

        let Some(award) = shared.assign(&slot) else {
            tokio::time::sleep(poll).await;
            continue;
        };

        let started = Instant::now();
        let tick = shared.config.tick_duration(award.job_bytes);
        let outcome = simulate_transfer(&slot, &award, tick, poll, shared.faults.as_ref())
            .await
            .map(|()| started.elapsed());
        shared.settle(&slot, &award, outcome);
    }
}
