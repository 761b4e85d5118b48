//! Workers: win a job at auction, then simulate its transfer in ten steps.
//!
//! Each worker is one tokio task alternating between `Idle` (run the
//! auction) and `Transferring` (tick through progress steps). A set stop
//! flag parks the worker in either state without touching its progress.

mod run;
mod transfer;

use serde::Serialize;
use std::fmt;
use std::sync::{PoisonError, RwLock};

use crate::auction::Award;
use crate::control::StopFlag;
use crate::tenant::TenantId;

pub(crate) use run::run_worker;

/// Number of progress steps per transfer; each is 10% of the job.
pub const PROGRESS_STEPS: u8 = 10;

/// Worker identifier, 0-based position in the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct WorkerId(pub usize);

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Job in flight on a worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transfer {
    pub tenant: TenantId,
    pub job_bytes: u64,
    /// Completed steps in `0..=PROGRESS_STEPS`.
    pub steps: u8,
}

impl Transfer {
    pub fn percent(&self) -> u8 {
        self.steps.min(PROGRESS_STEPS) * (100 / PROGRESS_STEPS)
    }

    /// Bytes covered by the completed steps.
    pub fn bytes_done(&self) -> u64 {
        let steps = u128::from(self.steps.min(PROGRESS_STEPS));
        (u128::from(self.job_bytes) * steps / u128::from(PROGRESS_STEPS)) as u64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkerState {
    #[default]
    Idle,
    Transferring(Transfer),
}

/// Read-only view of a worker for presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkerSnapshot {
    pub id: WorkerId,
    pub busy: bool,
    pub paused: bool,
    pub progress_percent: u8,
    pub current_tenant: Option<TenantId>,
    pub current_job_bytes: Option<u64>,
}

/// A worker's published state and its stop flag.
///
/// Only the worker's own task writes `state`; everyone else reads snapshots.
#[derive(Debug)]
pub struct WorkerSlot {
    id: WorkerId,
    state: RwLock<WorkerState>,
    stop: StopFlag,
}

impl WorkerSlot {
    pub fn new(id: WorkerId, stop: StopFlag) -> Self {
        Self {
            id,
            state: RwLock::new(WorkerState::Idle),
            stop,
        }
    }

    pub fn id(&self) -> WorkerId {
        self.id
    }

    pub fn stop_requested(&self) -> bool {
        self.stop.is_requested()
    }

    pub fn state(&self) -> WorkerState {
        *self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.state(), WorkerState::Transferring(_))
    }

    pub fn progress_steps(&self) -> u8 {
        match self.state() {
            WorkerState::Idle => 0,
            WorkerState::Transferring(t) => t.steps,
        }
    }

    pub fn snapshot(&self) -> WorkerSnapshot {
        let state = self.state();
        let transfer = match state {
            WorkerState::Idle => None,
            WorkerState::Transferring(t) => Some(t),
        };
        WorkerSnapshot {
            id: self.id,
            busy: transfer.is_some(),
            paused: self.stop_requested(),
            progress_percent: transfer.map_or(0, |t| t.percent()),
            current_tenant: transfer.map(|t| t.tenant),
            current_job_bytes: transfer.map(|t| t.job_bytes),
        }
    }

    fn set_state(&self, next: WorkerState) {
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = next;
    }

    /// Idle -> Transferring at step 0.
    pub(crate) fn begin(&self, award: &Award) {
        self.set_state(WorkerState::Transferring(Transfer {
            tenant: award.tenant,
            job_bytes: award.job_bytes,
            steps: 0,
        }));
    }

    pub(crate) fn set_steps(&self, steps: u8) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if let WorkerState::Transferring(t) = &mut *state {
            t.steps = steps.min(PROGRESS_STEPS);
        }
    }

    /// Back to Idle; progress resets with the cleared transfer.
    pub(crate) fn finish(&self) {
        self.set_state(WorkerState::Idle);
    }
}
