//! Tenants: a pending job queue (smallest first) and wait-time accounting.
//!
//! The queue is only read and popped by the auction while the registry lock
//! is held; nothing else mutates it after registration.

mod jobs;
mod wait;

use std::collections::VecDeque;
use std::fmt;
use tokio::time::Instant;

pub use jobs::{FixedJobs, JobSource, RandomJobs};
pub use wait::WaitClock;

/// Tenant identifier, assigned in registration order starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(transparent)]
pub struct TenantId(pub u64);

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Tenant {
    id: TenantId,
    pending: VecDeque<u64>,
    wait: WaitClock,
    last_auction_score: f64,
}

impl Tenant {
    /// New tenant with `jobs` sorted ascending. Not accruing wait time yet.
    pub fn new(id: TenantId, mut jobs: Vec<u64>) -> Self {
        jobs.sort_unstable();
        Self {
            id,
            pending: jobs.into(),
            wait: WaitClock::new(),
            last_auction_score: 0.0,
        }
    }

    pub fn id(&self) -> TenantId {
        self.id
    }

    /// Pending job sizes in bytes, ascending.
    pub fn pending_jobs(&self) -> impl ExactSizeIterator<Item = u64> + '_ {
        self.pending.iter().copied()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn last_auction_score(&self) -> f64 {
        self.last_auction_score
    }

    pub fn is_waiting(&self) -> bool {
        self.wait.is_accruing()
    }

    pub fn start_waiting(&mut self) {
        self.start_waiting_at(Instant::now());
    }

    pub fn start_waiting_at(&mut self, now: Instant) {
        self.wait.start_at(now);
    }

    pub fn stop_waiting(&mut self) {
        self.stop_waiting_at(Instant::now());
    }

    pub fn stop_waiting_at(&mut self, now: Instant) {
        self.wait.stop_at(now);
    }

    /// Seconds spent waiting while the simulation was running.
    pub fn effective_wait(&self) -> f64 {
        self.effective_wait_at(Instant::now())
    }

    pub fn effective_wait_at(&self, now: Instant) -> f64 {
        self.wait.effective_at(now).as_secs_f64()
    }

    pub(crate) fn head_job(&self) -> Option<u64> {
        self.pending.front().copied()
    }

    pub(crate) fn pop_head(&mut self) -> Option<u64> {
        self.pending.pop_front()
    }

    pub(crate) fn record_win(&mut self, score: f64) {
        self.last_auction_score = score;
    }
}
