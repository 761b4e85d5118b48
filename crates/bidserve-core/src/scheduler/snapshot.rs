//! Read-only views for presentation layers.

use serde::Serialize;
use tokio::time::Instant;

use crate::auction::LedgerSnapshot;
use crate::tenant::{Tenant, TenantId};
use crate::worker::WorkerSnapshot;

use super::progress::PoolStats;
use super::shared::RunState;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TenantSnapshot {
    pub id: TenantId,
    /// Pending job sizes in bytes, ascending.
    pub pending_job_bytes: Vec<u64>,
    pub effective_wait_secs: f64,
    pub last_auction_score: f64,
    pub waiting: bool,
}

impl TenantSnapshot {
    pub(crate) fn of(tenant: &Tenant, now: Instant) -> Self {
        Self {
            id: tenant.id(),
            pending_job_bytes: tenant.pending_jobs().collect(),
            effective_wait_secs: tenant.effective_wait_at(now),
            last_auction_score: tenant.last_auction_score(),
            waiting: tenant.is_waiting(),
        }
    }
}

/// Everything a status view renders, taken in one call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchedulerSnapshot {
    pub run_state: RunState,
    pub complete: bool,
    pub workers: Vec<WorkerSnapshot>,
    pub tenants: Vec<TenantSnapshot>,
    pub ledger: LedgerSnapshot,
    pub stats: PoolStats,
}
