//! State shared between the scheduler handle and every worker task.

use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

use crate::auction::{run_auction, AuctionLedger, Award};
use crate::config::SimConfig;
use crate::events::EventLog;
use crate::faults::{TransferError, TransferFaults};
use crate::tenant::{JobSource, Tenant, TenantId};
use crate::worker::WorkerSlot;

/// Global run state of the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    /// Workers not spawned yet.
    NotStarted,
    Running,
    /// Workers spawned but parked.
    Paused,
}

/// Tenants and run state, guarded by the one registry lock.
///
/// Auctions, registration, and start/stop all take this lock, so a tenant
/// is never half-registered relative to a run state change.
#[derive(Debug)]
pub(crate) struct Registry {
    pub(crate) tenants: Vec<Tenant>,
    pub(crate) run_state: RunState,
    next_id: u64,
}

impl Registry {
    fn new() -> Self {
        Self {
            tenants: Vec::new(),
            run_state: RunState::NotStarted,
            next_id: 1,
        }
    }

    /// Append a tenant; it accrues wait time right away if the pool is running.
    pub(crate) fn register(&mut self, jobs: Vec<u64>, now: Instant) -> TenantId {
        let id = TenantId(self.next_id);
        self.next_id += 1;
        let mut tenant = Tenant::new(id, jobs);
        if self.run_state == RunState::Running {
            tenant.start_waiting_at(now);
        }
        self.tenants.push(tenant);
        id
    }
}

pub(crate) struct Shared {
    pub(crate) config: SimConfig,
    registry: Mutex<Registry>,
    pub(crate) ledger: AuctionLedger,
    pub(crate) events: EventLog,
    pub(crate) faults: Arc<dyn TransferFaults>,
    pub(crate) jobs: Arc<dyn JobSource>,
    pub(crate) slots: Vec<Arc<WorkerSlot>>,
}

impl Shared {
    pub(crate) fn new(
        config: SimConfig,
        jobs: Arc<dyn JobSource>,
        faults: Arc<dyn TransferFaults>,
        slots: Vec<Arc<WorkerSlot>>,
    ) -> Self {
        Self {
            config,
            registry: Mutex::new(Registry::new()),
            ledger: AuctionLedger::new(),
            events: EventLog::new(),
            faults,
            jobs,
            slots,
        }
    }

    pub(crate) fn lock_registry(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// One auction round as a single transaction under the registry lock.
    ///
    /// The winning job is recorded on `slot` before the lock is released, so
    /// a job is always either queued or visibly in flight. A stopped slot
    /// does not bid; `stop` sets the flags under this same lock.
    pub(crate) fn assign(&self, slot: &WorkerSlot) -> Option<Award> {
        let mut registry = self.lock_registry();
        if slot.stop_requested() {
            return None;
        }
        let award = run_auction(
            &mut registry.tenants,
            Instant::now(),
            self.config.auction_weight,
            &self.ledger,
        )?;
        slot.begin(&award);
        Some(award)
    }

    /// Log the outcome of `slot`'s transfer and return the slot to Idle.
    ///
    /// Runs under the registry lock so a reader holding it never sees the
    /// job both completed and in flight.
    pub(crate) fn settle(
        &self,
        slot: &WorkerSlot,
        award: &Award,
        outcome: Result<Duration, TransferError>,
    ) {
        let _registry = self.lock_registry();
        match outcome {
            Ok(elapsed) => self.events.record_completed(slot.id(), award, elapsed),
            Err(e) => self
                .events
                .record_failed(slot.id(), award, slot.progress_steps(), &e),
        }
        slot.finish();
    }
}
