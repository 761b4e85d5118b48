//! Scheduler: tenant registry plus a fixed pool of auction-driven workers.
//!
//! The scheduler is the single owner of all shared state. Workers get an
//! `Arc` of it when they are spawned on the first `start`; later `stop` and
//! `start` calls only flip their stop flags, so a paused transfer resumes
//! from the step it reached.

mod error;
mod progress;
mod shared;
mod snapshot;

use std::sync::{Arc, Mutex, PoisonError};
use tokio::task::JoinSet;
use tokio::time::Instant;

use crate::auction::LedgerSnapshot;
use crate::config::SimConfig;
use crate::control::PoolControl;
use crate::events::EventLog;
use crate::faults::{NoFaults, RandomFaults, TransferFaults};
use crate::tenant::{JobSource, RandomJobs, TenantId};
use crate::worker::{run_worker, WorkerSlot, WorkerSnapshot, WorkerState, WorkerId};

pub use error::SchedulerError;
pub use progress::PoolStats;
pub use shared::RunState;
pub use snapshot::{SchedulerSnapshot, TenantSnapshot};

pub(crate) use shared::Shared;

pub struct Scheduler {
    shared: Arc<Shared>,
    control: PoolControl,
    /// Worker tasks; dropping the set aborts them.
    tasks: Mutex<JoinSet<()>>,
}

impl Scheduler {
    /// Scheduler with random initial jobs and faults per `config`.
    pub fn new(config: SimConfig) -> Self {
        let jobs: Arc<dyn JobSource> = Arc::new(RandomJobs::new(config.job_gen()));
        let rate = config.failure_rate();
        let faults: Arc<dyn TransferFaults> = if rate > 0.0 {
            Arc::new(RandomFaults::new(rate))
        } else {
            Arc::new(NoFaults)
        };
        Self::with_parts(config, jobs, faults)
    }

    /// Scheduler with explicit job source and fault injection.
    pub fn with_parts(
        config: SimConfig,
        jobs: Arc<dyn JobSource>,
        faults: Arc<dyn TransferFaults>,
    ) -> Self {
        let control = PoolControl::new(config.worker_count.max(1));
        let slots = control
            .flags()
            .enumerate()
            .map(|(i, flag)| Arc::new(WorkerSlot::new(WorkerId(i), flag.clone())))
            .collect();
        Self {
            shared: Arc::new(Shared::new(config, jobs, faults, slots)),
            control,
            tasks: Mutex::new(JoinSet::new()),
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.shared.config
    }

    pub fn worker_count(&self) -> usize {
        self.shared.slots.len()
    }

    pub fn run_state(&self) -> RunState {
        self.shared.lock_registry().run_state
    }

    /// Run (or resume) the pool; every tenant starts accruing wait time.
    ///
    /// The first call spawns the workers on the current tokio runtime.
    pub fn start(&self) -> Result<(), SchedulerError> {
        let mut registry = self.shared.lock_registry();
        match registry.run_state {
            RunState::NotStarted => self.spawn_workers()?,
            RunState::Paused => self.control.clear_all(),
            RunState::Running => {}
        }
        registry.run_state = RunState::Running;

        let now = Instant::now();
        for tenant in &mut registry.tenants {
            tenant.start_waiting_at(now);
        }
        tracing::info!(
            workers = self.worker_count(),
            tenants = registry.tenants.len(),
            "scheduler running"
        );
        Ok(())
    }

    fn spawn_workers(&self) -> Result<(), SchedulerError> {
        let handle =
            tokio::runtime::Handle::try_current().map_err(|_| SchedulerError::NoRuntime)?;
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        for slot in &self.shared.slots {
            tasks.spawn_on(
                run_worker(Arc::clone(slot), Arc::clone(&self.shared)),
                &handle,
            );
        }
        Ok(())
    }

    /// Park every worker after its current sleep and freeze tenant wait times.
    /// No-op before the first `start`.
    pub fn stop(&self) {
        let mut registry = self.shared.lock_registry();
        if registry.run_state == RunState::NotStarted {
            return;
        }
        self.control.request_stop_all();
        let now = Instant::now();
        for tenant in &mut registry.tenants {
            tenant.stop_waiting_at(now);
        }
        registry.run_state = RunState::Paused;
        tracing::info!("scheduler paused");
    }

    /// Register a tenant with jobs from the configured job source.
    pub fn add_tenant(&self) -> TenantId {
        let jobs = self.shared.jobs.initial_jobs();
        self.add_tenant_with_jobs(jobs)
    }

    /// Register a tenant with the given job sizes (sorted on insertion).
    pub fn add_tenant_with_jobs(&self, jobs: Vec<u64>) -> TenantId {
        let job_count = jobs.len();
        let id = self
            .shared
            .lock_registry()
            .register(jobs, Instant::now());
        tracing::debug!(tenant = %id, jobs = job_count, "tenant added");
        id
    }

    /// True iff no tenant has a pending job.
    pub fn is_complete(&self) -> bool {
        self.shared
            .lock_registry()
            .tenants
            .iter()
            .all(|t| !t.has_pending())
    }

    /// Complete and no transfer in flight.
    pub fn is_drained(&self) -> bool {
        self.is_complete() && self.shared.slots.iter().all(|s| !s.is_busy())
    }

    pub fn worker_snapshots(&self) -> Vec<WorkerSnapshot> {
        self.shared.slots.iter().map(|s| s.snapshot()).collect()
    }

    pub fn tenant_snapshots(&self) -> Vec<TenantSnapshot> {
        let now = Instant::now();
        self.shared
            .lock_registry()
            .tenants
            .iter()
            .map(|t| TenantSnapshot::of(t, now))
            .collect()
    }

    pub fn tenant_snapshot(&self, id: TenantId) -> Option<TenantSnapshot> {
        let now = Instant::now();
        self.shared
            .lock_registry()
            .tenants
            .iter()
            .find(|t| t.id() == id)
            .map(|t| TenantSnapshot::of(t, now))
    }

    pub fn events(&self) -> &EventLog {
        &self.shared.events
    }

    pub fn ledger(&self) -> LedgerSnapshot {
        self.shared.ledger.snapshot()
    }

    /// Pool-wide totals. Taken under the registry lock, which every job
    /// transition (queued, in flight, finished) also holds.
    pub fn stats(&self) -> PoolStats {
        let registry = self.shared.lock_registry();
        let (jobs_pending, bytes_pending) =
            registry.tenants.iter().fold((0usize, 0u64), |(n, b), t| {
                (n + t.pending_count(), b + t.pending_jobs().sum::<u64>())
            });

        let mut jobs_in_flight = 0;
        let mut in_flight_done = 0u64;
        let mut in_flight_total = 0u64;
        for slot in &self.shared.slots {
            if let WorkerState::Transferring(t) = slot.state() {
                jobs_in_flight += 1;
                in_flight_done += t.bytes_done();
                in_flight_total += t.job_bytes;
            }
        }

        let events = self.shared.events.events();
        drop(registry);

        let (jobs_completed, completed_bytes) = events
            .iter()
            .filter(|e| e.is_completed())
            .fold((0usize, 0u64), |(n, b), e| (n + 1, b + e.job_bytes()));
        let jobs_failed = events.len() - jobs_completed;

        let bytes_done = completed_bytes + in_flight_done;
        PoolStats {
            jobs_completed,
            jobs_failed,
            jobs_in_flight,
            jobs_pending,
            bytes_done,
            total_bytes: completed_bytes + in_flight_total + bytes_pending,
            elapsed_secs: self.shared.events.elapsed_secs(),
        }
    }

    pub fn snapshot(&self) -> SchedulerSnapshot {
        SchedulerSnapshot {
            run_state: self.run_state(),
            complete: self.is_complete(),
            workers: self.worker_snapshots(),
            tenants: self.tenant_snapshots(),
            ledger: self.ledger(),
            stats: self.stats(),
        }
    }
}
