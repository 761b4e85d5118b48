//! bidserve core: tenants compete in per-cycle auctions for a fixed pool of
//! simulated transfer workers.

pub mod config;
pub mod logging;

pub mod auction;
pub mod control;
pub mod events;
pub mod faults;
pub mod scheduler;
pub mod tenant;
pub mod worker;

pub use auction::{score, Award, Bid};
pub use config::SimConfig;
pub use scheduler::{RunState, Scheduler, SchedulerError, SchedulerSnapshot, TenantSnapshot};
pub use tenant::TenantId;
pub use worker::{WorkerId, WorkerSnapshot};
