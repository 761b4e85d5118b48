//! CLI command handlers. Each command is in its own file.

mod completions;
mod config;
mod console;
mod run;
mod score;

use bidserve_core::config::SimConfig;
use bidserve_core::Scheduler;

pub use completions::{run_completions, run_man};
pub use config::run_config;
pub use console::run_console;
pub use run::{run_simulation, RunOptions};
pub use score::run_score;

/// Scheduler for `cfg` with an optional pool size override and `tenants`
/// tenants already registered.
fn build_scheduler(mut cfg: SimConfig, workers: Option<usize>, tenants: usize) -> Scheduler {
    if let Some(n) = workers {
        cfg.worker_count = n;
    }
    let scheduler = Scheduler::new(cfg);
    for _ in 0..tenants {
        scheduler.add_tenant();
    }
    scheduler
}
