//! `bidserve run` – headless simulation with a periodic status table.

use anyhow::{Context, Result};
use bidserve_core::config::SimConfig;
use bidserve_core::Scheduler;
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};

use super::build_scheduler;
use crate::cli::render;

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub workers: Option<usize>,
    pub tenants: usize,
    pub seconds: Option<u64>,
    pub until_complete: bool,
    pub refresh_ms: u64,
    pub json: bool,
}

impl RunOptions {
    /// Without a time limit the run always ends once the pool drains.
    pub fn stops_when_drained(&self) -> bool {
        self.until_complete || self.seconds.is_none()
    }

    pub fn refresh(&self) -> Duration {
        Duration::from_millis(self.refresh_ms.max(10))
    }
}

/// Print events recorded since `cursor` and the current status; returns the new cursor.
fn print_update(scheduler: &Scheduler, cursor: usize, json: bool) -> Result<usize> {
    let snapshot = scheduler.snapshot();
    if json {
        let line = serde_json::to_string(&snapshot).context("serialize snapshot")?;
        println!("{}", line);
        return Ok(cursor);
    }
    let (events, next) = scheduler.events().events_since(cursor);
    for event in &events {
        println!("{}", render::event_line(event));
    }
    print!("{}", render::status_table(&snapshot));
    println!();
    Ok(next)
}

pub async fn run_simulation(cfg: SimConfig, opts: &RunOptions) -> Result<()> {
    let scheduler = build_scheduler(cfg, opts.workers, opts.tenants);
    scheduler.start().context("start worker pool")?;
    tracing::info!(
        workers = scheduler.worker_count(),
        tenants = opts.tenants,
        "simulation started"
    );

    let deadline = opts.seconds.map(|s| Instant::now() + Duration::from_secs(s));
    let mut ticker = tokio::time::interval(opts.refresh());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut cursor = 0;
    loop {
        ticker.tick().await;
        cursor = print_update(&scheduler, cursor, opts.json)?;
        if opts.stops_when_drained() && scheduler.is_drained() {
            break;
        }
        if deadline.is_some_and(|d| Instant::now() >= d) {
            break;
        }
    }
    scheduler.stop();

    let stats = scheduler.stats();
    tracing::info!(
        completed = stats.jobs_completed,
        failed = stats.jobs_failed,
        bytes = stats.bytes_done,
        "simulation finished"
    );
    if !opts.json {
        println!(
            "Transferred {} job(s), {} MB in {:.1} s ({} abandoned, {} still queued).",
            stats.jobs_completed,
            stats.bytes_done / 1_000_000,
            stats.elapsed_secs,
            stats.jobs_failed,
            stats.jobs_pending + stats.jobs_in_flight
        );
    }
    Ok(())
}
