//! Plain-text status table for `run` and `console`.
//!
//! One line per worker ("idle" or "NN%, tenant T"), one line per tenant
//! (job count, sizes in MB, wait, last auction score), refreshed by the
//! caller on a fixed interval.

use bidserve_core::events::{EventLog, TransferEvent};
use bidserve_core::scheduler::PoolStats;
use bidserve_core::{RunState, SchedulerSnapshot, TenantSnapshot, WorkerSnapshot};
use std::fmt::Write;

/// Decimal megabytes, truncated (job sizes are generated in 10^6-byte units).
fn mb(bytes: u64) -> u64 {
    bytes / 1_000_000
}

fn run_state_label(state: RunState) -> &'static str {
    match state {
        RunState::NotStarted => "not started",
        RunState::Running => "running",
        RunState::Paused => "paused",
    }
}

pub fn worker_line(w: &WorkerSnapshot) -> String {
    let mut line = format!("Worker {}: ", w.id);
    match w.current_tenant {
        Some(tenant) if w.busy => {
            let _ = write!(line, "{}%, tenant {}", w.progress_percent, tenant);
        }
        _ => line.push_str("idle"),
    }
    if w.paused {
        line.push_str(" (paused)");
    }
    line
}

pub fn tenant_line(t: &TenantSnapshot) -> String {
    let sizes = t
        .pending_job_bytes
        .iter()
        .map(|b| format!("{}MB", mb(*b)))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Tenant {}: {} jobs [{}], wait {:.2} s, last score {:.2}",
        t.id,
        t.pending_job_bytes.len(),
        sizes,
        t.effective_wait_secs,
        t.last_auction_score
    )
}

pub fn stats_line(state: RunState, stats: &PoolStats) -> String {
    let eta = stats
        .eta_secs()
        .map(|s| format!("{:.0}s", s))
        .unwrap_or_else(|| "?".to_string());
    format!(
        "[{}] {} done, {} failed, {} in flight, {} queued  {} / {} MB ({:.1}%)  ETA {}",
        run_state_label(state),
        stats.jobs_completed,
        stats.jobs_failed,
        stats.jobs_in_flight,
        stats.jobs_pending,
        mb(stats.bytes_done),
        mb(stats.total_bytes),
        stats.fraction() * 100.0,
        eta
    )
}

pub fn status_table(snap: &SchedulerSnapshot) -> String {
    let mut out = stats_line(snap.run_state, &snap.stats);
    out.push('\n');
    for w in &snap.workers {
        out.push_str(&worker_line(w));
        out.push('\n');
    }
    if snap.tenants.is_empty() {
        out.push_str("No tenants.\n");
    }
    for t in &snap.tenants {
        out.push_str(&tenant_line(t));
        out.push('\n');
    }
    out
}

pub fn event_line(event: &TransferEvent) -> String {
    match event {
        TransferEvent::Completed {
            at_secs,
            worker,
            tenant,
            job_bytes,
            elapsed_secs,
        } => format!(
            "{:>8.2}s  worker {} finished {}MB for tenant {} in {:.2} s",
            at_secs,
            worker,
            mb(*job_bytes),
            tenant,
            elapsed_secs
        ),
        TransferEvent::Failed {
            at_secs,
            worker,
            tenant,
            job_bytes,
            error,
            ..
        } => format!(
            "{:>8.2}s  worker {} abandoned {}MB for tenant {}: {}",
            at_secs,
            worker,
            mb(*job_bytes),
            tenant,
            error
        ),
    }
}

/// Running totals of the event log, e.g. "3 completed, 1 abandoned".
pub fn event_totals(log: &EventLog) -> String {
    format!(
        "{} completed, {} abandoned",
        log.completed_count(),
        log.failed_count()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use bidserve_core::{Award, TenantId, WorkerId};
    use bidserve_core::faults::TransferError;
    use std::time::Duration;

    fn worker(busy: bool, paused: bool) -> WorkerSnapshot {
        WorkerSnapshot {
            id: WorkerId(2),
            busy,
            paused,
            progress_percent: if busy { 40 } else { 0 },
            current_tenant: busy.then_some(TenantId(7)),
            current_job_bytes: busy.then_some(12_000_000),
        }
    }

    #[test]
    fn worker_lines() {
        assert_eq!(worker_line(&worker(false, false)), "Worker 2: idle");
        assert_eq!(worker_line(&worker(true, false)), "Worker 2: 40%, tenant 7");
        assert_eq!(
            worker_line(&worker(true, true)),
            "Worker 2: 40%, tenant 7 (paused)"
        );
    }

    #[test]
    fn tenant_line_lists_sizes_in_mb() {
        let t = TenantSnapshot {
            id: TenantId(1),
            pending_job_bytes: vec![1_500_000, 300_000_000],
            effective_wait_secs: 4.2,
            last_auction_score: 200.0,
            waiting: true,
        };
        assert_eq!(
            tenant_line(&t),
            "Tenant 1: 2 jobs [1MB, 300MB], wait 4.20 s, last score 200.00"
        );
    }

    #[test]
    fn stats_line_shows_progress() {
        let stats = PoolStats {
            jobs_completed: 1,
            jobs_in_flight: 1,
            bytes_done: 50_000_000,
            total_bytes: 200_000_000,
            elapsed_secs: 2.0,
            ..PoolStats::default()
        };
        let line = stats_line(RunState::Running, &stats);
        assert!(line.starts_with("[running] 1 done, 0 failed, 1 in flight, 0 queued"));
        assert!(line.contains("50 / 200 MB (25.0%)"));
        assert!(line.ends_with("ETA 6s"));
    }

    #[test]
    fn failed_event_shows_reason() {
        let event = TransferEvent::Failed {
            at_secs: 1.0,
            worker: WorkerId(0),
            tenant: TenantId(3),
            job_bytes: 5_000_000,
            step: 4,
            error: "transfer fault at step 4/10: disk".into(),
        };
        let line = event_line(&event);
        assert!(line.contains("worker 0 abandoned 5MB for tenant 3"));
        assert!(line.ends_with("disk"));
    }

    #[test]
    fn event_totals_count_both_outcomes() {
        let log = EventLog::new();
        assert_eq!(event_totals(&log), "0 completed, 0 abandoned");
        let award = Award {
            tenant: TenantId(1),
            job_bytes: 1_000_000,
            score: 1.0,
        };
        log.record_completed(WorkerId(0), &award, Duration::from_secs(1));
        log.record_completed(WorkerId(1), &award, Duration::from_secs(1));
        let err = TransferError::Fault {
            step: 2,
            reason: "link".into(),
        };
        log.record_failed(WorkerId(0), &award, 2, &err);
        assert_eq!(event_totals(&log), "2 completed, 1 abandoned");
    }
}
