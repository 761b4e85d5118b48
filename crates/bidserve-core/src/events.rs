//! Append-only log of finished transfers (completed or abandoned).
//!
//! Entries are also emitted through `tracing`. Renderers poll with
//! [`EventLog::events_since`] and keep their own cursor.

use serde::Serialize;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

use crate::auction::Award;
use crate::faults::TransferError;
use crate::tenant::TenantId;
use crate::worker::WorkerId;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransferEvent {
    Completed {
        /// Seconds since the log was created.
        at_secs: f64,
        worker: WorkerId,
        tenant: TenantId,
        job_bytes: u64,
        /// Wall time of the transfer, pauses included.
        elapsed_secs: f64,
    },
    Failed {
        at_secs: f64,
        worker: WorkerId,
        tenant: TenantId,
        job_bytes: u64,
        /// Steps completed before the fault.
        step: u8,
        error: String,
    },
}

impl TransferEvent {
    pub fn is_completed(&self) -> bool {
        matches!(self, TransferEvent::Completed { .. })
    }

    pub fn tenant(&self) -> TenantId {
        match self {
            TransferEvent::Completed { tenant, .. } | TransferEvent::Failed { tenant, .. } => {
                *tenant
            }
        }
    }

    pub fn job_bytes(&self) -> u64 {
        match self {
            TransferEvent::Completed { job_bytes, .. }
            | TransferEvent::Failed { job_bytes, .. } => *job_bytes,
        }
    }
}

#[derive(Debug)]
pub struct EventLog {
    epoch: Instant,
    entries: Mutex<Vec<TransferEvent>>,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLog {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
            entries: Mutex::new(Vec::new()),
        }
    }

    fn entries(&self) -> MutexGuard<'_, Vec<TransferEvent>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seconds since the log was created.
    pub fn elapsed_secs(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }

    pub fn record_completed(&self, worker: WorkerId, award: &Award, elapsed: Duration) {
        tracing::info!(
            worker = %worker,
            tenant = %award.tenant,
            job_bytes = award.job_bytes,
            elapsed_secs = elapsed.as_secs_f64(),
            "transfer completed"
        );
        let event = TransferEvent::Completed {
            at_secs: self.elapsed_secs(),
            worker,
            tenant: award.tenant,
            job_bytes: award.job_bytes,
            elapsed_secs: elapsed.as_secs_f64(),
        };
        self.entries().push(event);
    }

    pub fn record_failed(&self, worker: WorkerId, award: &Award, step: u8, err: &TransferError) {
        tracing::warn!(
            worker = %worker,
            tenant = %award.tenant,
            job_bytes = award.job_bytes,
            step,
            "transfer abandoned: {}",
            err
        );
        let event = TransferEvent::Failed {
            at_secs: self.elapsed_secs(),
            worker,
            tenant: award.tenant,
            job_bytes: award.job_bytes,
            step,
            error: err.to_string(),
        };
        self.entries().push(event);
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    pub fn events(&self) -> Vec<TransferEvent> {
        self.entries().clone()
    }

    /// Entries from index `cursor` on, plus the cursor for the next call.
    pub fn events_since(&self, cursor: usize) -> (Vec<TransferEvent>, usize) {
        let entries = self.entries();
        let start = cursor.min(entries.len());
        (entries[start..].to_vec(), entries.len())
    }

    pub fn completed_count(&self) -> usize {
        self.entries().iter().filter(|e| e.is_completed()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.entries().iter().filter(|e| !e.is_completed()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn award(tenant: u64, job_bytes: u64) -> Award {
        Award {
            tenant: TenantId(tenant),
            job_bytes,
            score: 0.5,
        }
    }

    #[test]
    fn records_both_outcomes_in_order() {
        let log = EventLog::new();
        assert!(log.is_empty());
        log.record_completed(WorkerId(0), &award(1, 100), Duration::from_secs(2));
        let err = TransferError::Fault {
            step: 3,
            reason: "boom".into(),
        };
        log.record_failed(WorkerId(1), &award(2, 200), 3, &err);

        let events = log.events();
        assert_eq!(events.len(), 2);
        assert!(events[0].is_completed());
        assert_eq!(events[1].tenant(), TenantId(2));
        assert_eq!(events[1].job_bytes(), 200);
        assert_eq!(log.completed_count(), 1);
        assert_eq!(log.failed_count(), 1);
        match &events[1] {
            TransferEvent::Failed { step, error, .. } => {
                assert_eq!(*step, 3);
                assert!(error.contains("boom"));
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[test]
    fn events_since_advances_cursor() {
        let log = EventLog::new();
        log.record_completed(WorkerId(0), &award(1, 1), Duration::ZERO);
        let (first, cursor) = log.events_since(0);
        assert_eq!(first.len(), 1);
        let (none, same) = log.events_since(cursor);
        assert!(none.is_empty());
        assert_eq!(same, cursor);
        log.record_completed(WorkerId(0), &award(1, 2), Duration::ZERO);
        let (next, cursor) = log.events_since(cursor);
        assert_eq!(next.len(), 1);
        assert_eq!(next[0].job_bytes(), 2);
        assert_eq!(cursor, 2);
        assert!(log.events_since(99).0.is_empty());
    }

    #[test]
    fn serializes_with_kind_tag() {
        let log = EventLog::new();
        log.record_completed(WorkerId(3), &award(9, 10), Duration::ZERO);
        let json = serde_json::to_value(&log.events()[0]).unwrap();
        assert_eq!(json["kind"], "completed");
        assert_eq!(json["worker"], 3);
        assert_eq!(json["tenant"], 9);
    }
}
