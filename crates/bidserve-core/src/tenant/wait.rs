//! Wait-time accounting that survives pause intervals.

use std::time::Duration;
use tokio::time::Instant;

/// Accumulated wait plus the start of the current running segment.
///
/// Effective wait is `accumulated + (now - segment_start)` while accruing and
/// `accumulated` otherwise, so time spent paused never counts.
#[derive(Debug, Clone, Copy, Default)]
pub struct WaitClock {
    accumulated: Duration,
    segment_start: Option<Instant>,
}

impl WaitClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_accruing(&self) -> bool {
        self.segment_start.is_some()
    }

    /// Begin a running segment at `now`. No-op if already accruing.
    pub fn start_at(&mut self, now: Instant) {
        if self.segment_start.is_none() {
            self.segment_start = Some(now);
        }
    }

    /// Fold the running segment into the accumulator. No-op if not accruing.
    pub fn stop_at(&mut self, now: Instant) {
        if let Some(start) = self.segment_start.take() {
            self.accumulated += now.saturating_duration_since(start);
        }
    }

    pub fn effective_at(&self, now: Instant) -> Duration {
        match self.segment_start {
            Some(start) => self.accumulated + now.saturating_duration_since(start),
            None => self.accumulated,
        }
    }
}
