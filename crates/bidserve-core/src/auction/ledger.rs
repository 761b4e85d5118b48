//! Counters over auction rounds, used to check exactly-once assignment.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Running totals of auction rounds. `overlaps` counts rounds that began
/// while another round was still in progress and must stay 0.
#[derive(Debug, Default)]
pub struct AuctionLedger {
    rounds: AtomicU64,
    awards: AtomicU64,
    idle_rounds: AtomicU64,
    jobs_removed: AtomicU64,
    empty_pops: AtomicU64,
    overlaps: AtomicU64,
    in_round: AtomicUsize,
}

/// Point-in-time copy of the ledger counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LedgerSnapshot {
    pub rounds: u64,
    pub awards: u64,
    pub idle_rounds: u64,
    pub jobs_removed: u64,
    pub empty_pops: u64,
    pub overlaps: u64,
}

/// Marks the end of a round when dropped.
pub(crate) struct RoundGuard<'a> {
    ledger: &'a AuctionLedger,
}

impl Drop for RoundGuard<'_> {
    fn drop(&mut self) {
        self.ledger.in_round.fetch_sub(1, Ordering::AcqRel);
    }
}

impl AuctionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn enter(&self) -> RoundGuard<'_> {
        if self.in_round.fetch_add(1, Ordering::AcqRel) > 0 {
            self.overlaps.fetch_add(1, Ordering::Relaxed);
        }
        self.rounds.fetch_add(1, Ordering::Relaxed);
        RoundGuard { ledger: self }
    }

    pub(crate) fn record_idle(&self) {
        self.idle_rounds.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_removal(&self) {
        self.jobs_removed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_award(&self) {
        self.awards.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_empty_pop(&self) {
        self.empty_pops.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            rounds: self.rounds.load(Ordering::Relaxed),
            awards: self.awards.load(Ordering::Relaxed),
            idle_rounds: self.idle_rounds.load(Ordering::Relaxed),
            jobs_removed: self.jobs_removed.load(Ordering::Relaxed),
            empty_pops: self.empty_pops.load(Ordering::Relaxed),
            overlaps: self.overlaps.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_round_counts_as_overlap() {
        let ledger = AuctionLedger::new();
        {
            let _a = ledger.enter();
            let _b = ledger.enter();
        }
        let _c = ledger.enter();
        let snap = ledger.snapshot();
        assert_eq!(snap.rounds, 3);
        assert_eq!(snap.overlaps, 1);
    }

    #[test]
    fn sequential_rounds_do_not_overlap() {
        let ledger = AuctionLedger::new();
        for _ in 0..5 {
            let _round = ledger.enter();
            ledger.record_idle();
        }
        let snap = ledger.snapshot();
        assert_eq!(snap.rounds, 5);
        assert_eq!(snap.idle_rounds, 5);
        assert_eq!(snap.overlaps, 0);
    }
}
