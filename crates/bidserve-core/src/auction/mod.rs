//! Auction: pick the (tenant, job) pair a worker services next.
//!
//! Every tenant with a pending job bids with its smallest job and its
//! effective wait:
//!
//! `score = k * weight / (size + 1) + ln(wait + 1) / k`
//!
//! where `k` is the number of bidders. The first term favors small jobs; the
//! second is a slowly growing anti-starvation bonus. The strictly highest
//! score wins and ties go to the earliest registered tenant.
//!
//! [`run_auction`] scores, selects, and pops in one pass over `&mut` tenants,
//! so callers get exactly-once assignment by holding one lock around it.

mod ledger;

use serde::Serialize;
use tokio::time::Instant;

use crate::tenant::{Tenant, TenantId};

pub use ledger::{AuctionLedger, LedgerSnapshot};

/// Default weight of the small-job term.
pub const DEFAULT_AUCTION_WEIGHT: f64 = 1e9;

/// One tenant's bid: its smallest pending job and its effective wait.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bid {
    pub tenant: TenantId,
    pub head_job: u64,
    pub wait_secs: f64,
}

/// Result of a won auction, handed to the worker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Award {
    pub tenant: TenantId,
    pub job_bytes: u64,
    pub score: f64,
}

/// Score of a bid among `bidders` competing tenants.
pub fn score(bidders: usize, head_job: u64, wait_secs: f64, weight: f64) -> f64 {
    let k = bidders.max(1) as f64;
    let size_term = k * weight / (head_job as f64 + 1.0);
    let wait_term = (wait_secs.max(0.0) + 1.0).ln() / k;
    size_term + wait_term
}

/// Index and score of the winning bid; ties keep the earliest bid.
pub fn pick_winner(bids: &[Bid], weight: f64) -> Option<(usize, f64)> {
    let k = bids.len();
    let mut best: Option<(usize, f64)> = None;
    for (i, bid) in bids.iter().enumerate() {
        let s = score(k, bid.head_job, bid.wait_secs, weight);
        match best {
            Some((_, top)) if s <= top => {}
            _ => best = Some((i, s)),
        }
    }
    best
}

/// Bids of every tenant with a pending job, in registry order.
pub fn collect_bids(tenants: &[Tenant], now: Instant) -> Vec<Bid> {
    tenants
        .iter()
        .filter_map(|t| {
            t.head_job().map(|head_job| Bid {
                tenant: t.id(),
                head_job,
                wait_secs: t.effective_wait_at(now),
            })
        })
        .collect()
}

/// Score all eligible tenants, pick the winner, and pop its smallest job.
///
/// Must run under the registry lock; `ledger` records the round and flags
/// any overlap with another round.
pub(crate) fn run_auction(
    tenants: &mut [Tenant],
    now: Instant,
    weight: f64,
    ledger: &AuctionLedger,
) -> Option<Award> {
    let _round = ledger.enter();

    let bids = collect_bids(tenants, now);
    let Some((winner, score)) = pick_winner(&bids, weight) else {
        ledger.record_idle();
        return None;
    };
    let tenant_id = bids[winner].tenant;

    let tenant = tenants.iter_mut().find(|t| t.id() == tenant_id)?;
    let Some(job_bytes) = tenant.pop_head() else {
        ledger.record_empty_pop();
        tracing::error!(tenant = %tenant_id, "auction winner had no pending job");
        return None;
    };
    ledger.record_removal();
    tenant.record_win(score);
    ledger.record_award();

    tracing::debug!(tenant = %tenant_id, job_bytes, score, bidders = bids.len(), "auction won");
    Some(Award {
        tenant: tenant_id,
        job_bytes,
        score,
    })
}
