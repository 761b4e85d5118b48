//! Shared helpers for bidserve-core integration tests.

#![allow(dead_code)]

use std::time::Duration;

use bidserve_core::config::SimConfig;

/// Config with near-instant transfers and a short poll interval.
///
/// 1 GB/s makes every tick of a job of a few KB round up to the timer's
/// 1 ms granularity.
pub fn fast_config(workers: usize) -> SimConfig {
    SimConfig {
        worker_count: workers,
        transfer_rate_bytes_per_sec: 1_000_000_000,
        poll_interval_ms: 5,
        ..SimConfig::default()
    }
}

/// Polls `done` every millisecond until it returns true; panics after `limit`.
pub async fn wait_until(limit: Duration, mut done: impl FnMut() -> bool) {
    let deadline = tokio::time::Instant::now() + limit;
    while !done() {
        if tokio::time::Instant::now() >= deadline {
            panic!("condition not reached within {limit:?}");
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
}
