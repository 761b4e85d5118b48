//! Integration test: many workers racing for many tenants on a multi-thread
//! runtime, with stop/start cycles mid-run. Every job must be transferred
//! exactly once.

mod common;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use bidserve_core::faults::NoFaults;
use bidserve_core::tenant::FixedJobs;
use bidserve_core::{RunState, Scheduler, TenantId};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn every_job_is_served_exactly_once_across_pauses() {
    let s = Scheduler::with_parts(
        common::fast_config(8),
        Arc::new(FixedJobs::default()),
        Arc::new(NoFaults),
    );

    let mut expected: BTreeMap<(TenantId, u64), usize> = BTreeMap::new();
    let mut total = 0;
    for t in 0..20u64 {
        let jobs: Vec<u64> = (0..10u64).map(|j| 1_000 + (j * 311 + t * 97) % 4_000).collect();
        total += jobs.len();
        let id = s.add_tenant_with_jobs(jobs.clone());
        for j in jobs {
            *expected.entry((id, j)).or_default() += 1;
        }
    }

    s.start().unwrap();
    // Tenants registered while running join the same auctions.
    for t in 0..20u64 {
        let jobs: Vec<u64> = (0..10u64).map(|j| 2_000 + (j * 53 + t * 7) % 3_000).collect();
        total += jobs.len();
        let id = s.add_tenant_with_jobs(jobs.clone());
        for j in jobs {
            *expected.entry((id, j)).or_default() += 1;
        }
    }

    for _ in 0..3 {
        tokio::time::sleep(Duration::from_millis(20)).await;
        s.stop();
        assert_eq!(s.run_state(), RunState::Paused);
        tokio::time::sleep(Duration::from_millis(15)).await;
        s.start().unwrap();
    }

    common::wait_until(Duration::from_secs(60), || s.events().len() == total).await;
    assert!(s.is_drained());

    let mut served: BTreeMap<(TenantId, u64), usize> = BTreeMap::new();
    for event in s.events().events() {
        assert!(event.is_completed(), "unexpected {event:?}");
        *served.entry((event.tenant(), event.job_bytes())).or_default() += 1;
    }
    assert_eq!(served, expected);

    let ledger = s.ledger();
    assert_eq!(ledger.awards as usize, total);
    assert_eq!(ledger.jobs_removed as usize, total);
    assert_eq!(ledger.overlaps, 0);
    assert_eq!(ledger.empty_pops, 0);

    let stats = s.stats();
    assert_eq!(stats.jobs_completed, total);
    assert_eq!(stats.jobs_in_flight, 0);
    assert_eq!(stats.jobs_pending, 0);
    assert_eq!(stats.bytes_done, stats.total_bytes);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn stats_never_count_a_job_twice() {
    let s = Arc::new(Scheduler::with_parts(
        common::fast_config(8),
        Arc::new(FixedJobs::default()),
        Arc::new(NoFaults),
    ));
    let mut total_jobs = 0;
    let mut total_bytes = 0u64;
    for t in 0..16u64 {
        let jobs: Vec<u64> = (0..12u64).map(|j| 1_001 + (j * 131 + t * 17) % 3_000).collect();
        total_jobs += jobs.len();
        total_bytes += jobs.iter().sum::<u64>();
        s.add_tenant_with_jobs(jobs);
    }
    s.start().unwrap();

    // Sample from a plain thread so reads race the worker tasks.
    let sampler = {
        let s = Arc::clone(&s);
        std::thread::spawn(move || {
            let mut samples = 0;
            loop {
                let stats = s.stats();
                let jobs = stats.jobs_completed
                    + stats.jobs_failed
                    + stats.jobs_in_flight
                    + stats.jobs_pending;
                assert_eq!(jobs, total_jobs, "{stats:?}");
                assert_eq!(stats.total_bytes, total_bytes, "{stats:?}");
                assert!(stats.bytes_done <= stats.total_bytes, "{stats:?}");
                samples += 1;
                if stats.jobs_completed == total_jobs {
                    return samples;
                }
            }
        })
    };

    common::wait_until(Duration::from_secs(60), || sampler.is_finished()).await;
    let samples = sampler.join().unwrap();
    assert!(samples > 0);
    assert!(s.is_drained());
}
