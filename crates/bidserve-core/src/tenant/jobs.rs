//! Sources of a new tenant's initial job set.

use rand::Rng;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::config::JobGenConfig;

/// Produces the job sizes (bytes) for a newly registered tenant.
/// Order does not matter; the tenant sorts them.
pub trait JobSource: Send + Sync {
    fn initial_jobs(&self) -> Vec<u64>;
}

/// Uniformly random job count and sizes within the configured ranges.
#[derive(Debug, Clone, Copy)]
pub struct RandomJobs {
    ranges: JobGenConfig,
}

impl RandomJobs {
    pub fn new(ranges: JobGenConfig) -> Self {
        Self {
            ranges: ranges.normalized(),
        }
    }
}

impl Default for RandomJobs {
    fn default() -> Self {
        Self::new(JobGenConfig::default())
    }
}

impl JobSource for RandomJobs {
    fn initial_jobs(&self) -> Vec<u64> {
        let r = &self.ranges;
        let mut rng = rand::rng();
        let count = rng.random_range(r.min_jobs..=r.max_jobs);
        (0..count)
            .map(|_| rng.random_range(r.min_job_bytes..=r.max_job_bytes))
            .collect()
    }
}

/// Hands out predefined job sets in order; empty once exhausted.
#[derive(Debug, Default)]
pub struct FixedJobs {
    sets: Mutex<VecDeque<Vec<u64>>>,
}

impl FixedJobs {
    pub fn new(sets: impl IntoIterator<Item = Vec<u64>>) -> Self {
        Self {
            sets: Mutex::new(sets.into_iter().collect()),
        }
    }
}

impl JobSource for FixedJobs {
    fn initial_jobs(&self) -> Vec<u64> {
        self.sets
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .pop_front()
            .unwrap_or_default()
    }
}
