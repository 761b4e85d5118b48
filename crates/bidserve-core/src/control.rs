//! Pause control for the worker pool: one shared stop flag per worker.
//!
//! The scheduler sets or clears the flags; each worker checks its own flag
//! between ticks and auction cycles and parks while it is set. Flags are
//! plain atomics and never need the registry lock.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cloneable handle to one worker's stop flag.
#[derive(Debug, Clone, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn clear(&self) {
        self.0.store(false, Ordering::Release);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Stop flags of the whole pool, indexed by worker id.
#[derive(Debug)]
pub struct PoolControl {
    flags: Vec<StopFlag>,
}

impl PoolControl {
    pub fn new(worker_count: usize) -> Self {
        Self {
            flags: (0..worker_count).map(|_| StopFlag::new()).collect(),
        }
    }

    /// Flags in worker id order.
    pub fn flags(&self) -> impl ExactSizeIterator<Item = &StopFlag> {
        self.flags.iter()
    }

    /// Ask every worker to park after its current sleep.
    pub fn request_stop_all(&self) {
        for flag in &self.flags {
            flag.request();
        }
    }

    /// Let every worker continue where it parked.
    pub fn clear_all(&self) {
        for flag in &self.flags {
            flag.clear();
        }
    }
}
