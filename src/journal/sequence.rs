//! Event sequence numbers
//!
//! A single counter may be shared by several engines: loading a journal into
//! any of them raises the counter for all.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Monotonic source of event sequence numbers (atomic, lock-free)
#[derive(Debug, Clone, Default)]
pub struct SequenceCounter(Arc<AtomicU64>);

impl SequenceCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the next sequence number; the first one handed out is 1
    pub fn next(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Last sequence number handed out or observed
    pub fn current(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }

    /// Make sure future numbers are greater than `seen`
    pub fn advance_to(&self, seen: u64) {
        self.0.fetch_max(seen, Ordering::SeqCst);
    }
}
