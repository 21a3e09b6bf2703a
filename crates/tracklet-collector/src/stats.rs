//! Collector counters.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct CollectorStats {
    events_dropped: AtomicU64,
    flushes_delivered: AtomicU64,
    flushes_failed: AtomicU64,
}

/// Point-in-time copy of `CollectorStats`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub events_dropped: u64,
    pub flushes_delivered: u64,
    pub flushes_failed: u64,
}

impl CollectorStats {
    pub fn event_dropped(&self) {
        self.events_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn flush_delivered(&self) {
        self.flushes_delivered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn flush_failed(&self) {
        self.flushes_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            events_dropped: self.events_dropped.load(Ordering::Relaxed),
            flushes_delivered: self.flushes_delivered.load(Ordering::Relaxed),
            flushes_failed: self.flushes_failed.load(Ordering::Relaxed),
        }
    }
}
