//! Wall-clock timestamps for records.
//!
//! Timestamps are epoch milliseconds anchored once at construction and then
//! advanced by tokio's monotonic clock, so they never go backwards and they
//! follow paused time in tests.

use tokio::time::Instant;

use tracklet_core::record::Millis;

pub trait Clock: Send + Sync {
    fn now_ms(&self) -> Millis;
}

#[derive(Debug, Clone)]
pub struct SystemClock {
    anchor_ms: Millis,
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::anchored_at(chrono::Utc::now().timestamp_millis())
    }

    pub fn anchored_at(anchor_ms: Millis) -> Self {
        Self {
            anchor_ms,
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> Millis {
        let elapsed = i64::try_from(self.start.elapsed().as_millis()).unwrap_or(i64::MAX);
        self.anchor_ms.saturating_add(elapsed)
    }
}
