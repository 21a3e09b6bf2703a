//! In-memory accumulation between flushes.
//!
//! `Accumulator` is plain owned state. `SharedAccumulator` puts it behind a
//! mutex so a flush can swap the lists out in one critical section: events
//! recorded concurrently land either wholly in the taken batch or wholly in
//! the next one.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::keyboard::KeyboardTracker;
use crate::payload::Batch;
use crate::record::{ButtonClickRecord, KeyRecord, Millis, MouseRecord};

#[derive(Debug, Default)]
pub struct Accumulator {
    mouse: Vec<MouseRecord>,
    keyboard: KeyboardTracker,
    buttons: Vec<ButtonClickRecord>,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_move(&mut self, x: i32, y: i32, time: Millis) {
        self.mouse.push(MouseRecord::Move { x, y, time });
    }

    pub fn record_click(&mut self, x: i32, y: i32, time: Millis) {
        self.mouse.push(MouseRecord::Click { x, y, time });
    }

    pub fn record_scroll(&mut self, scroll_x: i32, scroll_y: i32, time: Millis) {
        self.mouse.push(MouseRecord::Scroll {
            scroll_x,
            scroll_y,
            time,
        });
    }

    pub fn key_down(&mut self, key: &str, time: Millis) -> bool {
        self.keyboard.key_down(key, time)
    }

    pub fn key_up(&mut self, key: &str, time: Millis) -> bool {
        let closed = self.keyboard.key_up(key, time);
        if !closed {
            tracing::trace!(%key, "key up without open record");
        }
        closed
    }

    pub fn record_button(&mut self, rec: ButtonClickRecord) {
        self.buttons.push(rec);
    }

    pub fn mouse(&self) -> &[MouseRecord] {
        &self.mouse
    }

    pub fn keyboard(&self) -> &[KeyRecord] {
        self.keyboard.records()
    }

    pub fn buttons(&self) -> &[ButtonClickRecord] {
        &self.buttons
    }

    pub fn is_empty(&self) -> bool {
        self.mouse.is_empty() && self.keyboard.records().is_empty() && self.buttons.is_empty()
    }

    /// Move the three lists out, leaving them empty.
    pub fn take_batch(&mut self) -> Batch {
        Batch {
            mouse: std::mem::take(&mut self.mouse),
            keyboard: self.keyboard.take_records(),
            buttons: std::mem::take(&mut self.buttons),
        }
    }
}

/// Cloneable handle over one `Accumulator`.
#[derive(Debug, Clone, Default)]
pub struct SharedAccumulator {
    inner: Arc<Mutex<Accumulator>>,
}

impl SharedAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` with exclusive access.
    pub fn with<R>(&self, f: impl FnOnce(&mut Accumulator) -> R) -> R {
        f(&mut self.lock())
    }

    /// Swap-and-clear under a single lock.
    pub fn take_batch(&self) -> Batch {
        self.lock().take_batch()
    }

    /// Record a button click and take the batch containing it, atomically.
    pub fn push_button_and_take(&self, rec: ButtonClickRecord) -> Batch {
        let mut g = self.lock();
        g.record_button(rec);
        g.take_batch()
    }

    // A panic while holding the lock leaves only appended records behind,
    // which are still valid, so poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, Accumulator> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
