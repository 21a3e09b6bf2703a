//! Clock-free rate limiting primitives.
//!
//! Both types only store deadlines; the caller owns the timer and calls
//! `poll` once the deadline is reached. This keeps them deterministic and
//! lets the collector drive them from a single `select!` loop.

use crate::record::Millis;

/// Leading-edge throttle with a single trailing slot.
///
/// The first item in a window fires immediately. Items arriving inside the
/// window overwrite one pending item that fires at the window boundary, so
/// at most one item fires per window.
#[derive(Debug)]
pub struct Throttle<T> {
    window: Millis,
    last_fired: Option<Millis>,
    pending: Option<(Millis, T)>,
}

impl<T> Throttle<T> {
    pub fn new(window: Millis) -> Self {
        Self {
            window: window.max(1),
            last_fired: None,
            pending: None,
        }
    }

    /// Offer an item. Returns it back when it should fire right now.
    pub fn offer(&mut self, now: Millis, item: T) -> Option<T> {
        match self.last_fired {
            Some(last) if now - last < self.window => {
                self.pending = Some((last + self.window, item));
                None
            }
            _ => {
                self.pending = None;
                self.last_fired = Some(now);
                Some(item)
            }
        }
    }

    pub fn deadline(&self) -> Option<Millis> {
        self.pending.as_ref().map(|(at, _)| *at)
    }

    /// Release the pending item if its deadline has passed.
    pub fn poll(&mut self, now: Millis) -> Option<T> {
        match &self.pending {
            Some((at, _)) if now >= *at => {
                self.last_fired = Some(now);
                self.pending.take().map(|(_, item)| item)
            }
            _ => None,
        }
    }

    pub fn clear(&mut self) {
        self.pending = None;
    }
}

/// Trailing-edge debounce: fires `quiet` ms after the most recent offer.
#[derive(Debug)]
pub struct Debounce<T> {
    quiet: Millis,
    pending: Option<(Millis, T)>,
}

impl<T> Debounce<T> {
    pub fn new(quiet: Millis) -> Self {
        Self {
            quiet: quiet.max(1),
            pending: None,
        }
    }

    /// Replace any pending item and push the deadline out.
    pub fn offer(&mut self, now: Millis, item: T) {
        self.pending = Some((now + self.quiet, item));
    }

    pub fn deadline(&self) -> Option<Millis> {
        self.pending.as_ref().map(|(at, _)| *at)
    }

    pub fn poll(&mut self, now: Millis) -> Option<T> {
        match &self.pending {
            Some((at, _)) if now >= *at => self.pending.take().map(|(_, item)| item),
            _ => None,
        }
    }

    pub fn clear(&mut self) {
        self.pending = None;
    }
}
