//! Per-key hold tracking.
//!
//! State per key: no record -> (down) -> open -> (up) -> closed.
//! At most one open record exists per key; auto-repeat downs are ignored.

use crate::record::{KeyRecord, Millis};

#[derive(Debug, Default)]
pub struct KeyboardTracker {
    records: Vec<KeyRecord>,
    last_release: Option<Millis>,
}

impl KeyboardTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when a new record was opened.
    pub fn key_down(&mut self, key: &str, now: Millis) -> bool {
        if self.open_index(key).is_some() {
            return false;
        }
        self.records.push(KeyRecord {
            key: key.to_string(),
            start: now,
            end: None,
            hold: None,
            release_to_press: self.last_release.map(|r| now - r),
        });
        true
    }

    /// Closes the first open record for `key`. Returns false (no-op) when
    /// there is none, e.g. the key went down before the last flush.
    pub fn key_up(&mut self, key: &str, now: Millis) -> bool {
        let Some(i) = self.open_index(key) else {
            return false;
        };
        let rec = &mut self.records[i];
        let end = now.max(rec.start);
        rec.end = Some(end);
        rec.hold = Some(end - rec.start);
        self.last_release = Some(end);
        true
    }

    pub fn records(&self) -> &[KeyRecord] {
        &self.records
    }

    #[cfg(test)]
    pub fn last_release(&self) -> Option<Millis> {
        self.last_release
    }

    /// Moves all records out, open ones included. `last_release` survives.
    pub fn take_records(&mut self) -> Vec<KeyRecord> {
        std::mem::take(&mut self.records)
    }

    fn open_index(&self, key: &str) -> Option<usize> {
        self.records.iter().position(|r| r.key == key && r.is_open())
    }
}
