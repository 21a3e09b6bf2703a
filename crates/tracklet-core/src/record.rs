//! Interaction records accumulated between flushes.
//!
//! Field names follow the ingestion wire format (camelCase, `time` for the
//! event timestamp). All timestamps are milliseconds since the Unix epoch.

use serde::{Deserialize, Serialize};

/// Epoch milliseconds.
pub type Millis = i64;

/// One mouse record. `type` is the serde tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MouseRecord {
    Move {
        x: i32,
        y: i32,
        time: Millis,
    },
    Click {
        x: i32,
        y: i32,
        time: Millis,
    },
    Scroll {
        #[serde(rename = "scrollX")]
        scroll_x: i32,
        #[serde(rename = "scrollY")]
        scroll_y: i32,
        time: Millis,
    },
}

impl MouseRecord {
    pub fn time(&self) -> Millis {
        match self {
            MouseRecord::Move { time, .. }
            | MouseRecord::Click { time, .. }
            | MouseRecord::Scroll { time, .. } => *time,
        }
    }
}

/// Key-hold interval. Open while `end` is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyRecord {
    pub key: String,
    pub start: Millis,
    pub end: Option<Millis>,
    pub hold: Option<Millis>,
    /// Gap between the previous key release (any key) and this press.
    pub release_to_press: Option<Millis>,
}

impl KeyRecord {
    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }
}

/// Button click as reported to the ingestion endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonClickRecord {
    pub text: String,
    pub id: String,
    pub class: String,
    pub tag_name: String,
    pub time: Millis,
}
