//! Raw interaction events delivered by the host.

use serde::{Deserialize, Serialize};

use tracklet_core::element::ClickTarget;

/// One interaction, as the host observed it. Timestamps are assigned by the
/// collector when the event is processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputEvent {
    MouseMove {
        x: i32,
        y: i32,
    },
    /// Any click. A target whose path contains a button also flushes.
    Click {
        x: i32,
        y: i32,
        #[serde(default)]
        target: Option<ClickTarget>,
    },
    /// Page scroll offsets after the scroll.
    Scroll {
        scroll_x: i32,
        scroll_y: i32,
    },
    KeyDown {
        key: String,
    },
    KeyUp {
        key: String,
    },
    FormSubmit,
}

impl InputEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            InputEvent::MouseMove { .. } => "mouse_move",
            InputEvent::Click { .. } => "click",
            InputEvent::Scroll { .. } => "scroll",
            InputEvent::KeyDown { .. } => "key_down",
            InputEvent::KeyUp { .. } => "key_up",
            InputEvent::FormSubmit => "form_submit",
        }
    }
}
