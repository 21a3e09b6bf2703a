//! Click targets and button detection.
//!
//! The host reports a click target as the element that was hit followed by
//! its ancestors, outermost last. Every attribute is optional so partially
//! described elements never fail.

use serde::{Deserialize, Serialize};

use crate::record::{ButtonClickRecord, Millis};

pub const UNNAMED_BUTTON: &str = "Unnamed Button";
pub const NO_ID: &str = "No ID";
pub const NO_CLASS: &str = "No Class";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementInfo {
    pub tag_name: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub class_name: Option<String>,
    #[serde(default)]
    pub inner_text: Option<String>,
    #[serde(default)]
    pub aria_label: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl ElementInfo {
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            ..Self::default()
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.inner_text = Some(text.into());
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class_name = Some(class.into());
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn with_aria_label(mut self, label: impl Into<String>) -> Self {
        self.aria_label = Some(label.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn is_button(&self) -> bool {
        self.tag_name.eq_ignore_ascii_case("button")
            || self
                .role
                .as_deref()
                .is_some_and(|r| r.trim().eq_ignore_ascii_case("button"))
    }

    /// Visible text (trimmed), then aria-label, then title.
    pub fn label(&self) -> String {
        let text = self.inner_text.as_deref().map(str::trim);
        [text, self.aria_label.as_deref(), self.title.as_deref()]
            .into_iter()
            .flatten()
            .find(|s| !s.is_empty())
            .unwrap_or(UNNAMED_BUTTON)
            .to_string()
    }

    pub fn to_click_record(&self, time: Millis) -> ButtonClickRecord {
        ButtonClickRecord {
            text: self.label(),
            id: non_empty_or(self.id.as_deref(), NO_ID),
            class: non_empty_or(self.class_name.as_deref(), NO_CLASS),
            tag_name: self.tag_name.to_ascii_uppercase(),
            time,
        }
    }
}

fn non_empty_or(v: Option<&str>, fallback: &str) -> String {
    match v {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => fallback.to_string(),
    }
}

/// Hit element followed by its ancestors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickTarget {
    pub path: Vec<ElementInfo>,
}

impl ClickTarget {
    pub fn new(path: Vec<ElementInfo>) -> Self {
        Self { path }
    }

    /// Nearest button, starting at the hit element itself.
    pub fn closest_button(&self) -> Option<&ElementInfo> {
        self.path.iter().find(|e| e.is_button())
    }
}
