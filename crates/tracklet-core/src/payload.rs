//! Batch payload sent to the ingestion endpoint.

use serde::{Deserialize, Serialize};

use crate::device::{DeviceDetails, UNKNOWN};
use crate::record::{ButtonClickRecord, KeyRecord, MouseRecord};

pub const TRIGGER_BUTTON_CLICK: &str = "button click";
pub const TRIGGER_FORM_SUBMISSION: &str = "form submission";

/// Why a flush happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    ButtonClick,
    FormSubmission,
}

impl Trigger {
    pub fn as_str(self) -> &'static str {
        match self {
            Trigger::ButtonClick => TRIGGER_BUTTON_CLICK,
            Trigger::FormSubmission => TRIGGER_FORM_SUBMISSION,
        }
    }
}

impl std::fmt::Display for Trigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoDetails {
    pub city: String,
    pub country: String,
    pub isp: String,
}

/// Geo lookup result. A failed lookup serializes as the bare string
/// `"Unknown"`, a successful one as an object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Geo {
    Resolved(GeoDetails),
    Unavailable(String),
}

impl Geo {
    pub fn unknown() -> Self {
        Geo::Unavailable(UNKNOWN.to_string())
    }

    /// Build from optional fields, each missing one becoming `"Unknown"`.
    pub fn from_parts(city: Option<String>, country: Option<String>, isp: Option<String>) -> Self {
        let or_unknown =
            |v: Option<String>| v.filter(|s| !s.is_empty()).unwrap_or_else(|| UNKNOWN.to_string());
        Geo::Resolved(GeoDetails {
            city: or_unknown(city),
            country: or_unknown(country),
            isp: or_unknown(isp),
        })
    }
}

/// The three accumulation lists, moved out of the accumulator together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
    pub mouse: Vec<MouseRecord>,
    pub keyboard: Vec<KeyRecord>,
    pub buttons: Vec<ButtonClickRecord>,
}

impl Batch {
    pub fn is_empty(&self) -> bool {
        self.mouse.is_empty() && self.keyboard.is_empty() && self.buttons.is_empty()
    }

    pub fn len(&self) -> usize {
        self.mouse.len() + self.keyboard.len() + self.buttons.len()
    }
}

/// JSON body of one ingestion POST.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchPayload {
    pub api_key: String,
    pub device_details: DeviceDetails,
    #[serde(rename = "publicIP")]
    pub public_ip: String,
    pub geo_details: Geo,
    pub mouse_data: Vec<MouseRecord>,
    pub keyboard_data: Vec<KeyRecord>,
    pub button_click_data: Vec<ButtonClickRecord>,
    pub triggered_by: String,
}

impl BatchPayload {
    pub fn new(
        api_key: impl Into<String>,
        device_details: DeviceDetails,
        public_ip: impl Into<String>,
        geo_details: Geo,
        batch: Batch,
        trigger: Trigger,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            device_details,
            public_ip: public_ip.into(),
            geo_details,
            mouse_data: batch.mouse,
            keyboard_data: batch.keyboard,
            button_click_data: batch.buttons,
            triggered_by: trigger.as_str().to_string(),
        }
    }
}
