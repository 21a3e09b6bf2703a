use std::time::Duration;

use serde::Deserialize;
use tracklet_core::error::{Result, TrackletError};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CollectorConfig {
    pub version: u32,

    pub collector: CollectorSection,
}

impl CollectorConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            version: 1,
            collector: CollectorSection::new(endpoint),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(TrackletError::UnsupportedVersion);
        }
        self.collector.validate()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CollectorSection {
    /// Ingestion endpoint receiving batch POSTs.
    pub endpoint: String,

    #[serde(default = "default_ip_lookup_url")]
    pub ip_lookup_url: String,

    #[serde(default = "default_geo_lookup_url")]
    pub geo_lookup_url: String,

    #[serde(default = "default_move_throttle_ms")]
    pub move_throttle_ms: u64,

    #[serde(default = "default_scroll_debounce_ms")]
    pub scroll_debounce_ms: u64,

    /// Capacity of the event queue between the host and the collector loop.
    #[serde(default = "default_event_queue")]
    pub event_queue: usize,

    /// Per-request timeout for lookups and ingestion. None waits forever.
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
}

impl CollectorSection {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ip_lookup_url: default_ip_lookup_url(),
            geo_lookup_url: default_geo_lookup_url(),
            move_throttle_ms: default_move_throttle_ms(),
            scroll_debounce_ms: default_scroll_debounce_ms(),
            event_queue: default_event_queue(),
            request_timeout_ms: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (name, url) in [
            ("endpoint", &self.endpoint),
            ("ip_lookup_url", &self.ip_lookup_url),
            ("geo_lookup_url", &self.geo_lookup_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(TrackletError::BadConfig(format!(
                    "collector.{name} must be an http(s) url"
                )));
            }
        }
        if !(1..=10_000).contains(&self.move_throttle_ms) {
            return Err(TrackletError::BadConfig(
                "collector.move_throttle_ms must be between 1 and 10000".into(),
            ));
        }
        if !(1..=10_000).contains(&self.scroll_debounce_ms) {
            return Err(TrackletError::BadConfig(
                "collector.scroll_debounce_ms must be between 1 and 10000".into(),
            ));
        }
        if self.event_queue == 0 {
            return Err(TrackletError::BadConfig(
                "collector.event_queue must be at least 1".into(),
            ));
        }
        if self.request_timeout_ms == Some(0) {
            return Err(TrackletError::BadConfig(
                "collector.request_timeout_ms must be positive when set".into(),
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}

fn default_ip_lookup_url() -> String {
    "https://api64.ipify.org?format=json".into()
}
fn default_geo_lookup_url() -> String {
    "https://ip-api.com/json/".into()
}
fn default_move_throttle_ms() -> u64 {
    100
}
fn default_scroll_debounce_ms() -> u64 {
    200
}
fn default_event_queue() -> usize {
    1024
}
