//! Outbound network seams.
//!
//! `NetworkLookup` resolves public IP and geo details, `IngestSink` delivers
//! one batch payload. The HTTP implementations live in `http`; tests plug
//! in-memory fakes.

pub mod http;

use async_trait::async_trait;

use tracklet_core::error::Result;
use tracklet_core::payload::{BatchPayload, Geo};

pub use http::{HttpIngest, HttpLookup};

#[async_trait]
pub trait NetworkLookup: Send + Sync {
    async fn public_ip(&self) -> Result<String>;
    async fn geo(&self) -> Result<Geo>;
}

#[async_trait]
pub trait IngestSink: Send + Sync {
    /// Deliver one payload. Any non-success outcome is an error.
    async fn post(&self, payload: &BatchPayload) -> Result<()>;
}
