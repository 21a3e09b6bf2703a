//! Transmission pipeline: one batch in, one POST out.
//!
//! The batch has already been swapped out of the accumulator, so local
//! state is reset whatever happens here. Lookup failures degrade to the
//! `"Unknown"` sentinels; only the POST itself can fail the transmission.
//! Nothing is retried.

use std::sync::Arc;

use tracklet_core::device::{DeviceDetails, UNKNOWN};
use tracklet_core::error::Result;
use tracklet_core::page::PageEnvironment;
use tracklet_core::payload::{Batch, BatchPayload, Geo, Trigger};

use crate::transport::{IngestSink, NetworkLookup};

/// What a successful transmission carried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub trigger: Trigger,
    pub mouse: usize,
    pub keyboard: usize,
    pub buttons: usize,
}

pub struct Transmitter {
    api_key: String,
    page: PageEnvironment,
    lookup: Arc<dyn NetworkLookup>,
    sink: Arc<dyn IngestSink>,
}

impl Transmitter {
    pub fn new(
        api_key: impl Into<String>,
        page: PageEnvironment,
        lookup: Arc<dyn NetworkLookup>,
        sink: Arc<dyn IngestSink>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            page,
            lookup,
            sink,
        }
    }

    /// Build and send the payload for `batch`.
    pub async fn transmit(&self, batch: Batch, trigger: Trigger) -> Result<Delivery> {
        let (public_ip, geo) = tokio::join!(self.resolve_ip(), self.resolve_geo());

        let delivery = Delivery {
            trigger,
            mouse: batch.mouse.len(),
            keyboard: batch.keyboard.len(),
            buttons: batch.buttons.len(),
        };
        let payload = self.build_payload(public_ip, geo, batch, trigger);

        self.sink.post(&payload).await?;
        Ok(delivery)
    }

    pub fn build_payload(
        &self,
        public_ip: String,
        geo: Geo,
        batch: Batch,
        trigger: Trigger,
    ) -> BatchPayload {
        BatchPayload::new(
            self.api_key.as_str(),
            DeviceDetails::detect(&self.page),
            public_ip,
            geo,
            batch,
            trigger,
        )
    }

    async fn resolve_ip(&self) -> String {
        match self.lookup.public_ip().await {
            Ok(ip) => ip,
            Err(e) => {
                tracing::debug!(code = e.code().as_str(), error = %e, "public ip lookup failed");
                UNKNOWN.to_string()
            }
        }
    }

    async fn resolve_geo(&self) -> Geo {
        match self.lookup.geo().await {
            Ok(geo) => geo,
            Err(e) => {
                tracing::debug!(code = e.code().as_str(), error = %e, "geo lookup failed");
                Geo::unknown()
            }
        }
    }
}
