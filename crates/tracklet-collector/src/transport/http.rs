use async_trait::async_trait;
use serde::Deserialize;

use tracklet_core::error::{Result, TrackletError};
use tracklet_core::payload::{BatchPayload, Geo};

use super::{IngestSink, NetworkLookup};
use crate::config::CollectorSection;

/// Build the shared reqwest client (timeout only when configured).
pub fn build_client(cfg: &CollectorSection) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if let Some(t) = cfg.request_timeout() {
        builder = builder.timeout(t);
    }
    builder
        .build()
        .map_err(|e| TrackletError::Internal(format!("http client build failed: {e}")))
}

#[derive(Debug, Deserialize)]
struct IpResponse {
    ip: String,
}

#[derive(Debug, Deserialize)]
struct GeoResponse {
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    isp: Option<String>,
}

/// IP and geo lookups against two fixed GET endpoints.
#[derive(Debug, Clone)]
pub struct HttpLookup {
    client: reqwest::Client,
    ip_url: String,
    geo_url: String,
}

impl HttpLookup {
    pub fn new(
        client: reqwest::Client,
        ip_url: impl Into<String>,
        geo_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            ip_url: ip_url.into(),
            geo_url: geo_url.into(),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TrackletError::Lookup(format!("{url}: {e}")))?;
        resp.json::<T>()
            .await
            .map_err(|e| TrackletError::Lookup(format!("{url}: invalid body: {e}")))
    }
}

#[async_trait]
impl NetworkLookup for HttpLookup {
    async fn public_ip(&self) -> Result<String> {
        let body: IpResponse = self.get_json(&self.ip_url).await?;
        Ok(body.ip)
    }

    async fn geo(&self) -> Result<Geo> {
        let body: GeoResponse = self.get_json(&self.geo_url).await?;
        Ok(Geo::from_parts(body.city, body.country, body.isp))
    }
}

/// JSON POST to the ingestion endpoint. The response body is ignored.
#[derive(Debug, Clone)]
pub struct HttpIngest {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpIngest {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl IngestSink for HttpIngest {
    async fn post(&self, payload: &BatchPayload) -> Result<()> {
        let resp = self
            .client
            .post(&self.endpoint)
            .json(payload)
            .send()
            .await
            .map_err(|e| TrackletError::Transmission(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(TrackletError::Transmission(format!("endpoint returned {status}")));
        }
        Ok(())
    }
}
