//! HTTP client for the SpaceX v3 API.
//!
//! # Responsibilities
//! - Issue read-only GETs for launches and rockets
//! - Classify failures (transport, non-2xx status, non-JSON body)
//! - Record per-resource upstream metrics
//!
//! No retries and no caching: every call goes to the provider.

use std::time::{Duration, Instant};

use serde_json::Value;
use thiserror::Error;

use crate::config::UpstreamConfig;
use crate::observability::metrics;

pub const LAUNCHES: &str = "launches";
pub const ROCKETS: &str = "rockets";

/// Errors raised while talking to the upstream provider.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Connection, TLS or timeout failure.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("{url} returned a body that is not JSON: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl UpstreamError {
    fn outcome(&self) -> &'static str {
        match self {
            UpstreamError::Transport { .. } => "transport_error",
            UpstreamError::Status { .. } => "bad_status",
            UpstreamError::Decode { .. } => "bad_body",
        }
    }
}

/// Client for the launch and rocket listings.
#[derive(Debug, Clone)]
pub struct SpacexClient {
    client: reqwest::Client,
    base_url: String,
}

impl SpacexClient {
    /// Build a client from configuration. `timeout_secs` is applied only when set.
    pub fn new(config: &UpstreamConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /v3/launches`
    pub async fn launches(&self) -> Result<Value, UpstreamError> {
        self.get_json(LAUNCHES).await
    }

    /// `GET /v3/rockets`
    pub async fn rockets(&self) -> Result<Value, UpstreamError> {
        self.get_json(ROCKETS).await
    }

    async fn get_json(&self, resource: &'static str) -> Result<Value, UpstreamError> {
        let start = Instant::now();
        let url = format!("{}/v3/{}", self.base_url, resource);

        let result = self.fetch(&url).await;
        match &result {
            Ok(_) => {
                tracing::debug!(resource, elapsed = ?start.elapsed(), "Upstream fetch complete");
                metrics::record_upstream(resource, "ok", start);
            }
            Err(e) => metrics::record_upstream(resource, e.outcome(), start),
        }
        result
    }

    async fn fetch(&self, url: &str) -> Result<Value, UpstreamError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| UpstreamError::Transport { url: url.to_string(), source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status { url: url.to_string(), status });
        }

        response
            .json::<Value>()
            .await
            .map_err(|source| UpstreamError::Decode { url: url.to_string(), source })
    }
}
