//! HTTP transport used by [`ApiClient`](super::ApiClient)
//!
//! The client only ever performs a single GET per call. Keeping that behind a
//! trait lets tests script responses without a network.

use super::constants::{self, headers};
use crate::config::ApiConfig;
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Url;
use std::time::Duration;
use thiserror::Error;

/// Raw response as seen by the envelope classifier
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &Url, correlation_id: &str) -> Result<RawResponse, TransportError>;
}

/// Production transport backed by a pooled `reqwest` client
#[derive(Clone)]
pub struct ReqwestTransport {
    http_client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(config: &ApiConfig) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(constants::USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { http_client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &Url, correlation_id: &str) -> Result<RawResponse, TransportError> {
        let response = self
            .http_client
            .get(url.clone())
            .header(headers::ACCEPT, headers::CONTENT_TYPE_JSON)
            .header(headers::X_CORRELATION_ID, correlation_id)
            .send()
            .await
            .map_err(|e| TransportError(format!("Request failed: {}", e)))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError(format!("Failed to read response body: {}", e)))?;

        Ok(RawResponse { status, body })
    }
}
