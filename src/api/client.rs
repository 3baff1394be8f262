use super::constants::{ACTION_PARAM, DATE_FORMAT, DATE_PARAM};
use super::envelope::{self, ApiFailure, Record};
use super::transport::Transport;
use crate::notify::NotificationReporter;
use anyhow::Context;
use chrono::NaiveDate;
use log::{debug, warn};
use reqwest::Url;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

/// Query parameters for one API call. Keys are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiParams {
    params: BTreeMap<String, String>,
}

impl ApiParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parameters naming a remote operation
    pub fn action(action: &str) -> Self {
        Self::new().with(ACTION_PARAM, action)
    }

    /// Set a parameter, replacing any previous value for the key
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Scope the call to a calendar day
    pub fn with_date(self, date: NaiveDate) -> Self {
        self.with(DATE_PARAM, date.format(DATE_FORMAT).to_string())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ApiParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            params: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Client for the single dashboard endpoint.
///
/// [`ApiClient::call`] never fails: any failure is reported through the
/// [`NotificationReporter`] and turned into an empty record list, so callers
/// can aggregate results without per-call error branches.
#[derive(Clone)]
pub struct ApiClient {
    endpoint: Url,
    transport: Arc<dyn Transport>,
    notifier: NotificationReporter,
}

impl ApiClient {
    pub fn new(endpoint: &str, transport: Arc<dyn Transport>, notifier: NotificationReporter) -> anyhow::Result<Self> {
        let endpoint = Url::parse(endpoint)
            .with_context(|| format!("Invalid API endpoint: {}", endpoint))?;

        Ok(Self {
            endpoint,
            transport,
            notifier,
        })
    }

    /// Build the request URL: the base endpoint plus one query pair per parameter
    pub fn request_url(&self, params: &ApiParams) -> Url {
        let mut url = self.endpoint.clone();
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params.iter() {
                pairs.append_pair(key, value);
            }
        }
        url
    }

    /// Issue one call and return its records, or an empty list on failure
    pub async fn call(&self, params: ApiParams) -> Vec<Record> {
        match self.try_call(&params).await {
            Ok(records) => records,
            Err(failure) => {
                warn!(
                    "API call failed: {}",
                    json!({
                        "event": "api_call_failed",
                        "action": params.get(ACTION_PARAM),
                        "error": failure.to_string(),
                    })
                );
                self.notifier.report(failure.to_string());
                Vec::new()
            }
        }
    }

    /// Issue one call and return the classified outcome
    pub async fn try_call(&self, params: &ApiParams) -> Result<Vec<Record>, ApiFailure> {
        let url = self.request_url(params);
        let correlation_id = uuid::Uuid::new_v4().to_string();
        let start = Instant::now();

        debug!(
            "HTTP Request: {}",
            json!({
                "event": "http_request",
                "correlation_id": correlation_id,
                "method": "GET",
                "url": url.as_str(),
            })
        );

        let response = self
            .transport
            .get(&url, &correlation_id)
            .await
            .map_err(|e| ApiFailure::Network(e.to_string()))?;

        debug!(
            "HTTP Response: {}",
            json!({
                "event": "http_response",
                "correlation_id": correlation_id,
                "status_code": response.status,
                "duration_ms": start.elapsed().as_millis() as u64,
            })
        );

        envelope::classify(response.status, &response.body)
    }
}
