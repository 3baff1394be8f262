//! Response envelope parsing and outcome classification
//!
//! The remote API wraps every payload in `{ success, data, message }`.
//! [`classify`] turns a raw status/body pair into either the record list or
//! an [`ApiFailure`].

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// A loosely typed record as delivered by the remote API
pub type Record = Value;

/// Failure of a single API call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiFailure {
    /// Transport failure, non-success status or malformed body
    #[error("Network error: {0}")]
    Network(String),
    /// Explicit `success: false` from the envelope
    #[error("API error: {0}")]
    Api(String),
}

impl ApiFailure {
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    message: Option<String>,
}

/// Classify an HTTP status and body into the record sequence or a failure
pub fn classify(status: u16, body: &str) -> Result<Vec<Record>, ApiFailure> {
    if !(200..300).contains(&status) {
        return Err(ApiFailure::Network(format!("HTTP error! status: {}", status)));
    }

    let envelope: Envelope = serde_json::from_str(body)
        .map_err(|e| ApiFailure::Network(format!("Malformed response body: {}", e)))?;

    if !envelope.success {
        let message = envelope
            .message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| "Unknown API error".to_string());
        return Err(ApiFailure::Api(message));
    }

    match envelope.data {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(ApiFailure::Network(format!(
            "Malformed response body: expected array data, got {}",
            value_kind(&other)
        ))),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
