//! Backend query client
//!
//! HTTP client for the query service that produces reply text.

use std::{num::FpCategory, time::Duration};

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use thiserror::Error;
use tracing::{debug, instrument};

/// Response fields checked for reply text, in priority order
const REPLY_FIELDS: [&str; 3] = ["response", "message", "text"];

/// Backend client errors
#[derive(Debug, Error)]
pub enum BackendError {
    /// Connection to the backend failed or timed out
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("Backend returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// Backend answered with something that is not JSON
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Backend service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Query endpoint (default: <http://localhost:8000/api/query>)
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Request timeout in seconds (default: 60)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_api_url() -> String {
    "http://localhost:8000/api/query".to_string()
}

const fn default_timeout() -> u64 {
    60
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Query request body
#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    query: &'a str,
    reset_conversation: bool,
}

/// HTTP client for the backend query service
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    config: BackendConfig,
}

impl BackendClient {
    /// Create a new backend client
    pub fn new(config: BackendConfig) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    /// Configured query endpoint
    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.config.api_url
    }

    /// Send `text` to the backend and return the extracted reply text
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub async fn query(&self, text: &str) -> Result<String, BackendError> {
        let response = self
            .client
            .post(&self.config.api_url)
            .json(&QueryRequest {
                query: text,
                reset_conversation: false,
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: Value = serde_json::from_str(&body)
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;

        let reply = extract_reply_text(&payload);
        debug!(reply_len = reply.len(), "Backend answered");
        Ok(reply)
    }
}

/// Pick the reply text out of a backend answer
///
/// Uses the first of `response`, `message` and `text` that holds a usable
/// value; `null`, `false`, `""` and zero count as absent. String values are
/// taken verbatim, other values as their JSON text. When none is usable the
/// whole payload is returned as JSON text.
pub fn extract_reply_text(payload: &Value) -> String {
    REPLY_FIELDS
        .iter()
        .filter_map(|field| payload.get(*field))
        .find_map(|value| match value {
            Value::Null | Value::Bool(false) => None,
            Value::String(s) if s.is_empty() => None,
            Value::Number(n) if is_zero(n) => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        })
        .unwrap_or_else(|| payload.to_string())
}

fn is_zero(n: &Number) -> bool {
    n.as_f64().is_some_and(|f| f.classify() == FpCategory::Zero)
}
