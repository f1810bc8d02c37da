//! WhatsApp webhook handling
//!
//! Decides the subscription handshake and pulls text messages out of
//! business-account webhook deliveries. Deliveries are walked as untyped
//! JSON: any level of the `entry -> changes -> value -> messages` nesting
//! may be absent, and an absent level only ends that branch.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

/// `object` tag of the deliveries this relay acts on
pub const WHATSAPP_OBJECT: &str = "whatsapp_business_account";

/// `hub.mode` value of a subscription handshake
pub const SUBSCRIBE_MODE: &str = "subscribe";

/// Change field that carries inbound messages
const MESSAGES_FIELD: &str = "messages";

/// Webhook errors
#[derive(Debug, Error)]
pub enum WebhookError {
    /// A collection level exists but is not a JSON array
    #[error("Malformed webhook payload: `{0}` is not an array")]
    MalformedPayload(String),
}

/// Query parameters of the verification handshake
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VerifyRequest {
    /// The mode (should be "subscribe")
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    /// The challenge to echo back on success
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
    /// The verify token to validate
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,
}

/// Decide the verification handshake
///
/// Returns the challenge to echo when the mode is `subscribe` and the token
/// matches `expected_token`. Without a configured token nothing verifies.
pub fn verify_subscription(request: &VerifyRequest, expected_token: Option<&str>) -> Option<String> {
    let expected = expected_token.filter(|t| !t.is_empty())?;

    if request.mode.as_deref() != Some(SUBSCRIBE_MODE) {
        debug!(mode = ?request.mode, "Invalid hub.mode");
        return None;
    }

    if request.verify_token.as_deref() != Some(expected) {
        warn!("Webhook verification failed: token mismatch");
        return None;
    }

    Some(request.challenge.clone().unwrap_or_default())
}

/// A message element found in a webhook delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    /// Sender `wa_id`
    pub from: String,
    /// Platform message id
    pub id: Option<String>,
    /// Text body, if the message has one
    pub text: Option<String>,
}

/// Extract every message of a webhook delivery
///
/// Payloads with another `object` tag yield nothing.
pub fn extract_messages(payload: &Value) -> Result<Vec<IncomingMessage>, WebhookError> {
    let mut messages = Vec::new();

    if payload.get("object").and_then(Value::as_str) != Some(WHATSAPP_OBJECT) {
        debug!("Ignoring webhook payload with unsupported object tag");
        return Ok(messages);
    }

    for entry in array_at(payload, "entry")? {
        for change in array_at(entry, "changes")? {
            if change.get("field").and_then(Value::as_str) != Some(MESSAGES_FIELD) {
                continue;
            }
            let Some(value) = change.get("value") else {
                continue;
            };
            for message in array_at(value, "messages")? {
                if let Some(message) = parse_message(message) {
                    messages.push(message);
                }
            }
        }
    }

    Ok(messages)
}

/// Array stored under `key`, empty when the key is absent or null
fn array_at<'a>(parent: &'a Value, key: &str) -> Result<&'a [Value], WebhookError> {
    match parent.get(key) {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(WebhookError::MalformedPayload(key.to_string())),
    }
}

fn parse_message(message: &Value) -> Option<IncomingMessage> {
    let Some(from) = message.get("from").and_then(Value::as_str) else {
        warn!("Skipping message without sender");
        return None;
    };

    let text = message
        .get("text")
        .and_then(|text| text.get("body"))
        .and_then(Value::as_str)
        .map(str::to_string);

    Some(IncomingMessage {
        from: from.to_string(),
        id: message.get("id").and_then(Value::as_str).map(str::to_string),
        text,
    })
}
