//! Inbound message event

use serde::{Deserialize, Serialize};

/// A single user message found inside a webhook delivery
///
/// Created once per message element of a payload and dropped after its
/// reply flow finishes. Redeliveries of the same message produce a new,
/// independent event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundEvent {
    /// Platform id of the sender (the WhatsApp `wa_id`)
    pub sender_id: String,
    /// Platform message id, when the payload carries one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    /// Text content; empty for messages without a text body
    #[serde(default)]
    pub text: String,
}

impl InboundEvent {
    /// Create a new event, defaulting a missing text body to `""`
    pub fn new(
        sender_id: impl Into<String>,
        message_id: Option<String>,
        text: Option<String>,
    ) -> Self {
        Self {
            sender_id: sender_id.into(),
            message_id,
            text: text.unwrap_or_default(),
        }
    }
}
