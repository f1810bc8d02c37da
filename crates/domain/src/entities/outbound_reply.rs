//! Outbound reply

use serde::{Deserialize, Serialize};

use super::InboundEvent;

/// Text reply sent back to the originating user, exactly once
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundReply {
    /// Platform id of the recipient
    pub recipient_id: String,
    /// Reply body
    pub text: String,
}

impl OutboundReply {
    /// Create a reply addressed to an arbitrary recipient
    pub fn new(recipient_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            recipient_id: recipient_id.into(),
            text: text.into(),
        }
    }

    /// Create a reply addressed to the sender of `event`
    pub fn to_sender(event: &InboundEvent, text: impl Into<String>) -> Self {
        Self::new(event.sender_id.clone(), text)
    }
}
