//! Messenger port - outbound calls to the messaging platform

use async_trait::async_trait;
use domain::{InboundEvent, OutboundReply};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Outbound operations against the messaging platform
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MessengerPort: Send + Sync {
    /// Show a typing indicator to the sender of `event`
    async fn send_typing_indicator(&self, event: &InboundEvent) -> Result<(), ApplicationError>;

    /// Deliver a text reply
    async fn send_reply(&self, reply: &OutboundReply) -> Result<(), ApplicationError>;
}
