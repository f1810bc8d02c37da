//! WhatsApp messenger adapter
//!
//! Implements the `MessengerPort` trait using the WhatsApp integration crate.

use application::error::ApplicationError;
use application::ports::MessengerPort;
use async_trait::async_trait;
use domain::{InboundEvent, OutboundReply};
use integration_whatsapp::{WhatsAppClient, WhatsAppClientConfig, WhatsAppError};
use tracing::{debug, instrument};

/// Adapter that implements `MessengerPort` using `WhatsAppClient`
pub struct WhatsAppMessengerAdapter {
    /// The underlying WhatsApp client
    client: WhatsAppClient,
}

impl WhatsAppMessengerAdapter {
    /// Create a new WhatsApp messenger adapter
    ///
    /// # Errors
    /// Returns an error if the client configuration is invalid.
    pub fn new(config: WhatsAppClientConfig) -> Result<Self, WhatsAppError> {
        Ok(Self {
            client: WhatsAppClient::new(config)?,
        })
    }
}

impl std::fmt::Debug for WhatsAppMessengerAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhatsAppMessengerAdapter")
            .field("messages_url", &self.client.messages_url())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl MessengerPort for WhatsAppMessengerAdapter {
    #[instrument(skip(self, event), fields(recipient = %event.sender_id))]
    async fn send_typing_indicator(&self, event: &InboundEvent) -> Result<(), ApplicationError> {
        self.client
            .send_typing_indicator(&event.sender_id)
            .await
            .map_err(|e| {
                ApplicationError::ExternalService(format!("WhatsApp typing indicator failed: {e}"))
            })?;

        debug!("WhatsApp typing indicator sent");
        Ok(())
    }

    #[instrument(skip(self, reply), fields(recipient = %reply.recipient_id))]
    async fn send_reply(&self, reply: &OutboundReply) -> Result<(), ApplicationError> {
        let response = self
            .client
            .send_message(&reply.recipient_id, &reply.text)
            .await
            .map_err(|e| ApplicationError::ExternalService(format!("WhatsApp send failed: {e}")))?;

        debug!(
            message_id = ?response.messages.first().map(|m| m.id.as_str()),
            "WhatsApp text message sent"
        );
        Ok(())
    }
}
