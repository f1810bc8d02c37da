//! Relay service
//!
//! Runs the per-message reply flow: typing indicator, backend query, reply.
//! Each inbound message is handled on its own detached task so the webhook
//! can acknowledge the delivery without waiting for any outbound call.

use std::sync::Arc;

use domain::{InboundEvent, OutboundReply};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

use crate::error::ApplicationError;
use crate::ports::{MessengerPort, QueryPort};

/// Reply sent in place of the backend answer when the backend call fails
pub const FALLBACK_REPLY: &str =
    "Sorry, something went wrong while processing your message. Please try again later.";

/// Relays inbound messages to the backend and the answers back to the sender
#[derive(Clone)]
pub struct RelayService {
    messenger: Arc<dyn MessengerPort>,
    backend: Arc<dyn QueryPort>,
}

impl std::fmt::Debug for RelayService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayService").finish_non_exhaustive()
    }
}

impl RelayService {
    /// Create a new relay service
    #[must_use]
    pub fn new(messenger: Arc<dyn MessengerPort>, backend: Arc<dyn QueryPort>) -> Self {
        Self { messenger, backend }
    }

    /// Process one inbound message and return the reply that was sent
    ///
    /// A failed typing indicator is logged and ignored. A failed backend call
    /// degrades to [`FALLBACK_REPLY`]. A failed reply send is logged and
    /// returned; nothing is retried.
    #[instrument(skip(self, event), fields(from = %event.sender_id, message_id = ?event.message_id))]
    pub async fn process_event(
        &self,
        event: &InboundEvent,
    ) -> Result<OutboundReply, ApplicationError> {
        info!(text_len = event.text.len(), "Received message");

        if let Err(e) = self.messenger.send_typing_indicator(event).await {
            warn!(error = %e, "Failed to send typing indicator");
        }

        let text = match self.backend.query(&event.text).await {
            Ok(text) => text,
            Err(e) => {
                error!(error = %e, "Backend query failed, replying with fallback text");
                FALLBACK_REPLY.to_string()
            },
        };

        let reply = OutboundReply::to_sender(event, text);

        if let Err(e) = self.messenger.send_reply(&reply).await {
            error!(error = %e, "Failed to send reply");
            return Err(e);
        }

        debug!(reply_len = reply.text.len(), "Reply sent");
        Ok(reply)
    }

    /// Spawn one detached task per event
    ///
    /// The returned handles may be dropped; a task's outcome is only ever
    /// observed through logging. No ordering holds between the tasks.
    pub fn dispatch(&self, events: Vec<InboundEvent>) -> Vec<JoinHandle<()>> {
        events
            .into_iter()
            .map(|event| {
                let service = self.clone();
                tokio::spawn(async move {
                    if let Err(e) = service.process_event(&event).await {
                        error!(
                            error = %e,
                            from = %event.sender_id,
                            "Reply flow failed"
                        );
                    }
                })
            })
            .collect()
    }
}
