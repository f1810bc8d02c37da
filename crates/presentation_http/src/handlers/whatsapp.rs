//! WhatsApp webhook handlers
//!
//! Handles the webhook verification handshake and event deliveries.
//! Deliveries are acknowledged as soon as their messages are dispatched;
//! the reply flows run detached and report only through logs.

use axum::{
    body::Bytes,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use domain::InboundEvent;
use integration_whatsapp::{IncomingMessage, VerifyRequest, extract_messages, verify_subscription};
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

use crate::{error::ApiError, state::AppState};

/// WhatsApp webhook verification (GET)
///
/// Meta sends a GET request to verify webhook ownership during setup.
/// Answers with the challenge on success and an empty 403 otherwise,
/// including query strings that do not deserialize (e.g. a repeated `hub.mode`).
#[instrument(skip(state, query))]
pub async fn verify_webhook(
    State(state): State<AppState>,
    query: Result<Query<VerifyRequest>, QueryRejection>,
) -> Result<String, ApiError> {
    let Query(query) = query.map_err(|e| {
        info!(error = %e, "Webhook verification failed: unreadable query");
        ApiError::Forbidden
    })?;

    let expected = state.config.whatsapp.verify_token.as_deref();
    if expected.is_none() {
        warn!("Webhook verification attempted but verify_token not configured");
    }

    verify_subscription(&query, expected).map_or_else(
        || {
            info!("Webhook verification failed");
            Err(ApiError::Forbidden)
        },
        |challenge| {
            info!("Webhook verified");
            Ok(challenge)
        },
    )
}

/// WhatsApp webhook event handler (POST)
///
/// Any body is accepted. Only business-account payloads produce reply flows.
/// Responds 500 when the body cannot be read as a webhook payload.
#[instrument(skip(state, body), fields(body_len = body.len()))]
pub async fn handle_webhook(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    if body.is_empty() {
        debug!("Empty webhook body");
        return Ok(StatusCode::OK);
    }

    let payload: Value = serde_json::from_slice(&body).map_err(|e| {
        error!(error = %e, "Failed to parse webhook payload");
        ApiError::Internal(format!("Invalid payload: {e}"))
    })?;

    debug!(payload = %payload, "Webhook received");

    let messages = extract_messages(&payload).map_err(|e| {
        error!(error = %e, "Failed to process webhook");
        ApiError::Internal(e.to_string())
    })?;

    if messages.is_empty() {
        debug!("No messages in webhook payload (might be status update)");
        return Ok(StatusCode::OK);
    }

    info!(count = messages.len(), "Dispatching WhatsApp messages");

    let events = messages.into_iter().map(to_event).collect();
    // Detached: the delivery is acknowledged without awaiting the reply flows
    drop(state.relay.dispatch(events));

    Ok(StatusCode::OK)
}

fn to_event(message: IncomingMessage) -> InboundEvent {
    InboundEvent::new(message.from, message.id, message.text)
}
