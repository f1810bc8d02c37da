//! WhatsApp integration
//!
//! Interprets WhatsApp Business webhook deliveries and sends replies and
//! typing indicators through the Cloud API.

pub mod client;
pub mod webhook;

pub use client::{WhatsAppClient, WhatsAppClientConfig, WhatsAppError};
pub use webhook::{
    IncomingMessage, SUBSCRIBE_MODE, VerifyRequest, WHATSAPP_OBJECT, WebhookError,
    extract_messages, verify_subscription,
};
