//! Backend query service integration
//!
//! Forwards user text to the configured backend and turns its JSON answer
//! into reply text.

pub mod client;

pub use client::{BackendClient, BackendConfig, BackendError, extract_reply_text};
