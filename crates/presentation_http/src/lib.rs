//! WhatsApp relay HTTP presentation layer
//!
//! This crate provides the webhook endpoints the messaging platform calls
//! and the liveness check.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
