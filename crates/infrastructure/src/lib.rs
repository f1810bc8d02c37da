//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer and owns configuration
//! loading and tracing setup.

pub mod adapters;
pub mod config;
pub mod telemetry;

pub use adapters::*;
pub use config::{AppConfig, ServerConfig, WhatsAppConfig};
pub use telemetry::init_tracing;
