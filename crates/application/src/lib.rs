//! Application layer - Use cases and orchestration
//!
//! Defines the outbound ports and the relay use case that ties an inbound
//! WhatsApp message to a backend query and a reply.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
