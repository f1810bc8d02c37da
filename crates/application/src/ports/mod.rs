//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod messenger_port;
mod query_port;

#[cfg(test)]
pub use messenger_port::MockMessengerPort;
pub use messenger_port::MessengerPort;
#[cfg(test)]
pub use query_port::MockQueryPort;
pub use query_port::QueryPort;
