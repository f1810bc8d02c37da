//! Domain layer for the WhatsApp relay
//!
//! Contains the transient message types that flow through one relay
//! round-trip. Nothing here performs I/O or is persisted.

pub mod entities;

pub use entities::*;
