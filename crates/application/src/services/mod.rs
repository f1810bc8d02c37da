//! Application services

mod relay_service;

pub use relay_service::{FALLBACK_REPLY, RelayService};
