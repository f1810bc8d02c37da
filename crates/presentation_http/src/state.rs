//! Application state shared across handlers

use std::sync::Arc;

use application::RelayService;
use infrastructure::AppConfig;

/// Shared application state
///
/// Built once at startup and never mutated afterwards.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Relay service for inbound messages
    pub relay: Arc<RelayService>,
    /// Application configuration
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Create the state from its parts
    #[must_use]
    pub fn new(relay: RelayService, config: AppConfig) -> Self {
        Self {
            relay: Arc::new(relay),
            config: Arc::new(config),
        }
    }
}
