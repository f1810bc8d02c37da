//! Backend query adapter
//!
//! Implements the `QueryPort` trait using the backend integration crate.

use application::error::ApplicationError;
use application::ports::QueryPort;
use async_trait::async_trait;
use integration_backend::{BackendClient, BackendConfig, BackendError};
use tracing::instrument;

/// Adapter that implements `QueryPort` using `BackendClient`
#[derive(Debug)]
pub struct BackendQueryAdapter {
    client: BackendClient,
}

impl BackendQueryAdapter {
    /// Create a new backend query adapter
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: BackendConfig) -> Result<Self, BackendError> {
        Ok(Self {
            client: BackendClient::new(config)?,
        })
    }
}

#[async_trait]
impl QueryPort for BackendQueryAdapter {
    #[instrument(skip(self, text))]
    async fn query(&self, text: &str) -> Result<String, ApplicationError> {
        self.client
            .query(text)
            .await
            .map_err(|e| ApplicationError::ExternalService(format!("Backend query failed: {e}")))
    }
}
