//! Query port - the backend that computes reply text

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Backend query service
#[cfg_attr(test, automock)]
#[async_trait]
pub trait QueryPort: Send + Sync {
    /// Ask the backend about `text` and return the reply text it produced
    async fn query(&self, text: &str) -> Result<String, ApplicationError>;
}
