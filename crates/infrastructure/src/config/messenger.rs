//! Messenger configuration: WhatsApp Cloud API credentials and endpoint.

use application::ApplicationError;
use integration_whatsapp::WhatsAppClientConfig;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// WhatsApp integration configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct WhatsAppConfig {
    /// Meta Graph API access token (sensitive - uses SecretString)
    #[serde(default, skip_serializing)]
    pub access_token: Option<SecretString>,

    /// Phone number ID from WhatsApp Business
    #[serde(default)]
    pub phone_number_id: Option<String>,

    /// Verify token for webhook setup
    #[serde(default)]
    pub verify_token: Option<String>,

    /// API version (default: v18.0)
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Graph API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl std::fmt::Debug for WhatsAppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhatsAppConfig")
            .field(
                "access_token",
                &if self.access_token.is_some() {
                    Some("[REDACTED]")
                } else {
                    None
                },
            )
            .field("phone_number_id", &self.phone_number_id)
            .field(
                "verify_token",
                &self.verify_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("api_version", &self.api_version)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn default_api_version() -> String {
    "v18.0".to_string()
}

fn default_base_url() -> String {
    "https://graph.facebook.com".to_string()
}

const fn default_timeout() -> u64 {
    30
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            phone_number_id: None,
            verify_token: None,
            api_version: default_api_version(),
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

impl WhatsAppConfig {
    /// Get the access token as a string reference (for API calls)
    #[must_use]
    pub fn access_token_str(&self) -> Option<&str> {
        self.access_token.as_ref().map(ExposeSecret::expose_secret)
    }

    /// Build the client configuration, failing when credentials are missing
    pub fn client_config(&self) -> Result<WhatsAppClientConfig, ApplicationError> {
        let access_token = self
            .access_token_str()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                ApplicationError::Configuration("whatsapp.access_token is not set".to_string())
            })?;
        let phone_number_id = self
            .phone_number_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                ApplicationError::Configuration("whatsapp.phone_number_id is not set".to_string())
            })?;

        Ok(WhatsAppClientConfig {
            access_token: access_token.to_string(),
            phone_number_id: phone_number_id.to_string(),
            api_version: self.api_version.clone(),
            base_url: self.base_url.clone(),
            timeout_secs: self.timeout_secs,
        })
    }
}
