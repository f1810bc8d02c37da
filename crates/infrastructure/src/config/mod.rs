//! Application configuration
//!
//! Split into focused sub-modules:
//! - `server`: HTTP server settings
//! - `messenger`: WhatsApp credentials and endpoint
//!
//! The backend section reuses `integration_backend::BackendConfig`.

mod messenger;
mod server;

use config::{Config, ConfigError, Environment, File, Map};
use integration_backend::BackendConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use messenger::WhatsAppConfig;
pub use server::ServerConfig;

/// Prefix of the structured environment variables (e.g. `RELAY_SERVER__PORT`)
pub const ENV_PREFIX: &str = "RELAY";

/// Plain deployment variables and the config keys they set
///
/// These win over every other source.
const PLAIN_ENV_KEYS: [(&str, &str); 5] = [
    ("PORT", "server.port"),
    ("VERIFY_TOKEN", "whatsapp.verify_token"),
    ("ACCESS_TOKEN", "whatsapp.access_token"),
    ("PHONE_NUMBER_ID", "whatsapp.phone_number_id"),
    ("BACKEND_API_URL", "backend.api_url"),
];

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// WhatsApp configuration
    #[serde(default)]
    pub whatsapp: WhatsAppConfig,

    /// Backend query service configuration
    #[serde(default)]
    pub backend: BackendConfig,
}

impl AppConfig {
    /// Load configuration from `.env`, the process environment and an optional file
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!(path = %path.display(), "Loaded .env file");
        }

        Self::load_from_env(std::env::vars().collect())
    }

    /// Load configuration using `vars` in place of the process environment
    ///
    /// Sources, lowest priority first: built-in defaults, `config.toml`,
    /// `RELAY_*` variables, plain deployment variables (`PORT`, `ACCESS_TOKEN`, ...).
    pub fn load_from_env(vars: Map<String, String>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            // Start with defaults
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            // Load from file if exists
            .add_source(File::with_name("config").required(false))
            // Override with environment variables (e.g., RELAY_WHATSAPP__ACCESS_TOKEN)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(Some(vars.clone())),
            );

        for (var, key) in PLAIN_ENV_KEYS {
            builder = builder.set_override_option(key, vars.get(var).cloned())?;
        }

        builder.build()?.try_deserialize()
    }
}
