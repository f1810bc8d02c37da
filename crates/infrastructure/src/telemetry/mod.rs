//! Tracing setup
//!
//! Console logging through `tracing-subscriber`, either human-readable or
//! one JSON object per line.

use tracing_subscriber::{
    EnvFilter, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError,
};

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_LOG_FILTER: &str = "relay_server=info,presentation_http=info,application=info,\
                                      infrastructure=info,integration_whatsapp=info,\
                                      integration_backend=info,tower_http=info";

/// Install the global tracing subscriber
///
/// `log_format` is `"json"` for structured output; anything else selects text.
pub fn init_tracing(log_format: &str) -> Result<(), TryInitError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_target(true),
            )
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init()
    }
}
