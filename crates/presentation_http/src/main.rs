//! WhatsApp relay HTTP server
//!
//! Main entry point for the webhook server.

use std::{sync::Arc, time::Duration};

use application::{MessengerPort, QueryPort, RelayService};
use infrastructure::{AppConfig, BackendQueryAdapter, WhatsAppMessengerAdapter, init_tracing};
use presentation_http::{create_router, server, state::AppState};
use tokio::{net::TcpListener, signal};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration (.env first, then the environment)
    let config = AppConfig::load()?;

    init_tracing(&config.server.log_format)?;

    info!("WhatsApp relay v{} starting...", env!("CARGO_PKG_VERSION"));
    info!(
        host = %config.server.host,
        port = %config.server.port,
        backend = %config.backend.api_url,
        "Configuration loaded"
    );

    if config.whatsapp.verify_token.is_none() {
        warn!("VERIFY_TOKEN not set, webhook verification will always be rejected");
    }

    // Initialize adapters
    let messenger = WhatsAppMessengerAdapter::new(config.whatsapp.client_config()?)
        .map_err(|e| anyhow::anyhow!("Failed to initialize WhatsApp client: {e}"))?;
    let backend = BackendQueryAdapter::new(config.backend.clone())
        .map_err(|e| anyhow::anyhow!("Failed to initialize backend client: {e}"))?;

    let messenger: Arc<dyn MessengerPort> = Arc::new(messenger);
    let backend: Arc<dyn QueryPort> = Arc::new(backend);

    let relay = RelayService::new(messenger, backend);

    let addr = config.server.bind_address();
    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_secs);

    let app = create_router(AppState::new(relay, config)).layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(&addr).await?;

    info!("Server listening on http://{}", addr);

    let outcome = server::serve(listener, app, shutdown_signal(), shutdown_timeout).await?;

    info!(?outcome, "Server shutdown complete");

    Ok(())
}

/// Wait for shutdown signals (SIGINT, SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
