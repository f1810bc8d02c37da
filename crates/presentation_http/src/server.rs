//! Server lifecycle
//!
//! Serves the router until a shutdown signal arrives, then gives open
//! connections a bounded time to finish.

use std::{
    future::{Future, IntoFuture},
    io,
    time::Duration,
};

use axum::Router;
use tokio::{net::TcpListener, sync::watch};
use tracing::{info, warn};

/// How the server stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownOutcome {
    /// Every connection closed within the drain timeout
    Drained,
    /// The drain timeout elapsed with connections still open
    TimedOut,
}

/// Serve `app` until `signal` resolves, then drain for at most `drain_timeout`
///
/// Connections still open when the timeout elapses are dropped.
pub async fn serve(
    listener: TcpListener,
    app: Router,
    signal: impl Future<Output = ()> + Send + 'static,
    drain_timeout: Duration,
) -> io::Result<ShutdownOutcome> {
    let (fired_tx, mut fired_rx) = watch::channel(false);

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            signal.await;
            let _ = fired_tx.send(true);
        })
        .into_future();

    let deadline = async move {
        if fired_rx.wait_for(|fired| *fired).await.is_err() {
            std::future::pending::<()>().await;
        }
        info!("Waiting up to {:?} for connections to close...", drain_timeout);
        tokio::time::sleep(drain_timeout).await;
    };

    tokio::select! {
        result = server => result.map(|()| ShutdownOutcome::Drained),
        () = deadline => {
            warn!(?drain_timeout, "Shutdown drain timed out, dropping open connections");
            Ok(ShutdownOutcome::TimedOut)
        }
    }
}
