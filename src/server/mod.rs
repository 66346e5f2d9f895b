//! Push endpoint server.
//!
//! Serves a single route, [`PUSH_PATH`], accepting any method so that even
//! malformed deliveries get a failure outcome and an acknowledgment. Each
//! request runs independently; the only shared state is the immutable fetcher
//! and publisher.

mod handler;
mod stage;

use std::future::Future;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::routing::any;
use axum::Router;
use log::info;
use tokio::net::TcpListener;

use crate::config::{Config, PUSH_PATH};
use crate::fetch::{FetchSettings, Fetcher};
use crate::publish::OutcomePublisher;

pub use handler::{process_envelope, push_handler, run_pipeline};
pub use stage::Stage;

/// Shared, read-only state handed to every request.
#[derive(Clone)]
pub struct AppState {
    /// Outbound fetch client
    pub fetcher: Arc<Fetcher>,
    /// Outcome sink
    pub publisher: Arc<OutcomePublisher>,
}

impl AppState {
    /// Wraps both components for sharing across requests.
    pub fn new(fetcher: Fetcher, publisher: OutcomePublisher) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            publisher: Arc::new(publisher),
        }
    }
}

/// Router with the push route mounted.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(PUSH_PATH, any(push_handler))
        .with_state(state)
}

/// Serves on an already-bound listener until `shutdown` resolves.
///
/// # Errors
///
/// Returns an error if the server fails after binding.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}

/// Builds the fetcher and publisher from `config`, binds the port, and serves
/// until SIGINT or SIGTERM.
///
/// # Errors
///
/// Returns an error if a client cannot be built or the port cannot be bound.
pub async fn run_server(config: Config) -> Result<()> {
    let fetcher =
        Fetcher::new(&FetchSettings::default()).context("Failed to initialize HTTP client")?;
    let publisher =
        OutcomePublisher::from_config(&config).context("Failed to initialize publisher")?;
    info!("Publishing outcomes to {}", publisher.describe());

    let listener = TcpListener::bind(("0.0.0.0", config.port))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to port {}: {}", config.port, e))?;
    info!("Starting server on port {}", config.port);

    serve(listener, AppState::new(fetcher, publisher), shutdown_signal()).await?;
    info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                log::warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received, draining in-flight requests");
}
