//! HTTP interface - the REST surface consumed by the browser client.
//!
//! This module wires the scenario service into an `axum` router. Handlers are
//! thin: they parse the request, call the service, and serialize the result.

/// Mapping from crate errors to HTTP responses
pub mod error;
/// Route handlers
pub mod handlers;

use crate::{core::ScenarioService, errors::Result};
use axum::{
    Router,
    routing::{get, post},
};
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

/// Shared state available to all handlers.
/// Holds the scenario service constructed at startup.
#[derive(Clone)]
pub struct AppState {
    /// Service used for every loan operation
    pub service: Arc<ScenarioService>,
}

impl AppState {
    /// Creates a new `AppState` around the given service.
    #[must_use]
    pub fn new(service: ScenarioService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

/// Builds the router with CORS and request tracing applied.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/loans", post(handlers::create_loan).get(handlers::list_loans))
        .route("/loans/:loan_id", get(handlers::get_loan))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Serves the API on `addr` until Ctrl-C is received.
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("Loan scenario API listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}
