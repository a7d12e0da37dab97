//! REST API over the sizing engine.
//!
//! - `GET /health`: liveness check
//! - `GET /policy`: the policy every request is sized against
//! - `POST /size`: one request → report plus assessment
//! - `POST /compare`: one request → conservative / recommended / aggressive reports
//! - `POST /compare/batteries`: one request → lithium vs lead-acid lifecycle cost

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tracing::info;

use crate::engine::TableEngine;

pub use types::{ErrorResponse, HealthResponse, SizeResponse};

/// Immutable application state shared across all request handlers.
///
/// The engine holds only read-only policy and reference tables, so it is
/// shared through `Arc` without locks.
pub struct AppState {
    pub engine: TableEngine,
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/policy", get(handlers::get_policy))
        .route("/size", post(handlers::size))
        .route("/compare", post(handlers::compare))
        .route("/compare/batteries", post(handlers::compare_batteries))
        .with_state(state)
}

/// Binds to `addr` and serves the API until the process exits.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, router(state)).await
}
