//! `api` crate — HTTP surface for webhook-triggered workflows.
//!
//! Exposes:
//!   ANY /webhook/{path}   — webhook trigger (POST only, others get 405)
//!   GET /health

use axum::{
    routing::{any, get},
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod error;
pub mod handlers;

pub use error::ApiError;
pub use handlers::{AppState, RunOutcome};

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/webhook/{path}", any(handlers::webhooks::handle_webhook))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `addr` and serve until the server stops.
pub async fn serve(addr: &str, state: AppState) -> Result<(), ApiError> {
    let listener = TcpListener::bind(addr).await.map_err(|source| ApiError::Bind {
        addr: addr.to_owned(),
        source,
    })?;
    for path in state.webhook_paths() {
        info!("listening for POST /webhook/{}", path);
    }
    info!("API server listening on {}", addr);
    axum::serve(listener, router(state)).await.map_err(ApiError::Serve)
}
