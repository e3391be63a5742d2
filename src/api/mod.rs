//! HTTP surface for the digest service.

pub mod handlers;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use handlers::AppState;

/// Build the service router over shared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Synchronous digests
        .route("/digest/summary", post(handlers::summarize))
        .route("/digest/sentiment", post(handlers::analyze_sentiment))
        // Background digest jobs
        .route("/digest/jobs", post(handlers::start_digest_job))
        .route("/digest/jobs/:job_id", get(handlers::get_job_status))
        // Effective settings
        .route("/digest/config", get(handlers::get_config))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
