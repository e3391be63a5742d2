//! Chat Digest Service - Main Entry Point
//!
//! Summarizes and scores the sentiment of long chat transcripts through an
//! OpenAI-compatible backend.

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chat_digest::api::{self, AppState};
use chat_digest::{BackendClient, DigestConfig, Digester, Pipeline};

/// How often finished jobs are swept from the store.
const JOB_CLEANUP_INTERVAL: Duration = Duration::from_secs(300);

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "chat_digest=info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = DigestConfig::load()?;

    info!("Starting Chat Digest Service v{}", env!("CARGO_PKG_VERSION"));
    info!(
        model = %config.model_name,
        chunk_size = config.chunk_size,
        max_workers = config.max_workers,
        retry_count = config.retry_count,
        "Loaded configuration"
    );

    // Initialize components
    let backend = BackendClient::from_config(&config)?;
    let digester = Digester::from_config(Pipeline::new(backend), &config);
    let state = Arc::new(AppState::new(digester, config));

    let job_store = state.job_store.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(JOB_CLEANUP_INTERVAL);
        loop {
            ticker.tick().await;
            let removed = job_store.write().await.cleanup_old_jobs();
            if removed > 0 {
                info!(removed, "Cleaned up finished jobs");
            }
        }
    });

    let app = api::router(state);

    // Start server
    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3017);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
