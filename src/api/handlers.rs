//! HTTP request handlers for the digest service.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::digest::Digester;
use crate::jobs::{JobProcessor, JobStore};
use crate::types::{
    DigestConfig, DigestKind, DigestRequest, DigestResponse, StartDigestJobRequest,
    StartDigestJobResponse,
};

/// Application state shared across handlers.
pub struct AppState {
    pub digester: Arc<Digester>,
    pub job_store: Arc<RwLock<JobStore>>,
    pub config: DigestConfig,
}

impl AppState {
    /// Create state with an empty job store.
    pub fn new(digester: Digester, config: DigestConfig) -> Self {
        Self {
            digester: Arc::new(digester),
            job_store: Arc::new(RwLock::new(JobStore::new())),
            config,
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: String,
    version: String,
}

/// Health check endpoint.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Summarize a transcript.
pub async fn summarize(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DigestRequest>,
) -> (StatusCode, Json<DigestResponse>) {
    run_digest(&state, DigestKind::Summary, request).await
}

/// Analyze the sentiment of a transcript.
pub async fn analyze_sentiment(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DigestRequest>,
) -> (StatusCode, Json<DigestResponse>) {
    run_digest(&state, DigestKind::Sentiment, request).await
}

async fn run_digest(
    state: &AppState,
    kind: DigestKind,
    request: DigestRequest,
) -> (StatusCode, Json<DigestResponse>) {
    info!(%kind, messages = request.messages.len(), "Received digest request");

    let digest = state.digester.digest(kind, &request.messages).await;

    // The body still carries the error markers.
    let status = if digest.is_failure() {
        warn!(
            %kind,
            chunks = digest.chunks,
            failed_chunks = digest.failed_chunks,
            unify_failed = digest.unify_failed,
            "Backend failed to produce a digest"
        );
        StatusCode::BAD_GATEWAY
    } else {
        StatusCode::OK
    };
    (status, Json(digest))
}

/// Start a background digest job.
pub async fn start_digest_job(
    State(state): State<Arc<AppState>>,
    Json(request): Json<StartDigestJobRequest>,
) -> Json<StartDigestJobResponse> {
    let message_count = request.messages.len();

    if message_count == 0 {
        return Json(StartDigestJobResponse {
            job_id: Uuid::nil(),
            accepted: false,
            message_count: 0,
            message: Some("No messages provided".to_string()),
        });
    }

    info!(kind = %request.kind, messages = message_count, "Received digest job request");

    let job_id = {
        let mut store = state.job_store.write().await;
        store.create_job(request.kind, message_count)
    };

    let processor = JobProcessor::new(state.digester.clone());
    let job_store = state.job_store.clone();
    tokio::spawn(async move {
        processor.process_job(job_id, request, job_store).await;
    });

    Json(StartDigestJobResponse {
        job_id,
        accepted: true,
        message_count,
        message: None,
    })
}

/// Get job status.
pub async fn get_job_status(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, StatusCode> {
    let store = state.job_store.read().await;

    match store.get_job_status(job_id) {
        Some(status) => Ok(Json(status)),
        None => Err(StatusCode::NOT_FOUND),
    }
}

/// Effective configuration, without the API key.
pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<DigestConfig> {
    Json(state.config.clone())
}
