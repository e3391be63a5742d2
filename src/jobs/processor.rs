//! Job processor for background digests.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::store::JobStore;
use crate::digest::Digester;
use crate::types::StartDigestJobRequest;

/// Processor that runs digest jobs in the background.
pub struct JobProcessor {
    digester: Arc<Digester>,
}

impl JobProcessor {
    /// Create a new job processor.
    pub fn new(digester: Arc<Digester>) -> Self {
        Self { digester }
    }

    /// Run a digest job and record the outcome in `job_store`.
    ///
    /// A job fails when its digest task panics, when every chunk call
    /// failed, or when the final merge call failed; otherwise it completes
    /// with the digest text.
    pub async fn process_job(
        &self,
        job_id: Uuid,
        request: StartDigestJobRequest,
        job_store: Arc<RwLock<JobStore>>,
    ) {
        info!(
            job_id = %job_id,
            kind = %request.kind,
            messages = request.messages.len(),
            "Starting job processing"
        );

        {
            let mut store = job_store.write().await;
            store.start_job(job_id);
        }

        let digester = self.digester.clone();
        let kind = request.kind;
        let outcome =
            tokio::spawn(async move { digester.digest(kind, &request.messages).await }).await;

        let mut store = job_store.write().await;
        match outcome {
            Ok(digest) if digest.is_failure() => {
                warn!(
                    job_id = %job_id,
                    chunks = digest.chunks,
                    failed_chunks = digest.failed_chunks,
                    unify_failed = digest.unify_failed,
                    "Digest failed"
                );
                store.fail_job_with_digest(job_id, digest);
            }
            Ok(digest) => {
                info!(
                    job_id = %job_id,
                    chunks = digest.chunks,
                    failed_chunks = digest.failed_chunks,
                    "Job processing complete"
                );
                store.complete_job(job_id, digest);
            }
            Err(e) => {
                error!(job_id = %job_id, error = %e, "Digest task aborted");
                store.fail_job(job_id, format!("digest task aborted: {e}"));
            }
        }
    }
}
