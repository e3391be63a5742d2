//! Request/response definitions for digests and digest jobs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ChatLine;

/// The kind of digest to produce.
///
/// This determines which prompts and length cap are used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DigestKind {
    /// Short bullet-point summary of the conversation
    Summary,
    /// Overall mood with a positive/neutral/negative breakdown
    Sentiment,
}

impl std::fmt::Display for DigestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DigestKind::Summary => write!(f, "summary"),
            DigestKind::Sentiment => write!(f, "sentiment"),
        }
    }
}

/// Request body for the synchronous digest endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigestRequest {
    /// Transcript in chronological order
    pub messages: Vec<ChatLine>,
}

/// A finished digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigestResponse {
    pub kind: DigestKind,

    /// Final, length-capped text
    pub text: String,

    /// Number of chunks the transcript was split into
    pub chunks: usize,

    /// Number of chunks whose backend call failed
    pub failed_chunks: usize,

    /// The final merge call failed and `text` holds its error marker
    #[serde(default)]
    pub unify_failed: bool,
}

impl DigestResponse {
    /// Whether the text is an error marker rather than a digest: every chunk
    /// call failed, or the merge call did.
    pub fn is_failure(&self) -> bool {
        self.unify_failed || (self.chunks > 0 && self.failed_chunks == self.chunks)
    }
}

/// Request to start a background digest job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartDigestJobRequest {
    pub kind: DigestKind,

    /// Transcript in chronological order
    pub messages: Vec<ChatLine>,
}

/// Response when starting a digest job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartDigestJobResponse {
    /// ID of the created job
    pub job_id: Uuid,

    /// Whether the job was accepted
    pub accepted: bool,

    /// Number of transcript messages queued
    pub message_count: usize,

    /// Optional message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Status of a digest job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DigestJobStatus {
    /// Job is queued but not started
    Pending,
    /// Job is currently running
    Running,
    /// Job completed
    Completed,
    /// Job failed
    Failed,
}

/// Response with job status information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigestJobStatusResponse {
    pub job_id: Uuid,
    pub kind: DigestKind,
    pub status: DigestJobStatus,

    /// Transcript messages submitted with the job
    pub message_count: usize,

    /// Chunks produced, once known
    pub chunks: usize,

    /// Chunks whose backend call failed
    pub failed_chunks: usize,

    /// Final digest text once completed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,

    /// Error message if failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}
