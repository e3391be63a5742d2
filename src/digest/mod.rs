//! Summary and sentiment digests built on the chunk pipeline.
//!
//! Each digest runs the transcript through the pipeline, sends the combined
//! partial results to the backend once more to unify them, and caps the
//! final text locally in case the backend ignores the length instruction.

pub mod sentiment;
pub mod summary;

use std::time::Duration;

use tracing::{info, warn};

use crate::combine::{count_failed, join_partials};
use crate::pipeline::{enforce_length, Pipeline, PipelineOptions};
use crate::types::{render_transcript, ChatLine, DigestConfig, DigestKind, DigestResponse};
use crate::ERROR_MARKER;

/// Prompts and limits for one kind of digest.
#[derive(Clone, Copy)]
pub struct DigestProfile {
    pub kind: DigestKind,
    /// Per-chunk prompt from `(chunk_text, index, total)`
    pub partial_prompt: fn(&str, usize, usize) -> String,
    /// Final merge prompt from the combined partial results
    pub unify_prompt: fn(&str) -> String,
    /// Hard cap on the final text, in characters
    pub max_chars: usize,
    /// Returned for an empty transcript
    pub empty_message: &'static str,
}

impl DigestProfile {
    /// Get the profile for the given kind.
    pub fn for_kind(kind: DigestKind) -> Self {
        match kind {
            DigestKind::Summary => summary::profile(),
            DigestKind::Sentiment => sentiment::profile(),
        }
    }
}

/// Runs digests against a shared pipeline.
#[derive(Clone)]
pub struct Digester {
    pipeline: Pipeline,
    options: PipelineOptions,
    unify_timeout: Duration,
}

impl Digester {
    /// Create a new digester.
    pub fn new(pipeline: Pipeline, options: PipelineOptions, unify_timeout: Duration) -> Self {
        Self {
            pipeline,
            options,
            unify_timeout,
        }
    }

    /// Create a digester with options taken from the service configuration.
    pub fn from_config(pipeline: Pipeline, config: &DigestConfig) -> Self {
        Self::new(pipeline, PipelineOptions::from_config(config), config.timeout())
    }

    /// Produce a digest of the given kind for a transcript.
    pub async fn digest(&self, kind: DigestKind, lines: &[ChatLine]) -> DigestResponse {
        self.digest_text(kind, &render_transcript(lines)).await
    }

    /// Produce a digest of the given kind for already rendered text.
    pub async fn digest_text(&self, kind: DigestKind, text: &str) -> DigestResponse {
        let profile = DigestProfile::for_kind(kind);

        let partials = self
            .pipeline
            .run_partials(text, &profile.partial_prompt, &self.options)
            .await;
        if partials.is_empty() {
            return DigestResponse {
                kind,
                text: profile.empty_message.to_string(),
                chunks: 0,
                failed_chunks: 0,
                unify_failed: false,
            };
        }

        let failed_chunks = count_failed(&partials);
        let combined = join_partials(&partials);

        let mut unify_failed = false;
        let text = if failed_chunks == partials.len() {
            // Nothing for the backend to unify
            warn!(%kind, chunks = partials.len(), "Every chunk failed, skipping unify");
            combined
        } else {
            let prompt = (profile.unify_prompt)(&combined);
            match self
                .pipeline
                .backend()
                .complete(&prompt, self.unify_timeout)
                .await
            {
                Ok(text) => text,
                Err(e) => {
                    warn!(%kind, error = %e, "Unify call failed");
                    unify_failed = true;
                    format!("{ERROR_MARKER}{e}")
                }
            }
        };

        let final_text = enforce_length(&text, profile.max_chars);
        info!(
            %kind,
            chunks = partials.len(),
            failed_chunks,
            chars = final_text.chars().count(),
            "Digest complete"
        );

        DigestResponse {
            kind,
            text: final_text,
            chunks: partials.len(),
            failed_chunks,
            unify_failed,
        }
    }
}
