//! Retrying, sanitizing client used by the pipeline.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::{CompletionBackend, OpenAiBackend, RetryPolicy};
use crate::error::BackendError;
use crate::sanitize::{HtmlSanitizer, Sanitizer};
use crate::types::{ChatTurn, DigestConfig};
use crate::ERROR_MARKER;

/// Completion client shared by every chunk call of a pipeline run.
///
/// Cloning is cheap: the transport and sanitizer are reference counted.
#[derive(Clone)]
pub struct BackendClient {
    backend: Arc<dyn CompletionBackend>,
    sanitizer: Arc<dyn Sanitizer>,
    retry: RetryPolicy,
}

impl BackendClient {
    /// Create a client over the given transport with the default sanitizer
    /// and retry policy.
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self {
            backend,
            sanitizer: Arc::new(HtmlSanitizer),
            retry: RetryPolicy::default(),
        }
    }

    /// Create a client for the configured OpenAI-compatible backend.
    pub fn from_config(config: &DigestConfig) -> Result<Self, BackendError> {
        let backend = OpenAiBackend::new(config)?;
        Ok(Self::new(Arc::new(backend)).with_retry(RetryPolicy::with_attempts(config.retry_count)))
    }

    /// Set the sanitizer applied to successful completions.
    pub fn with_sanitizer(mut self, sanitizer: Arc<dyn Sanitizer>) -> Self {
        self.sanitizer = sanitizer;
        self
    }

    /// Set the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Name of the underlying transport.
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Complete a single user prompt.
    pub async fn complete(&self, prompt: &str, timeout: Duration) -> Result<String, BackendError> {
        self.complete_chat(&[ChatTurn::user(prompt)], timeout).await
    }

    /// Complete an ordered conversation.
    ///
    /// Each attempt is bounded by `timeout`; transient failures are retried
    /// according to the retry policy.
    pub async fn complete_chat(
        &self,
        turns: &[ChatTurn],
        timeout: Duration,
    ) -> Result<String, BackendError> {
        let raw = self
            .retry
            .run(|attempt| async move {
                debug!(backend = self.backend.name(), attempt, "Requesting completion");
                match tokio::time::timeout(timeout, self.backend.complete(turns, timeout)).await {
                    Ok(result) => result,
                    Err(_) => Err(BackendError::Timeout(timeout)),
                }
            })
            .await?;

        Ok(self.clean(&raw))
    }

    /// Complete a single prompt, turning any failure into a visible
    /// `Error: ...` string.
    pub async fn complete_or_marker(&self, prompt: &str, timeout: Duration) -> String {
        match self.complete(prompt, timeout).await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "Completion failed, returning error marker");
                format!("{ERROR_MARKER}{e}")
            }
        }
    }

    fn clean(&self, raw: &str) -> String {
        let sanitized = self.sanitizer.sanitize(raw);
        self.sanitizer.convert_emphasis(&sanitized).trim().to_string()
    }
}
