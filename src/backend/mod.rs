//! Text-generation backend: transport, retry policy and the retrying client.

mod client;
mod models;
mod openai;
mod retry;

#[cfg(test)]
pub(crate) mod testing;

use std::time::Duration;

use async_trait::async_trait;

use crate::error::BackendError;
use crate::types::ChatTurn;

pub use client::BackendClient;
pub use models::{ChatCompletionRequest, ChatCompletionResponse};
pub use openai::OpenAiBackend;
pub use retry::RetryPolicy;

/// A single-attempt completion transport.
///
/// Implementations perform exactly one request and return the raw content
/// of the first completion. Retries, timeouts and sanitization are layered
/// on top by [`BackendClient`].
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Get the name of this backend.
    fn name(&self) -> &'static str;

    /// Send `messages` and return the first completion's content.
    async fn complete(&self, messages: &[ChatTurn], timeout: Duration)
        -> Result<String, BackendError>;
}
