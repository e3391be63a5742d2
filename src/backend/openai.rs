//! HTTP transport for OpenAI-compatible chat completion endpoints.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, error};

use super::models::{ChatCompletionRequest, ChatCompletionResponse};
use super::CompletionBackend;
use crate::error::BackendError;
use crate::types::{ChatTurn, DigestConfig};

/// Client for a `/chat/completions` endpoint.
///
/// The inner `reqwest::Client` holds the connection pool and is cheap to
/// share across concurrent chunk calls.
pub struct OpenAiBackend {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl OpenAiBackend {
    /// Create a new backend from the service configuration.
    pub fn new(config: &DigestConfig) -> Result<Self, BackendError> {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(BackendError::Transport)?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model_name.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl CompletionBackend for OpenAiBackend {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn complete(
        &self,
        messages: &[ChatTurn],
        timeout: Duration,
    ) -> Result<String, BackendError> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        debug!(model = %self.model, messages = messages.len(), "Sending completion request");

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .timeout(timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| BackendError::from_reqwest(e, timeout))?;

        // Check status before parsing
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(%status, %body, "Completion backend error");
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let response: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| BackendError::from_reqwest(e, timeout))?;

        response.into_first_content()
    }
}
