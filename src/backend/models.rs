//! Wire types for the OpenAI-compatible `/chat/completions` endpoint.

use serde::{Deserialize, Serialize};

use crate::error::BackendError;
use crate::types::ChatTurn;

/// Request body.
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [ChatTurn],
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Response body. Only the fields the client reads are modelled.
#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Content of the first choice.
    pub fn into_first_content(self) -> Result<String, BackendError> {
        let choice = self
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| BackendError::Malformed("response has no choices".to_string()))?;

        choice
            .message
            .content
            .ok_or_else(|| BackendError::Malformed("first choice has no content".to_string()))
    }
}
