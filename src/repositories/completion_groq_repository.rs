use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

use crate::{configuration::GroqSettings, helper::error_chain_fmt};

/// Client for the Groq chat-completions API (OpenAI-compatible).
///
/// Model and decoding temperature are fixed by configuration. One prompt, one
/// blocking exchange: no retry, no streaming, no rate limiting.
pub struct GroqCompletionRepository {
    client: reqwest::Client,
    base_url: String,
    // To keep the credential secret and avoid leaks in logs
    api_key: Secret<String>,
    model: String,
    temperature: f32,
}

#[derive(thiserror::Error)]
pub enum GroqCompletionRepositoryError {
    #[error("Failed to call the completion API: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("The completion API answered with status {status}: {body}")]
    ApiError { status: u16, body: String },
    #[error("The completion API answered with no choice")]
    EmptyCompletion,
}

impl std::fmt::Debug for GroqCompletionRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl GroqCompletionRepository {
    pub fn new(settings: &GroqSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: settings.base_url.clone(),
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            temperature: settings.temperature,
        }
    }

    /// Requests a single chat completion for the given prompt.
    ///
    /// # Returns
    /// The content of the first choice, trimmed.
    /// Any transport or API failure propagates unrecovered to the caller.
    #[tracing::instrument(name = "Requesting a chat completion", skip(self, prompt))]
    pub async fn complete(&self, prompt: &str) -> Result<String, GroqCompletionRepositoryError> {
        let request_body = ChatCompletionRequest {
            model: &self.model,
            temperature: self.temperature,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(format!("{}/openai/v1/chat/completions", self.base_url))
            .bearer_auth(self.api_key.expose_secret())
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GroqCompletionRepositoryError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatCompletionResponse = response.json().await?;
        let content = completion
            .choices
            .into_iter()
            .next()
            .ok_or(GroqCompletionRepositoryError::EmptyCompletion)?
            .message
            .content;

        Ok(content.trim().to_owned())
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatCompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChoice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: String,
}
