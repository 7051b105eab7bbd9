//! Chat-completion client for OpenAI-compatible backends.

use super::request::{ChatMessage, ChatRequest};
use crate::config::LlmConfig;
use crate::error::LlmError;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// The model-call primitive.
///
/// One call, one outcome: `Ok` carries the response text (possibly empty),
/// `Err` carries the reason. Implementations never panic and never retry.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Issue a single chat-completion call.
    async fn complete(&self, request: ChatRequest) -> Result<String, LlmError>;
}

/// [`ChatClient`] speaking `POST {api_base}/chat/completions` over HTTP.
pub struct HttpChatClient {
    http: reqwest::Client,
    config: LlmConfig,
}

impl std::fmt::Debug for HttpChatClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpChatClient")
            .field("config", &self.config)
            .finish()
    }
}

#[derive(Serialize)]
struct CompletionBody<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl HttpChatClient {
    /// Create a client with the request timeout taken from `config`.
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::Transport(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { http, config })
    }

    /// Get a reference to the connection settings.
    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    fn map_send_error(&self, error: reqwest::Error) -> LlmError {
        if error.is_timeout() {
            LlmError::Timeout(self.config.timeout.as_millis() as u64)
        } else {
            LlmError::Transport(error.to_string())
        }
    }
}

#[async_trait]
impl ChatClient for HttpChatClient {
    async fn complete(&self, request: ChatRequest) -> Result<String, LlmError> {
        let body = CompletionBody {
            model: &self.config.model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        log::debug!(
            "POST {} ({} messages, temperature {}, max_tokens {})",
            self.config.completions_url(),
            request.messages.len(),
            request.temperature,
            request.max_tokens
        );

        let response = self
            .http
            .post(self.config.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| self.map_send_error(e))?;

        if status != StatusCode::OK {
            return Err(LlmError::Backend {
                status: status.as_u16(),
                body: error_text(&text, status),
            });
        }

        let parsed: CompletionResponse =
            serde_json::from_str(&text).map_err(|e| LlmError::Decode(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .unwrap_or_default();

        Ok(content.trim().to_string())
    }
}

/// Best-effort error text: compact JSON when the body parses, raw text otherwise.
fn error_text(body: &str, status: StatusCode) -> String {
    if body.trim().is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("empty error body")
            .to_string();
    }
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => value.to_string(),
        Err(_) => body.trim().to_string(),
    }
}
