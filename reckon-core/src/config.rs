use std::fmt;
use std::time::Duration;

/// Default base URL for an OpenAI-compatible backend.
pub const DEFAULT_API_BASE: &str = "http://localhost:8000/v1";

/// Connection settings for the chat-completion backend.
///
/// Resolved by the binary (flags, environment, `.env`) and handed to
/// [`HttpChatClient`](crate::HttpChatClient). Library code never reads the
/// environment itself.
#[derive(Clone)]
#[non_exhaustive]
pub struct LlmConfig {
    /// Base URL; `/chat/completions` is appended per call
    pub api_base: String,

    /// Bearer token sent with every request
    pub api_key: String,

    /// Model name placed in the request body
    pub model: String,

    /// Timeout for individual requests
    ///
    /// Default: 120 seconds
    pub timeout: Duration,
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_base", &self.api_base)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl LlmConfig {
    /// Create a configuration for the given credentials and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: api_key.into(),
            model: model.into(),
            timeout: Duration::from_secs(120),
        }
    }

    /// Set the base URL. A trailing slash is dropped.
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the timeout for individual requests.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full URL of the chat-completions endpoint.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_base)
    }
}
