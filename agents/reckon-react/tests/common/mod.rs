//! Shared test utilities for integration tests

#![allow(dead_code)]

use reckon_core::{HttpChatClient, LlmConfig, ScriptedChatClient};
use std::env;
use std::time::Duration;

/// Helper to get the API key, or return None if not available.
pub fn get_api_key() -> Option<String> {
    env::var("OPENAI_API_KEY").ok()
}

/// Create a live client from the environment with test-friendly settings.
pub fn create_live_client(api_key: &str) -> HttpChatClient {
    let mut config = LlmConfig::new(
        api_key,
        env::var("MODEL_NAME").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
    )
    .with_timeout(Duration::from_secs(60));
    if let Ok(base) = env::var("API_BASE") {
        config = config.with_api_base(base);
    }
    HttpChatClient::new(config).expect("client should build")
}

/// Scripted client replaying one turn per text.
pub fn scripted(turns: &[&str]) -> ScriptedChatClient {
    ScriptedChatClient::replies(turns.iter().copied())
}
