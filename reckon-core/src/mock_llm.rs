//! Scripted chat client for offline, deterministic runs.
//!
//! [`ScriptedChatClient`] replays a fixed sequence of outcomes, one per call,
//! and records every request it receives. Components that take a
//! `&dyn ChatClient` can be exercised end to end without a backend.
//!
//! # Example
//!
//! ```
//! use reckon_core::{ChatClient, ChatRequest, ScriptedChatClient};
//!
//! # async fn example() {
//! let mock = ScriptedChatClient::new(vec![Ok("math".to_string())]);
//! let text = mock.complete(ChatRequest::with_system("s", "u")).await;
//! assert_eq!(text.unwrap(), "math");
//! assert_eq!(mock.call_count(), 1);
//! # }
//! ```

use crate::error::LlmError;
use crate::llm::{ChatClient, ChatRequest};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Mock client that returns scripted outcomes in order.
///
/// Once the script is exhausted every further call fails with
/// [`LlmError::ScriptExhausted`].
#[derive(Debug)]
pub struct ScriptedChatClient {
    /// Outcomes to replay; `Err` holds the failure text
    script: Vec<Result<String, String>>,

    /// Index of the next outcome
    current_index: AtomicUsize,

    /// Every request received, in call order
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedChatClient {
    /// Create a client replaying `script`. `Err(reason)` entries become
    /// [`LlmError::Other`] failures.
    pub fn new(script: Vec<Result<String, String>>) -> Self {
        Self {
            script,
            current_index: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create a client whose every call succeeds with the given texts.
    pub fn replies<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(texts.into_iter().map(|t| Ok(t.into())).collect())
    }

    /// Number of calls made so far.
    pub fn call_count(&self) -> usize {
        self.current_index.load(Ordering::SeqCst)
    }

    /// Check if all scripted outcomes have been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.call_count() >= self.script.len()
    }

    /// Snapshot of the requests received so far.
    pub fn requests(&self) -> Vec<ChatRequest> {
        match self.requests.lock() {
            Ok(requests) => requests.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn record(&self, request: ChatRequest) {
        match self.requests.lock() {
            Ok(mut requests) => requests.push(request),
            Err(poisoned) => poisoned.into_inner().push(request),
        }
    }
}

#[async_trait]
impl ChatClient for ScriptedChatClient {
    async fn complete(&self, request: ChatRequest) -> Result<String, LlmError> {
        self.record(request);
        let index = self.current_index.fetch_add(1, Ordering::SeqCst);
        match self.script.get(index) {
            Some(Ok(text)) => Ok(text.clone()),
            Some(Err(reason)) => Err(LlmError::Other(reason.clone())),
            None => Err(LlmError::ScriptExhausted(index + 1)),
        }
    }
}
