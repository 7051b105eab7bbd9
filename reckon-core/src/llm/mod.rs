//! Model-call primitive for OpenAI-compatible chat backends.
//!
//! Provides:
//! - [`ChatClient`], the single seam every component calls through
//! - [`HttpChatClient`], a `reqwest` implementation with per-request timeout
//! - [`ChatRequest`] / [`ChatMessage`] for building conversations
//!
//! # Example
//!
//! ```no_run
//! use reckon_core::{ChatClient, ChatRequest, HttpChatClient, LlmConfig};
//!
//! # async fn example() -> Result<(), reckon_core::LlmError> {
//! let client = HttpChatClient::new(LlmConfig::new("api-key", "my-model"))?;
//! let request = ChatRequest::with_system("Reply tersely.", "What is 6 * 7?");
//!
//! match client.complete(request).await {
//!     Ok(text) => println!("Model: {}", text),
//!     Err(e) => println!("Error: {}", e),
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod request;

pub use client::{ChatClient, HttpChatClient};
pub use request::{ChatMessage, ChatRequest, Role};
