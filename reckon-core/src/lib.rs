//! # Reckon Core
//!
//! Shared building blocks for driving a remote text-generation backend over a
//! batch of questions.
//!
//! - **Model calls**: [`ChatClient`] is the one seam every component calls
//!   through; [`HttpChatClient`] speaks the OpenAI-compatible
//!   `/chat/completions` protocol and [`ScriptedChatClient`] replays canned
//!   outcomes for offline runs.
//! - **Labels**: closed [`Domain`] / [`Complexity`] sets and the
//!   [`Classifier`] that assigns them with a silent fallback.
//! - **Prompts**: [`PromptBook`] tables and the [`CallParams`] table that
//!   scales temperature and token budget with complexity.
//! - **Normalization**: [`normalize_answer`] canonicalizes raw answers for
//!   exact-match scoring.
//!
//! ## Architecture
//!
//! ```text
//! reckon-core (calls, labels, prompts, normalizer)  ← this crate
//!     ↓
//! reckon-tools, reckon-pipeline, reckon-react
//!     ↓
//! reckon-eval (datasets, scoring, persistence, run controller)
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use reckon_core::{Classifier, HttpChatClient, LlmConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpChatClient::new(LlmConfig::new("api-key", "my-model"))?;
//! let classifier = Classifier::new(&client);
//!
//! let domain = classifier.domain("What is 17 * 23?").await;
//! let complexity = classifier.complexity("What is 17 * 23?").await;
//! println!("{} / {}", domain, complexity);
//! # Ok(())
//! # }
//! ```

pub mod classify;
pub mod config;
pub mod error;
pub mod labels;
pub mod llm;
pub mod mock_llm;
pub mod normalize;
pub mod params;
pub mod prompts;
pub mod utils;

// Re-export public API
pub use classify::{Classifier, CLASSIFY_MAX_TOKENS};
pub use config::{LlmConfig, DEFAULT_API_BASE};
pub use error::{ConfigError, LlmError};
pub use labels::{Complexity, Domain};
pub use llm::{ChatClient, ChatMessage, ChatRequest, HttpChatClient, Role};
pub use mock_llm::ScriptedChatClient;
pub use normalize::normalize_answer;
pub use params::CallParams;
pub use prompts::{FewShot, PromptBook, MAX_FEW_SHOT};
pub use utils::{one_line, truncate};
