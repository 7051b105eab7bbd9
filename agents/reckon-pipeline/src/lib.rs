//! Reasoning + Extraction Pipeline
//!
//! Two sequential model calls per question: a reasoning pass whose
//! temperature and token budget scale with complexity, then an extraction
//! pass that reduces the draft to a bare, normalized answer.
//!
//! # Example
//!
//! ```no_run
//! use reckon_core::{Complexity, Domain, HttpChatClient, LlmConfig, PromptBook};
//! use reckon_pipeline::{Pipeline, PipelineConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpChatClient::new(LlmConfig::new("api-key", "my-model"))?;
//! let prompts = PromptBook::default();
//! let pipeline = Pipeline::new(&client, &prompts, PipelineConfig::default())?;
//!
//! let result = pipeline
//!     .run("What is 25 * 4?", Domain::Math, Some(Complexity::Easy))
//!     .await;
//! println!("{:?}", result.final_answer);
//! # Ok(())
//! # }
//! ```

mod config;
mod pipeline;

pub use config::PipelineConfig;
pub use pipeline::{extraction_message, Pipeline, PipelineResult, Stage, StageError};
