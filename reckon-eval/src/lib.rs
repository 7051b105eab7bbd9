//! # Reckon Eval
//!
//! Batch evaluation of the reasoning pipeline and the ReAct loop against a
//! question dataset.
//!
//! ## Overview
//!
//! - **Datasets**: load `{input, output?, domain?, complexity?}` entries from
//!   JSON, with optional seeded shuffle and truncation
//! - **Harness**: sequential run controller with cooperative interruption
//! - **Scoring**: exact-match tallies, overall and per domain
//! - **Results**: the `[{"output": ...}]` results file, its validation, and
//!   an optional detailed run report
//!
//! ## Architecture
//!
//! ```text
//! reckon-core (calls, labels, prompts, normalizer)
//!     ↓
//! reckon-tools, reckon-pipeline, reckon-react
//!     ↓
//! reckon-eval (datasets, scoring, persistence, run controller)  ← this crate
//! ```
//!
//! ## Quick Start
//!
//! ```no_run
//! use reckon_core::{HttpChatClient, LlmConfig, PromptBook};
//! use reckon_eval::{Dataset, EvalConfig, EvalHarness, JsonEntryDataset, Sampling};
//! use reckon_tools::ToolRegistry;
//! use std::path::PathBuf;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpChatClient::new(LlmConfig::new("api-key", "my-model"))?;
//! let prompts = PromptBook::default();
//! let tools = ToolRegistry::with_defaults();
//!
//! let dataset = JsonEntryDataset::new(PathBuf::from("dev.json"));
//! let entries = dataset.load(Sampling::all().with_max(20)).await?;
//!
//! let harness = EvalHarness::new(&client, &prompts, &tools, EvalConfig::default())?;
//! let outcome = harness.run(entries, &CancellationToken::new(), |_| {}).await?;
//!
//! print!("{}", outcome.summary);
//! # Ok(())
//! # }
//! ```

pub mod dataset;
pub mod harness;
pub mod results;
pub mod scorer;

// Re-export public API
pub use dataset::{Dataset, DatasetError, Entry, JsonEntryDataset, Sampling};
pub use harness::{EvalConfig, EvalError, EvalHarness, EvalMode, EvalProgress, RunOutcome};
pub use results::{
    read_records, validate_records, write_records, EntryReport, ResultsError, RunRecord,
    RunReport,
};
pub use scorer::{is_exact_match, DomainScore, ScoreSummary, Scoreboard, Tally};
