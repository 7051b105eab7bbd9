//! ReAct Loop
//!
//! Implements the ReAct (Reasoning + Acting) pattern over a chat
//! conversation: the model thinks, optionally requests one tool from the
//! [`ToolRegistry`](reckon_tools::ToolRegistry) per turn, sees the
//! observation, and eventually states a final answer.
//!
//! Turn replies are read with a deliberately loose line contract:
//!
//! - a line containing `final answer` (any case) ends the loop; the answer is
//!   whatever follows its first colon
//! - otherwise a line starting with `Action:` followed by `<TOOL>[ARGUMENT]`
//!   requests a tool call
//! - both scans run from the last line upward and stop at the first hit
//!
//! See [`ReactLoop`] for a usage example.

mod agent;
mod config;
pub mod parse;

pub use agent::{ReactFailure, ReactLoop, ReactOutcome, ReactTrace};
pub use config::{ReactConfig, ReactPrompts};
pub use parse::{Action, TurnDecision};
