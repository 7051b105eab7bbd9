//! # Reckon Tools
//!
//! Sandboxed helper capabilities the ReAct loop can invoke by name.
//!
//! | Name      | Tool            | Effect                                  |
//! |-----------|-----------------|-----------------------------------------|
//! | `math`    | [`MathTool`]    | whitelisted arithmetic evaluation       |
//! | `python`  | [`PythonTool`]  | Python 3 compile check, no exec         |
//! | `reflect` | [`ReflectTool`] | echoes a reconsideration prompt         |
//!
//! No tool performs network I/O or touches the filesystem. Every failure is
//! reported as an `ERROR:`-prefixed observation rather than a Rust error, so
//! a bad call never aborts the conversation that issued it.

mod math;
mod python;
mod reflect;
mod registry;

pub use math::{MathError, MathTool};
pub use python::{PythonTool, SyntaxFault, SYNTAX_OK};
pub use reflect::ReflectTool;
pub use registry::ToolRegistry;

use serde::Serialize;
use std::fmt::Debug;

/// A named, synchronous capability.
///
/// `invoke` always produces an observation string; faults are encoded in
/// the text with an `ERROR:` prefix.
pub trait Tool: Debug + Send + Sync {
    /// Registry key. Matched case-insensitively.
    fn name(&self) -> &str;

    /// One-line description shown to the model.
    fn description(&self) -> &str;

    fn invoke(&self, argument: &str) -> String;
}

/// One tool call and what it returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolInvocation {
    pub tool_name: String,
    pub argument: String,
    pub observation: String,
}

impl ToolInvocation {
    pub fn is_error(&self) -> bool {
        self.observation.starts_with("ERROR:") || self.observation.starts_with("SYNTAX ERROR:")
    }
}
