//! Self-reflection nudge.

use crate::Tool;

const GENERIC_NUDGE: &str =
    "Reflect: double-check your reasoning, assumptions, and final answer for consistency.";

/// Echoes a prompt that asks the model to reconsider its reasoning.
///
/// Has no side effects; the observation is derived from the argument only.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReflectTool;

impl Tool for ReflectTool {
    fn name(&self) -> &str {
        "reflect"
    }

    fn description(&self) -> &str {
        "Pause and reconsider. Pass the aspect you want to re-examine, or nothing."
    }

    fn invoke(&self, argument: &str) -> String {
        let note = argument.trim();
        if note.is_empty() {
            GENERIC_NUDGE.to_string()
        } else {
            format!("Reflect more carefully on this aspect: {}", note)
        }
    }
}
