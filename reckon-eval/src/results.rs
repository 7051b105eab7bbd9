//! Run records, persistence and the optional run report.
//!
//! The results file is the run's deliverable: a pretty-printed JSON array of
//! `{"output": "..."}` objects in processing order. The report is a separate,
//! richer document for inspection.

use crate::scorer::ScoreSummary;
use reckon_core::{Complexity, Domain};
use reckon_react::ReactTrace;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Errors writing or validating persisted results.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ResultsError {
    #[error("Failed to access results file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize results: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Results file holds {found} records, expected {expected}")]
    CountMismatch { expected: usize, found: usize },
}

/// One persisted answer. Empty when the entry produced none.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecord {
    pub output: String,
}

impl RunRecord {
    pub fn from_answer(answer: Option<&str>) -> Self {
        Self {
            output: answer.unwrap_or_default().to_string(),
        }
    }
}

/// Write records as a pretty-printed JSON array, replacing any existing file.
pub fn write_records(path: &Path, records: &[RunRecord]) -> Result<(), ResultsError> {
    let json = serde_json::to_string_pretty(records)?;
    std::fs::write(path, json)?;
    log::info!("Wrote {} records to {:?}", records.len(), path);
    Ok(())
}

pub fn read_records(path: &Path) -> Result<Vec<RunRecord>, ResultsError> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Re-read the results file and check it holds exactly `expected` records.
///
/// Returns the record count on success.
pub fn validate_records(path: &Path, expected: usize) -> Result<usize, ResultsError> {
    let found = read_records(path)?.len();
    if found != expected {
        return Err(ResultsError::CountMismatch { expected, found });
    }
    Ok(found)
}

/// Per-entry details for console output and the run report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryReport {
    /// 1-based position in processing order
    pub index: usize,

    pub input: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,

    pub domain: Domain,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub complexity: Option<Complexity>,

    /// Draft from the reasoning pass (pipeline mode)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,

    /// Loop trace (ReAct mode)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<ReactTrace>,

    pub answer: Option<String>,

    /// `None` when the entry was not scored
    pub correct: Option<bool>,

    pub errors: Vec<String>,
}

impl EntryReport {
    /// Multi-line console block for this entry.
    pub fn render(&self, total: usize, verbose: bool) -> String {
        let complexity = self
            .complexity
            .map(|c| c.to_string())
            .unwrap_or_else(|| "-".to_string());
        let mark = match self.correct {
            Some(true) => "✓",
            Some(false) => "✗",
            None => "·",
        };

        let mut lines = vec![
            format!(
                "[{}/{}] {} ({} / {})",
                self.index,
                total,
                mark,
                self.domain,
                complexity
            ),
            format!("  Q: {}", reckon_core::truncate(&reckon_core::one_line(&self.input), 120)),
        ];
        // A draft with no extracted answer is always shown.
        if verbose || self.answer.is_none() {
            if let Some(reasoning) = &self.reasoning {
                lines.push(format!(
                    "  Reasoning: {}",
                    reckon_core::truncate(&reckon_core::one_line(reasoning), 300)
                ));
            }
        }
        if let Some(trace) = &self.trace {
            if verbose {
                for (turn, text) in trace.turns.iter().enumerate() {
                    lines.push(format!(
                        "  Turn {}: {}",
                        turn + 1,
                        reckon_core::truncate(&reckon_core::one_line(text), 200)
                    ));
                }
            }
            if !trace.tool_calls.is_empty() {
                lines.push(format!(
                    "  Tools: {} calls, {} failed",
                    trace.tool_calls.len(),
                    trace.failed_tool_calls()
                ));
            }
        }
        lines.push(format!(
            "  Answer: {}",
            self.answer.as_deref().unwrap_or("(none)")
        ));
        if let Some(expected) = &self.expected {
            lines.push(format!("  Expected: {}", expected));
        }
        for error in &self.errors {
            lines.push(format!("  Error: {}", error));
        }
        lines.join("\n")
    }
}

/// Full account of a run, written with `--report`.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub dataset: String,
    pub mode: String,
    pub entries: Vec<EntryReport>,
    pub summary: ScoreSummary,
    pub interrupted: bool,
    #[serde(with = "duration_serde")]
    pub duration: Duration,
}

impl RunReport {
    /// Write the report to a JSON file.
    pub fn write_json(&self, path: &Path) -> Result<(), ResultsError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Custom serde for Duration to serialize as seconds (f64).
mod duration_serde {
    use serde::{Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }
}
