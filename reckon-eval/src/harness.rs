//! Run controller for batch evaluation.
//!
//! The [`EvalHarness`] walks entries one at a time through classification,
//! the selected solver, normalization and scoring. It then persists one
//! record per processed entry and re-reads the file to check the count.

use crate::dataset::{DatasetError, Entry};
use crate::results::{validate_records, write_records, EntryReport, ResultsError, RunRecord};
use crate::scorer::{ScoreSummary, Scoreboard};
use reckon_core::{
    normalize_answer, ChatClient, Classifier, Complexity, ConfigError, Domain, PromptBook,
};
use reckon_pipeline::{Pipeline, PipelineConfig};
use reckon_react::{ReactConfig, ReactLoop};
use reckon_tools::ToolRegistry;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Errors that abort a run.
///
/// Per-entry failures never appear here; they are recorded in the entry's
/// report and the run moves on.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EvalError {
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    #[error("Results error: {0}")]
    Results(#[from] ResultsError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Which solver answers each entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EvalMode {
    /// Two-pass reasoning then extraction
    #[default]
    Pipeline,
    /// Tool-using think/act/observe loop
    React,
}

impl EvalMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            EvalMode::Pipeline => "pipeline",
            EvalMode::React => "react",
        }
    }
}

impl fmt::Display for EvalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EvalMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pipeline" => Ok(EvalMode::Pipeline),
            "react" => Ok(EvalMode::React),
            other => Err(format!(
                "unknown mode '{}' (expected 'pipeline' or 'react')",
                other
            )),
        }
    }
}

/// Progress events emitted during a run.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum EvalProgress {
    /// Entries are about to be processed.
    Started { total: usize },
    /// One entry finished, whatever its outcome.
    EntryCompleted {
        completed: usize,
        total: usize,
        report: Box<EntryReport>,
    },
}

/// Configuration for the run controller.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct EvalConfig {
    pub mode: EvalMode,

    /// Classify entries whose labels are missing (default: true).
    ///
    /// When off, a missing domain becomes the fallback label and a missing
    /// complexity stays absent. ReAct runs never classify complexity.
    pub classify: bool,

    /// Where the results file is written
    pub output: PathBuf,

    pub pipeline: PipelineConfig,

    pub react: ReactConfig,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            mode: EvalMode::default(),
            classify: true,
            output: PathBuf::from("results.json"),
            pipeline: PipelineConfig::default(),
            react: ReactConfig::default(),
        }
    }
}

impl EvalConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_mode(mut self, mode: EvalMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_classify(mut self, classify: bool) -> Self {
        self.classify = classify;
        self
    }

    #[must_use]
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    #[must_use]
    pub fn with_pipeline(mut self, pipeline: PipelineConfig) -> Self {
        self.pipeline = pipeline;
        self
    }

    #[must_use]
    pub fn with_react(mut self, react: ReactConfig) -> Self {
        self.react = react;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut problems = Vec::new();
        if self.output.as_os_str().is_empty() {
            problems.push("output path must not be empty".to_string());
        }
        if let Err(ConfigError::Invalid(msg)) = self.pipeline.validate() {
            problems.push(msg);
        }
        if let Err(ConfigError::Invalid(msg)) = self.react.validate() {
            problems.push(msg);
        }
        ConfigError::check(problems)
    }
}

/// Everything a finished run produced.
#[derive(Debug)]
pub struct RunOutcome {
    /// Persisted records, in processing order
    pub records: Vec<RunRecord>,

    pub reports: Vec<EntryReport>,

    pub summary: ScoreSummary,

    /// True if the run stopped before the last entry
    pub interrupted: bool,

    pub duration: Duration,

    /// Set when the re-read results file did not match the processed count
    pub validation: Option<ResultsError>,
}

impl RunOutcome {
    pub fn processed(&self) -> usize {
        self.records.len()
    }
}

/// Sequential run controller.
///
/// # Example
///
/// ```no_run
/// use reckon_core::{HttpChatClient, LlmConfig, PromptBook};
/// use reckon_eval::{EvalConfig, EvalHarness, EvalMode, Entry};
/// use reckon_tools::ToolRegistry;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HttpChatClient::new(LlmConfig::new("api-key", "my-model"))?;
/// let prompts = PromptBook::default();
/// let tools = ToolRegistry::with_defaults();
/// let config = EvalConfig::new().with_mode(EvalMode::React);
/// let harness = EvalHarness::new(&client, &prompts, &tools, config)?;
///
/// let entries = vec![Entry::new("What is 17 * 23?").with_output("391")];
/// let outcome = harness.run(entries, &CancellationToken::new(), |_| {}).await?;
/// println!("{}", outcome.summary);
/// # Ok(())
/// # }
/// ```
pub struct EvalHarness<'a> {
    client: &'a dyn ChatClient,
    prompts: &'a PromptBook,
    tools: &'a ToolRegistry,
    config: EvalConfig,
}

impl<'a> EvalHarness<'a> {
    /// # Errors
    ///
    /// Returns [`ConfigError`] if any part of the configuration is invalid.
    pub fn new(
        client: &'a dyn ChatClient,
        prompts: &'a PromptBook,
        tools: &'a ToolRegistry,
        config: EvalConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            client,
            prompts,
            tools,
            config,
        })
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// Process `entries` in order, then persist and validate.
    ///
    /// `cancel` is checked only between entries: an entry that has started
    /// always finishes and is persisted. Persistence runs whether or not the
    /// run was interrupted. A failed write is fatal; a count mismatch on
    /// re-read is reported in [`RunOutcome::validation`].
    pub async fn run<F>(
        &self,
        entries: Vec<Entry>,
        cancel: &CancellationToken,
        on_progress: F,
    ) -> Result<RunOutcome, EvalError>
    where
        F: Fn(EvalProgress),
    {
        let start_time = Instant::now();
        let total = entries.len();
        let pipeline = Pipeline::new(self.client, self.prompts, self.config.pipeline.clone())?;
        let react = ReactLoop::new(self.client, self.tools, self.config.react.clone())?;

        log::info!("Evaluating {} entries in {} mode", total, self.config.mode);
        on_progress(EvalProgress::Started { total });

        let mut scoreboard = Scoreboard::new();
        let mut records = Vec::with_capacity(total);
        let mut reports = Vec::with_capacity(total);
        let mut interrupted = false;

        for (idx, entry) in entries.into_iter().enumerate() {
            if cancel.is_cancelled() {
                log::warn!(
                    "Interrupted: stopping after {} of {} entries",
                    idx,
                    total
                );
                interrupted = true;
                break;
            }

            let mut report = self.process(idx + 1, entry, &pipeline, &react).await;
            report.correct = scoreboard.record(
                report.domain,
                report.answer.as_deref(),
                report.expected.as_deref(),
            );
            records.push(RunRecord::from_answer(report.answer.as_deref()));

            on_progress(EvalProgress::EntryCompleted {
                completed: idx + 1,
                total,
                report: Box::new(report.clone()),
            });
            reports.push(report);
        }

        write_records(&self.config.output, &records)?;
        let validation = match validate_records(&self.config.output, records.len()) {
            Ok(count) => {
                log::info!("Validated {} records in {:?}", count, self.config.output);
                None
            }
            Err(e) => {
                log::warn!("Results validation failed: {}", e);
                Some(e)
            }
        };

        Ok(RunOutcome {
            records,
            reports,
            summary: scoreboard.summary(),
            interrupted,
            duration: start_time.elapsed(),
            validation,
        })
    }

    async fn process(
        &self,
        index: usize,
        entry: Entry,
        pipeline: &Pipeline<'_>,
        react: &ReactLoop<'_>,
    ) -> EntryReport {
        let (domain, complexity) = self.labels(&entry).await;
        log::debug!(
            "Entry {}: domain={} complexity={}",
            index,
            domain,
            complexity.map_or("-", |c| c.as_str())
        );

        let mut report = EntryReport {
            index,
            input: entry.input,
            expected: entry.output,
            domain,
            complexity,
            reasoning: None,
            trace: None,
            answer: None,
            correct: None,
            errors: Vec::new(),
        };

        match self.config.mode {
            EvalMode::Pipeline => {
                let result = pipeline.run(&report.input, domain, complexity).await;
                report.reasoning = result.reasoning;
                report.answer = result.final_answer;
                report.errors = result.errors.iter().map(|e| e.to_string()).collect();
            }
            EvalMode::React => {
                let trace = react.run(&report.input).await;
                report.answer = trace
                    .answer()
                    .map(normalize_answer)
                    .filter(|answer| !answer.is_empty());
                if let Some(failure) = trace.error() {
                    report.errors.push(failure.to_string());
                }
                report.trace = Some(trace);
            }
        }

        for error in &report.errors {
            log::warn!("Entry {}: {}", index, error);
        }
        report
    }

    /// Fill in missing labels. Labels present in the entry are never overridden.
    async fn labels(&self, entry: &Entry) -> (Domain, Option<Complexity>) {
        if !self.config.classify {
            return (entry.domain.unwrap_or(Domain::FALLBACK), entry.complexity);
        }

        let classifier = Classifier::new(self.client);
        let domain = match entry.domain {
            Some(domain) => domain,
            None => classifier.domain(&entry.input).await,
        };
        // Only the pipeline's prompt depends on complexity.
        let complexity = match (entry.complexity, self.config.mode) {
            (Some(complexity), _) => Some(complexity),
            (None, EvalMode::Pipeline) => Some(classifier.complexity(&entry.input).await),
            (None, EvalMode::React) => None,
        };
        (domain, complexity)
    }
}
