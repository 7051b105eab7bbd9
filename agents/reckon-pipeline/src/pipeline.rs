//! Two-pass reasoning + extraction.
//!
//! Pass one asks the model to reason about the problem under a
//! domain/complexity system prompt with complexity-scaled parameters. Pass
//! two hands the full draft back with an extraction prompt and keeps only the
//! bare answer, which is then normalized.

use crate::config::PipelineConfig;
use reckon_core::{
    normalize_answer, truncate, CallParams, ChatClient, ChatRequest, Complexity, ConfigError,
    Domain, PromptBook,
};
use serde::Serialize;
use std::fmt;

/// Sampling temperature of the extraction call.
const EXTRACT_TEMPERATURE: f32 = 0.0;

/// Which pass produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Reasoning,
    Extraction,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Reasoning => write!(f, "reasoning"),
            Stage::Extraction => write!(f, "extraction"),
        }
    }
}

/// A stage-tagged failure. Recorded as data; never returned as `Err`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageError {
    pub stage: Stage,
    pub message: String,
}

impl fmt::Display for StageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.stage, self.message)
    }
}

/// Outcome of one entry through the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PipelineResult {
    /// Draft from the reasoning call; absent if that call failed
    pub reasoning: Option<String>,

    /// Normalized answer; absent if either call failed or extraction was empty
    pub final_answer: Option<String>,

    /// Failures in the order they happened
    pub errors: Vec<StageError>,
}

impl PipelineResult {
    fn fail(&mut self, stage: Stage, message: impl Into<String>) {
        let error = StageError {
            stage,
            message: message.into(),
        };
        log::warn!("Pipeline {}", error);
        self.errors.push(error);
    }
}

/// Runs entries through the reasoning and extraction passes.
///
/// Borrows the client and prompt book; both are built once per run.
pub struct Pipeline<'a> {
    client: &'a dyn ChatClient,
    prompts: &'a PromptBook,
    config: PipelineConfig,
}

impl<'a> Pipeline<'a> {
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a token budget is zero.
    pub fn new(
        client: &'a dyn ChatClient,
        prompts: &'a PromptBook,
        config: PipelineConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            client,
            prompts,
            config,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Solve one problem. Issues at most two calls, one after the other.
    pub async fn run(
        &self,
        problem: &str,
        domain: Domain,
        complexity: Option<Complexity>,
    ) -> PipelineResult {
        let mut result = PipelineResult::default();

        let params = CallParams::for_complexity(complexity, self.config.reason_tokens);
        let system = self.prompts.system_prompt(domain, complexity);
        log::debug!(
            "Reasoning call: domain={} complexity={:?} temperature={} max_tokens={}",
            domain,
            complexity,
            params.temperature,
            params.max_tokens
        );

        let reasoning_request = ChatRequest::with_system(system, problem)
            .with_temperature(params.temperature)
            .with_max_tokens(params.max_tokens);

        let draft = match self.client.complete(reasoning_request).await {
            Ok(text) => text,
            Err(e) => {
                result.fail(Stage::Reasoning, e.to_string());
                return result;
            }
        };
        log::debug!("Reasoning draft: {}", truncate(&draft, 200));

        let extraction_request = ChatRequest::with_system(
            self.prompts.extraction_prompt(domain),
            extraction_message(problem, &draft),
        )
        .with_temperature(EXTRACT_TEMPERATURE)
        .with_max_tokens(self.config.extract_tokens);
        result.reasoning = Some(draft);

        match self.client.complete(extraction_request).await {
            Ok(raw) => {
                let answer = normalize_answer(raw.trim());
                if answer.is_empty() {
                    result.fail(Stage::Extraction, "extraction returned no answer");
                } else {
                    log::debug!("Extracted answer: {}", answer);
                    result.final_answer = Some(answer);
                }
            }
            Err(e) => result.fail(Stage::Extraction, e.to_string()),
        }

        result
    }
}

/// User message of the extraction call. Problem and draft are embedded verbatim.
pub fn extraction_message(problem: &str, draft: &str) -> String {
    format!(
        "Problem:\n{}\n\nDraft solution:\n{}\n\nExtract only the final answer from the draft solution above.",
        problem, draft
    )
}
