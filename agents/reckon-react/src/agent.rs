//! ReAct loop implementation.
//!
//! Each turn the model sees the whole conversation so far. Its reply either
//! finishes with a final answer, requests one tool call whose observation is
//! appended as a user message, or ends the loop as a failure.

use crate::config::ReactConfig;
use crate::parse::TurnDecision;
use reckon_core::{truncate, ChatClient, ChatMessage, ChatRequest, ConfigError};
use reckon_tools::{ToolInvocation, ToolRegistry};
use serde::Serialize;
use std::fmt;

/// Why a loop ended without an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ReactFailure {
    /// A turn had neither a final-answer line nor a well-formed action
    NoAction,

    /// Every turn was spent on tool calls
    Exhausted,

    /// The model call itself failed
    Call(String),
}

impl fmt::Display for ReactFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReactFailure::NoAction => write!(f, "no action or final answer produced"),
            ReactFailure::Exhausted => write!(f, "exhausted step budget"),
            ReactFailure::Call(reason) => write!(f, "{}", reason),
        }
    }
}

/// Terminal state of one loop run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReactOutcome {
    Answered(String),
    Failed(ReactFailure),
}

/// Everything one loop run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReactTrace {
    /// Model reply text, one per successful call, in order
    pub turns: Vec<String>,

    /// Tool calls made between turns
    pub tool_calls: Vec<ToolInvocation>,

    pub outcome: ReactOutcome,
}

impl ReactTrace {
    pub fn ok(&self) -> bool {
        matches!(self.outcome, ReactOutcome::Answered(_))
    }

    pub fn answer(&self) -> Option<&str> {
        match &self.outcome {
            ReactOutcome::Answered(answer) => Some(answer.as_str()),
            ReactOutcome::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ReactFailure> {
        match &self.outcome {
            ReactOutcome::Answered(_) => None,
            ReactOutcome::Failed(failure) => Some(failure),
        }
    }

    /// Tool calls whose observation reports a fault.
    pub fn failed_tool_calls(&self) -> usize {
        self.tool_calls.iter().filter(|call| call.is_error()).count()
    }

    /// All turn texts joined by newlines.
    pub fn transcript(&self) -> String {
        self.turns.join("\n")
    }
}

/// Bounded think-act-observe loop.
///
/// # Example
///
/// ```no_run
/// use reckon_core::{HttpChatClient, LlmConfig};
/// use reckon_react::{ReactConfig, ReactLoop};
/// use reckon_tools::ToolRegistry;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HttpChatClient::new(LlmConfig::new("api-key", "my-model"))?;
/// let tools = ToolRegistry::with_defaults();
/// let react = ReactLoop::new(&client, &tools, ReactConfig::default())?;
///
/// let trace = react.run("What is 25 * 4?").await;
/// println!("{:?}", trace.answer());
/// # Ok(())
/// # }
/// ```
pub struct ReactLoop<'a> {
    client: &'a dyn ChatClient,
    tools: &'a ToolRegistry,
    config: ReactConfig,
}

impl<'a> ReactLoop<'a> {
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configuration is invalid
    /// (e.g., zero max_turns, empty system prompt).
    pub fn new(
        client: &'a dyn ChatClient,
        tools: &'a ToolRegistry,
        config: ReactConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            client,
            tools,
            config,
        })
    }

    pub fn config(&self) -> &ReactConfig {
        &self.config
    }

    /// Run the loop for one question. Makes at most `max_turns` calls.
    pub async fn run(&self, question: &str) -> ReactTrace {
        let mut history = vec![
            ChatMessage::system(&self.config.prompts.system),
            ChatMessage::user(question),
        ];
        let mut turns = Vec::new();
        let mut tool_calls = Vec::new();

        let outcome = 'turns: {
            for turn in 1..=self.config.max_turns {
                let request = ChatRequest::new(history.clone())
                    .with_temperature(self.config.temperature)
                    .with_max_tokens(self.config.max_tokens);

                let text = match self.client.complete(request).await {
                    Ok(text) => text,
                    Err(e) => {
                        log::warn!("ReAct turn {} call failed: {}", turn, e);
                        break 'turns ReactOutcome::Failed(ReactFailure::Call(e.to_string()));
                    }
                };
                log::debug!("ReAct turn {}: {}", turn, truncate(&text, 200));

                history.push(ChatMessage::assistant(text.clone()));
                let decision = TurnDecision::classify(&text);
                turns.push(text);

                match decision {
                    TurnDecision::Finish(answer) => {
                        log::debug!("ReAct finished on turn {}", turn);
                        break 'turns ReactOutcome::Answered(answer);
                    }
                    TurnDecision::Act(action) => {
                        let invocation = self.tools.dispatch(&action.tool, &action.argument);
                        log::debug!(
                            "ReAct tool {}[{}] -> {}",
                            invocation.tool_name,
                            truncate(&invocation.argument, 80),
                            truncate(&invocation.observation, 80)
                        );
                        history.push(ChatMessage::user(format!(
                            "[Observation]: {}",
                            invocation.observation
                        )));
                        tool_calls.push(invocation);
                    }
                    TurnDecision::Stuck => {
                        break 'turns ReactOutcome::Failed(ReactFailure::NoAction);
                    }
                }
            }
            ReactOutcome::Failed(ReactFailure::Exhausted)
        };

        ReactTrace {
            turns,
            tool_calls,
            outcome,
        }
    }
}
