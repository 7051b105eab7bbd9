//! Configuration for the ReAct loop.

use reckon_core::ConfigError;

/// Prompts used by the ReAct loop
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct ReactPrompts {
    /// System instruction describing tools and the turn syntax
    pub system: String,
}

impl ReactPrompts {
    /// Validate that prompts are non-empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.system.trim().is_empty() {
            errors.push("system cannot be empty".to_string());
        }

        ConfigError::check(errors)
    }
}

impl Default for ReactPrompts {
    fn default() -> Self {
        Self {
            system: r#"You are a careful problem solver. Think step by step and use tools when they help.

Available tools:
- math: evaluate an arithmetic expression. Example: Action: <math>[2*(3+4)]
- python: check a Python snippet for syntax errors without running it. Example: Action: <python>[def f(x): return x]
- reflect: pause and re-examine part of your reasoning. Example: Action: <reflect>[units of the result]

Each turn, either call exactly one tool on its own line:
Action: <TOOL_NAME>[ARGUMENT]

and wait for the reply, which arrives as:
[Observation]: <tool output>

or, once you are confident, finish with:
Final Answer: <answer only>

Never write an observation yourself. Keep the final answer short, with no explanation."#
                .to_string(),
        }
    }
}

/// Configuration for the ReAct loop
#[derive(Debug, Clone)]
pub struct ReactConfig {
    /// Maximum number of model calls per question
    ///
    /// Default: 3
    pub max_turns: usize,

    /// Sampling temperature for every turn
    ///
    /// Default: 0.2
    pub temperature: f32,

    /// Token budget per turn
    ///
    /// Default: 512
    pub max_tokens: u32,

    /// Prompts configuration
    pub prompts: ReactPrompts,
}

impl ReactConfig {
    #[must_use]
    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = max_turns;
        self
    }

    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.max_turns == 0 {
            errors.push("max_turns must be greater than 0".to_string());
        }

        if self.max_tokens == 0 {
            errors.push("max_tokens must be greater than 0".to_string());
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            errors.push(format!(
                "temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            ));
        }

        if let Err(ConfigError::Invalid(prompt_errors)) = self.prompts.validate() {
            errors.push(prompt_errors);
        }

        ConfigError::check(errors)
    }
}

impl Default for ReactConfig {
    fn default() -> Self {
        Self {
            max_turns: 3,
            temperature: 0.2,
            max_tokens: 512,
            prompts: ReactPrompts::default(),
        }
    }
}
