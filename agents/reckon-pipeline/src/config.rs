//! Configuration for the reasoning + extraction pipeline.

use reckon_core::ConfigError;

/// Token budgets for the two passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Base token budget of the reasoning call, scaled by complexity
    ///
    /// Default: 1024
    pub reason_tokens: u32,

    /// Token budget of the extraction call
    ///
    /// Default: 128
    pub extract_tokens: u32,
}

impl PipelineConfig {
    #[must_use]
    pub fn with_reason_tokens(mut self, tokens: u32) -> Self {
        self.reason_tokens = tokens;
        self
    }

    #[must_use]
    pub fn with_extract_tokens(mut self, tokens: u32) -> Self {
        self.extract_tokens = tokens;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.reason_tokens == 0 {
            errors.push("reason_tokens must be greater than 0".to_string());
        }
        if self.extract_tokens == 0 {
            errors.push("extract_tokens must be greater than 0".to_string());
        }

        ConfigError::check(errors)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            reason_tokens: 1024,
            extract_tokens: 128,
        }
    }
}
