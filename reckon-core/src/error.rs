use thiserror::Error;

/// Errors produced by a single chat-completion call.
///
/// Callers in the pipeline and ReAct loop never branch on the variant: every
/// failure collapses to its display text and the entry moves on.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LlmError {
    /// Connection, DNS or TLS failure before a response arrived
    #[error("Transport error: {0}")]
    Transport(String),

    /// Request exceeded the configured timeout
    #[error("Request timed out after {0}ms")]
    Timeout(u64),

    /// Backend answered with a non-200 status
    #[error("Backend returned HTTP {status}: {body}")]
    Backend { status: u16, body: String },

    /// A 200 response whose body could not be decoded
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// Scripted client ran out of responses
    #[error("No scripted response left for call {0}")]
    ScriptExhausted(usize),

    /// Other LLM error
    #[error("{0}")]
    Other(String),
}

/// Rejected component configuration.
///
/// Carries every problem found, joined with `; `.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    /// `Ok(())` when `problems` is empty, otherwise one joined error.
    pub fn check(problems: Vec<String>) -> Result<(), ConfigError> {
        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(problems.join("; ")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::transport(LlmError::Transport("connection refused".into()), &["Transport", "connection refused"])]
    #[case::timeout(LlmError::Timeout(5000), &["timed out", "5000"])]
    #[case::backend(LlmError::Backend { status: 503, body: "overloaded".into() }, &["503", "overloaded"])]
    #[case::decode(LlmError::Decode("expected value".into()), &["decode", "expected value"])]
    #[case::exhausted(LlmError::ScriptExhausted(3), &["3"])]
    fn test_llm_error_display(#[case] error: LlmError, #[case] expected: &[&str]) {
        let display = error.to_string();
        for s in expected {
            assert!(display.contains(s), "Expected '{}' in '{}'", s, display);
        }
    }

    #[test]
    fn test_config_error_check() {
        assert_eq!(ConfigError::check(vec![]), Ok(()));
        let err = ConfigError::check(vec!["a is zero".into(), "b is empty".into()]).unwrap_err();
        assert_eq!(err.to_string(), "Invalid configuration: a is zero; b is empty");
    }
}
