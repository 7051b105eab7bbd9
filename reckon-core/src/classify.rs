//! Single-label domain and complexity classification.
//!
//! Each classification is one short, constrained model call. The response's
//! leading token is matched against the closed label set; a failed call, an
//! empty response or an unknown label silently yields the fallback label.

use crate::labels::{Complexity, Domain};
use crate::llm::{ChatClient, ChatRequest};

/// Token budget for a classification call.
pub const CLASSIFY_MAX_TOKENS: u32 = 8;

const DOMAIN_SYSTEM: &str = "You are a classifier that assigns a single domain label to a question. \
Possible domain labels are: math, coding, future_prediction, planning, common_sense. \
Reply with exactly one of these labels and nothing else.";

const COMPLEXITY_SYSTEM: &str = "You are a difficulty classifier for questions. \
Choose exactly one label from: easy, medium, hard, extremely hard. \
Reply with only that label and nothing else.";

/// Classifier issuing one model call per label.
///
/// Not memoized: asking twice costs two calls.
pub struct Classifier<'a> {
    client: &'a dyn ChatClient,
}

impl<'a> Classifier<'a> {
    pub fn new(client: &'a dyn ChatClient) -> Self {
        Self { client }
    }

    /// Assign a domain label; never fails.
    pub async fn domain(&self, question: &str) -> Domain {
        let user = format!(
            "Question:\n{}\n\n\
             Choose the single best domain label from: math, coding, future_prediction, \
             planning, common_sense, general.\n\
             Reply with exactly one domain label (for example: math).",
            question
        );
        let label = self
            .ask(DOMAIN_SYSTEM, user)
            .await
            .and_then(|text| domain_from_response(&text));

        label.unwrap_or_else(|| {
            log::debug!("Domain classification fell back to '{}'", Domain::FALLBACK);
            Domain::FALLBACK
        })
    }

    /// Assign a complexity label; never fails.
    pub async fn complexity(&self, question: &str) -> Complexity {
        let user = format!(
            "Question:\n{}\n\n\
             Classify the difficulty of this question as exactly one of: \
             easy, medium, hard, extremely hard.\n\
             Reply with just that single label.",
            question
        );
        let label = self
            .ask(COMPLEXITY_SYSTEM, user)
            .await
            .and_then(|text| complexity_from_response(&text));

        label.unwrap_or_else(|| {
            log::debug!(
                "Complexity classification fell back to '{}'",
                Complexity::FALLBACK
            );
            Complexity::FALLBACK
        })
    }

    async fn ask(&self, system: &str, user: String) -> Option<String> {
        let request = ChatRequest::with_system(system, user).with_max_tokens(CLASSIFY_MAX_TOKENS);
        match self.client.complete(request).await {
            Ok(text) if !text.trim().is_empty() => Some(text),
            Ok(_) => None,
            Err(e) => {
                log::debug!("Classification call failed: {}", e);
                None
            }
        }
    }
}

/// First `n` whitespace-delimited tokens, lowercased, with surrounding
/// punctuation removed.
fn leading_tokens(text: &str, n: usize) -> Vec<String> {
    text.split_whitespace()
        .take(n)
        .map(|token| {
            token
                .trim_matches(|c: char| !(c.is_alphanumeric() || c == '_'))
                .to_lowercase()
        })
        .collect()
}

fn domain_from_response(text: &str) -> Option<Domain> {
    leading_tokens(text, 1).first().and_then(|t| Domain::parse(t))
}

fn complexity_from_response(text: &str) -> Option<Complexity> {
    let tokens = leading_tokens(text, 2);
    match tokens.as_slice() {
        [first, second, ..] if first == "extremely" && second == "hard" => {
            Some(Complexity::ExtremelyHard)
        }
        [first, ..] => Complexity::parse(first),
        [] => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_llm::ScriptedChatClient;
    use rstest::rstest;

    #[rstest]
    #[case::exact("math", Some(Domain::Math))]
    #[case::case_and_punct("Coding.", Some(Domain::Coding))]
    #[case::trailing_words("planning because it asks for steps", Some(Domain::Planning))]
    #[case::quoted("\"common_sense\"", Some(Domain::CommonSense))]
    #[case::second_token_ignored("the math", None)]
    #[case::unknown("physics", None)]
    #[case::empty("", None)]
    fn test_domain_from_response(#[case] text: &str, #[case] expected: Option<Domain>) {
        assert_eq!(domain_from_response(text), expected);
    }

    #[rstest]
    #[case::easy("easy", Some(Complexity::Easy))]
    #[case::hard_upper("HARD", Some(Complexity::Hard))]
    #[case::extremely_hard("Extremely hard", Some(Complexity::ExtremelyHard))]
    #[case::extremely_alone("extremely", None)]
    #[case::medium_trailing("medium, I think", Some(Complexity::Medium))]
    #[case::unknown("impossible", None)]
    fn test_complexity_from_response(#[case] text: &str, #[case] expected: Option<Complexity>) {
        assert_eq!(complexity_from_response(text), expected);
    }

    #[tokio::test]
    async fn test_domain_uses_small_budget() {
        let mock = ScriptedChatClient::replies(["future_prediction"]);
        let classifier = Classifier::new(&mock);

        assert_eq!(
            classifier.domain("Will it rain tomorrow?").await,
            Domain::FuturePrediction
        );

        let requests = mock.requests();
        assert_eq!(requests[0].max_tokens, CLASSIFY_MAX_TOKENS);
        assert!(requests[0]
            .last_user_content()
            .unwrap()
            .contains("Will it rain tomorrow?"));
    }

    #[tokio::test]
    async fn test_call_failure_falls_back() {
        let mock = ScriptedChatClient::new(vec![Err("down".into()), Err("down".into())]);
        let classifier = Classifier::new(&mock);

        assert_eq!(classifier.domain("q").await, Domain::General);
        assert_eq!(classifier.complexity("q").await, Complexity::Medium);
    }

    #[tokio::test]
    async fn test_empty_response_falls_back() {
        let mock = ScriptedChatClient::replies(["   ", ""]);
        let classifier = Classifier::new(&mock);

        assert_eq!(classifier.domain("q").await, Domain::General);
        assert_eq!(classifier.complexity("q").await, Complexity::Medium);
    }

    #[tokio::test]
    async fn test_not_memoized() {
        let mock = ScriptedChatClient::replies(["math", "coding"]);
        let classifier = Classifier::new(&mock);

        assert_eq!(classifier.domain("same").await, Domain::Math);
        assert_eq!(classifier.domain("same").await, Domain::Coding);
        assert_eq!(mock.call_count(), 2);
    }
}
