//! Domain and complexity labels.
//!
//! Both label sets are closed. Free text from the model or a dataset file
//! becomes a label only through [`Domain::parse`] / [`Complexity::parse`],
//! so an out-of-set label can never be stored.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse task category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Math,
    Coding,
    FuturePrediction,
    Planning,
    CommonSense,
    /// Fallback for anything the classifier cannot place
    General,
}

impl Domain {
    /// Labels the classifier may choose from.
    pub const CLASSIFIABLE: [Domain; 5] = [
        Domain::Math,
        Domain::Coding,
        Domain::FuturePrediction,
        Domain::Planning,
        Domain::CommonSense,
    ];

    /// Label substituted when classification fails.
    pub const FALLBACK: Domain = Domain::General;

    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Math => "math",
            Domain::Coding => "coding",
            Domain::FuturePrediction => "future_prediction",
            Domain::Planning => "planning",
            Domain::CommonSense => "common_sense",
            Domain::General => "general",
        }
    }

    /// Parse an exact (case-insensitive) label.
    pub fn parse(label: &str) -> Option<Domain> {
        let label = label.trim().to_lowercase();
        Domain::CLASSIFIABLE
            .into_iter()
            .chain(std::iter::once(Domain::General))
            .find(|d| d.as_str() == label)
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Difficulty tier controlling reasoning depth and call parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Complexity {
    #[serde(rename = "easy")]
    Easy,
    #[serde(rename = "medium")]
    Medium,
    #[serde(rename = "hard")]
    Hard,
    #[serde(rename = "extremely hard")]
    ExtremelyHard,
}

impl Complexity {
    pub const ALL: [Complexity; 4] = [
        Complexity::Easy,
        Complexity::Medium,
        Complexity::Hard,
        Complexity::ExtremelyHard,
    ];

    /// Label substituted when classification fails.
    pub const FALLBACK: Complexity = Complexity::Medium;

    pub fn as_str(&self) -> &'static str {
        match self {
            Complexity::Easy => "easy",
            Complexity::Medium => "medium",
            Complexity::Hard => "hard",
            Complexity::ExtremelyHard => "extremely hard",
        }
    }

    /// Parse an exact (case-insensitive) label. Inner whitespace runs are
    /// collapsed, so `"Extremely   Hard"` parses.
    pub fn parse(label: &str) -> Option<Complexity> {
        let label = label
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        Complexity::ALL.into_iter().find(|c| c.as_str() == label)
    }

    /// Whether reasoning should be deliberate rather than concise.
    pub fn is_demanding(&self) -> bool {
        matches!(self, Complexity::Hard | Complexity::ExtremelyHard)
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::math("math", Some(Domain::Math))]
    #[case::upper("CODING", Some(Domain::Coding))]
    #[case::padded("  future_prediction ", Some(Domain::FuturePrediction))]
    #[case::general("general", Some(Domain::General))]
    #[case::unknown("physics", None)]
    #[case::spaced("common sense", None)]
    fn test_domain_parse(#[case] input: &str, #[case] expected: Option<Domain>) {
        assert_eq!(Domain::parse(input), expected);
    }

    #[rstest]
    #[case::easy("easy", Some(Complexity::Easy))]
    #[case::two_words("Extremely   Hard", Some(Complexity::ExtremelyHard))]
    #[case::unknown("trivial", None)]
    #[case::empty("", None)]
    fn test_complexity_parse(#[case] input: &str, #[case] expected: Option<Complexity>) {
        assert_eq!(Complexity::parse(input), expected);
    }

    #[test]
    fn test_labels_round_trip_through_as_str() {
        for domain in Domain::CLASSIFIABLE {
            assert_eq!(Domain::parse(domain.as_str()), Some(domain));
        }
        for complexity in Complexity::ALL {
            assert_eq!(Complexity::parse(complexity.as_str()), Some(complexity));
        }
    }

    #[test]
    fn test_serde_labels() {
        assert_eq!(
            serde_json::to_string(&Domain::FuturePrediction).unwrap(),
            "\"future_prediction\""
        );
        assert_eq!(
            serde_json::to_string(&Complexity::ExtremelyHard).unwrap(),
            "\"extremely hard\""
        );
    }
}
