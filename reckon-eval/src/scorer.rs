//! Exact-match scoring with per-domain tallies.

use reckon_core::Domain;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Case-sensitive string equality; no further normalization.
pub fn is_exact_match(produced: &str, expected: &str) -> bool {
    produced == expected
}

/// Correct and total counts. `correct <= total` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub correct: usize,
    pub total: usize,
}

impl Tally {
    fn add(&mut self, correct: bool) {
        self.total += 1;
        if correct {
            self.correct += 1;
        }
    }

    /// Percentage correct; 0.0 when nothing was scored.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64 * 100.0
        }
    }
}

impl fmt::Display for Tally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} ({:.1}%)", self.correct, self.total, self.percent())
    }
}

/// Running overall and per-domain correctness.
///
/// Domains are keyed by label string so iteration is alphabetical.
///
/// # Example
///
/// ```
/// use reckon_core::Domain;
/// use reckon_eval::Scoreboard;
///
/// let mut board = Scoreboard::new();
/// assert_eq!(board.record(Domain::Math, Some("4"), Some("4")), Some(true));
/// assert_eq!(board.record(Domain::Math, None, Some("5")), None);
/// assert_eq!(board.overall().total, 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Scoreboard {
    overall: Tally,
    per_domain: BTreeMap<String, Tally>,
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Score one entry.
    ///
    /// Counts only when both an answer and a ground truth are present;
    /// returns `None` otherwise and leaves every tally unchanged.
    pub fn record(
        &mut self,
        domain: Domain,
        produced: Option<&str>,
        expected: Option<&str>,
    ) -> Option<bool> {
        let (produced, expected) = (produced?, expected?);
        let correct = is_exact_match(produced, expected);
        self.overall.add(correct);
        self.per_domain
            .entry(domain.as_str().to_string())
            .or_default()
            .add(correct);
        Some(correct)
    }

    pub fn overall(&self) -> Tally {
        self.overall
    }

    pub fn domain(&self, domain: Domain) -> Tally {
        self.per_domain
            .get(domain.as_str())
            .copied()
            .unwrap_or_default()
    }

    pub fn summary(&self) -> ScoreSummary {
        ScoreSummary {
            overall: self.overall,
            overall_percent: self.overall.percent(),
            domains: self
                .per_domain
                .iter()
                .map(|(domain, tally)| DomainScore {
                    domain: domain.clone(),
                    tally: *tally,
                    percent: tally.percent(),
                })
                .collect(),
        }
    }
}

/// One row of the per-domain summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainScore {
    pub domain: String,
    #[serde(flatten)]
    pub tally: Tally,
    pub percent: f64,
}

/// Snapshot of a [`Scoreboard`], domains sorted by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub overall: Tally,
    pub overall_percent: f64,
    pub domains: Vec<DomainScore>,
}

impl fmt::Display for ScoreSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Overall: {}", self.overall)?;
        for row in &self.domains {
            writeln!(f, "  {:<18} {}", row.domain, row.tally)?;
        }
        Ok(())
    }
}
