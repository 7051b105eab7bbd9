//! Dataset loading for evaluation.
//!
//! Provides the [`Dataset`] trait, the JSON entry loader and the
//! [`Sampling`] options applied after loading.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use reckon_core::{Complexity, Domain};
use serde::Deserialize;
use serde_json::Value;
use std::path::PathBuf;
use thiserror::Error;
use tokio::fs;

/// Errors that can occur when loading datasets.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DatasetError {
    /// Failed to read dataset file
    #[error("Failed to read dataset: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse dataset
    #[error("Failed to parse dataset: {0}")]
    Parse(String),
}

/// One question to run.
///
/// Labels that were missing or unrecognized in the source file are `None`;
/// the run controller may fill them in by classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub input: String,

    /// Ground truth, if known
    pub output: Option<String>,

    pub domain: Option<Domain>,

    pub complexity: Option<Complexity>,
}

impl Entry {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            output: None,
            domain: None,
            complexity: None,
        }
    }

    #[must_use]
    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = Some(output.into());
        self
    }

    #[must_use]
    pub fn with_domain(mut self, domain: Domain) -> Self {
        self.domain = Some(domain);
        self
    }

    #[must_use]
    pub fn with_complexity(mut self, complexity: Complexity) -> Self {
        self.complexity = Some(complexity);
        self
    }
}

/// Selection applied to a loaded dataset: optional seeded shuffle, then truncation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sampling {
    /// Keep at most this many entries
    pub max: Option<usize>,

    /// Shuffle with this seed before truncating
    pub shuffle_seed: Option<u64>,
}

impl Sampling {
    pub fn all() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_max(mut self, max: usize) -> Self {
        self.max = Some(max);
        self
    }

    #[must_use]
    pub fn with_shuffle(mut self, seed: u64) -> Self {
        self.shuffle_seed = Some(seed);
        self
    }

    /// Apply the selection. The same seed always yields the same order.
    pub fn apply<T>(&self, mut items: Vec<T>) -> Vec<T> {
        if let Some(seed) = self.shuffle_seed {
            let mut rng = StdRng::seed_from_u64(seed);
            items.shuffle(&mut rng);
        }
        if let Some(max) = self.max {
            items.truncate(max);
        }
        items
    }
}

/// Trait for evaluation datasets.
pub trait Dataset: Send + Sync {
    /// The name of this dataset (used in reports).
    fn name(&self) -> &str;

    /// Load entries, then apply `sampling`.
    fn load(
        &self,
        sampling: Sampling,
    ) -> impl std::future::Future<Output = Result<Vec<Entry>, DatasetError>> + Send;
}

/// A dataset loaded from a JSON file.
///
/// Expects a JSON array of objects with a required `input` and optional
/// `output`, `domain` and `complexity` fields. Numeric outputs are read as
/// their JSON text. Unknown labels are dropped with a warning.
///
/// # Example JSON format
///
/// ```json
/// [
///   {"input": "What is 2+2?", "output": "4", "domain": "math"},
///   {"input": "Capital of France?", "output": "Paris", "complexity": "easy"}
/// ]
/// ```
pub struct JsonEntryDataset {
    path: PathBuf,
    name: String,
}

impl JsonEntryDataset {
    /// Create a dataset from a JSON file.
    pub fn new(path: PathBuf) -> Self {
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("json_dataset")
            .to_string();

        Self { path, name }
    }

    /// Create a dataset with a custom name.
    pub fn with_name(path: PathBuf, name: impl Into<String>) -> Self {
        Self {
            path,
            name: name.into(),
        }
    }

    /// Parse dataset text without sampling.
    pub fn parse(content: &str) -> Result<Vec<Entry>, DatasetError> {
        let data: Vec<RawEntry> =
            serde_json::from_str(content).map_err(|e| DatasetError::Parse(e.to_string()))?;

        Ok(data
            .into_iter()
            .enumerate()
            .map(|(idx, raw)| raw.into_entry(idx))
            .collect())
    }
}

impl Dataset for JsonEntryDataset {
    fn name(&self) -> &str {
        &self.name
    }

    async fn load(&self, sampling: Sampling) -> Result<Vec<Entry>, DatasetError> {
        let content = fs::read_to_string(&self.path).await?;
        let entries = Self::parse(&content)?;
        log::info!("Loaded {} entries from {:?}", entries.len(), self.path);
        Ok(sampling.apply(entries))
    }
}

/// Internal structure for parsing entry JSON.
#[derive(Deserialize)]
struct RawEntry {
    input: String,
    #[serde(default)]
    output: Option<Value>,
    #[serde(default)]
    domain: Option<String>,
    #[serde(default)]
    complexity: Option<String>,
}

impl RawEntry {
    fn into_entry(self, idx: usize) -> Entry {
        let output = self.output.and_then(|value| match value {
            Value::Null => None,
            Value::String(s) => Some(s),
            other => Some(other.to_string()),
        });

        let domain = self.domain.and_then(|label| {
            let parsed = Domain::parse(&label);
            if parsed.is_none() {
                log::warn!("Entry {}: ignoring unknown domain '{}'", idx, label);
            }
            parsed
        });

        let complexity = self.complexity.and_then(|label| {
            let parsed = Complexity::parse(&label);
            if parsed.is_none() {
                log::warn!("Entry {}: ignoring unknown complexity '{}'", idx, label);
            }
            parsed
        });

        Entry {
            input: self.input,
            output,
            domain,
            complexity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_and_partial_entries() {
        let json = r#"[
            {"input": "Q1?", "output": "A1", "domain": "math", "complexity": "extremely hard"},
            {"input": "Q2?"},
            {"input": "Q3?", "output": 42, "domain": "Coding"}
        ]"#;

        let entries = JsonEntryDataset::parse(json).unwrap();

        assert_eq!(entries.len(), 3);
        assert_eq!(
            entries[0],
            Entry::new("Q1?")
                .with_output("A1")
                .with_domain(Domain::Math)
                .with_complexity(Complexity::ExtremelyHard)
        );
        assert_eq!(entries[1], Entry::new("Q2?"));
        assert_eq!(entries[2].output.as_deref(), Some("42"));
        assert_eq!(entries[2].domain, Some(Domain::Coding));
    }

    #[test]
    fn test_unknown_labels_become_absent() {
        let json = r#"[{"input": "Q", "domain": "astrology", "complexity": "trivial"}]"#;
        let entries = JsonEntryDataset::parse(json).unwrap();
        assert!(entries[0].domain.is_none());
        assert!(entries[0].complexity.is_none());
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            JsonEntryDataset::parse("{not json"),
            Err(DatasetError::Parse(_))
        ));
        assert!(matches!(
            JsonEntryDataset::parse(r#"[{"output": "no input"}]"#),
            Err(DatasetError::Parse(_))
        ));
    }

    #[test]
    fn test_sampling_truncates() {
        let items: Vec<u32> = (0..10).collect();
        assert_eq!(Sampling::all().apply(items.clone()), items);
        assert_eq!(Sampling::all().with_max(3).apply(items.clone()), vec![0, 1, 2]);
        assert_eq!(Sampling::all().with_max(50).apply(items.clone()).len(), 10);
    }

    #[test]
    fn test_sampling_shuffle_is_seeded() {
        let items: Vec<u32> = (0..50).collect();
        let a = Sampling::all().with_shuffle(7).apply(items.clone());
        let b = Sampling::all().with_shuffle(7).apply(items.clone());
        assert_eq!(a, b);
        assert_ne!(a, items);

        let mut sorted = a.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, items);

        let first_five = Sampling::all().with_shuffle(7).with_max(5).apply(items);
        assert_eq!(first_five, a[..5]);
    }

    #[tokio::test]
    async fn test_json_entry_dataset_load() {
        let json = r#"[
            {"input": "Q1?", "output": "A1"},
            {"input": "Q2?", "output": "A2"},
            {"input": "Q3?", "output": "A3"}
        ]"#;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file.flush().unwrap();

        let dataset = JsonEntryDataset::new(file.path().to_path_buf());
        let entries = dataset.load(Sampling::all().with_max(2)).await.unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].output.as_deref(), Some("A2"));
    }

    #[tokio::test]
    async fn test_json_entry_dataset_missing_file() {
        let dataset = JsonEntryDataset::new(PathBuf::from("/nonexistent/path/xyz.json"));
        assert!(matches!(
            dataset.load(Sampling::all()).await,
            Err(DatasetError::Io(_))
        ));
    }

    #[test]
    fn test_json_entry_dataset_name() {
        let dataset = JsonEntryDataset::new(PathBuf::from("/path/to/dev_set.json"));
        assert_eq!(dataset.name(), "dev_set");

        let dataset = JsonEntryDataset::with_name(PathBuf::from("/path/to/file.json"), "custom");
        assert_eq!(dataset.name(), "custom");
    }
}
