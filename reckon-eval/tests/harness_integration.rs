//! Integration tests for EvalHarness
//!
//! All runs use a scripted client, so no backend is needed.

use reckon_core::{Complexity, Domain, PromptBook, ScriptedChatClient};
use reckon_eval::{
    read_records, EvalConfig, EvalError, EvalHarness, EvalMode, EvalProgress, Entry, RunOutcome,
    RunRecord, ResultsError,
};
use reckon_tools::ToolRegistry;
use std::path::Path;
use std::sync::Mutex;
use tempfile::tempdir;
use tokio_util::sync::CancellationToken;

fn labelled(input: &str, output: &str, domain: Domain) -> Entry {
    Entry::new(input)
        .with_output(output)
        .with_domain(domain)
        .with_complexity(Complexity::Medium)
}

async fn run(
    client: &ScriptedChatClient,
    config: EvalConfig,
    entries: Vec<Entry>,
    cancel: &CancellationToken,
) -> Result<RunOutcome, EvalError> {
    let prompts = PromptBook::default();
    let tools = ToolRegistry::with_defaults();
    let harness = EvalHarness::new(client, &prompts, &tools, config).expect("valid config");
    harness.run(entries, cancel, |_| {}).await
}

fn outputs(path: &Path) -> Vec<String> {
    read_records(path)
        .unwrap()
        .into_iter()
        .map(|r| r.output)
        .collect()
}

#[tokio::test]
async fn test_pipeline_run_scores_and_persists() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("results.json");
    let client = ScriptedChatClient::replies([
        "2 + 2 is 4.",
        "The final answer is: 4.",
        "France's capital is Paris.",
        "Paris",
        "Some draft.",
        "12",
    ]);
    let entries = vec![
        labelled("What is 2+2?", "4", Domain::Math),
        labelled("Capital of France?", "London", Domain::CommonSense),
        labelled("What is 3*4?", "12", Domain::Math),
    ];

    let outcome = run(
        &client,
        EvalConfig::new().with_output(&output),
        entries,
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(client.call_count(), 6);
    assert!(!outcome.interrupted);
    assert!(outcome.validation.is_none());
    assert_eq!(outputs(&output), vec!["4", "Paris", "12"]);

    let summary = &outcome.summary;
    assert_eq!((summary.overall.correct, summary.overall.total), (2, 3));
    let correct: usize = summary.domains.iter().map(|d| d.tally.correct).sum();
    let total: usize = summary.domains.iter().map(|d| d.tally.total).sum();
    assert_eq!((correct, total), (2, 3));

    assert_eq!(outcome.reports[1].correct, Some(false));
    assert_eq!(
        outcome.reports[0].reasoning.as_deref(),
        Some("2 + 2 is 4.")
    );
}

#[tokio::test]
async fn test_failed_entry_is_recorded_and_run_continues() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("results.json");
    let client = ScriptedChatClient::new(vec![
        Err("connection refused".to_string()),
        Ok("draft".to_string()),
        Ok("7".to_string()),
    ]);
    let entries = vec![
        labelled("First?", "1", Domain::Math),
        labelled("Second?", "7", Domain::Math),
    ];

    let outcome = run(
        &client,
        EvalConfig::new().with_output(&output),
        entries,
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(outputs(&output), vec!["", "7"]);
    let first = &outcome.reports[0];
    assert_eq!(first.answer, None);
    assert_eq!(first.correct, None);
    assert!(first.errors[0].contains("connection refused"));

    // The failed entry stays out of the denominator.
    assert_eq!(outcome.summary.overall.total, 1);
    assert_eq!(outcome.summary.overall.correct, 1);
}

#[tokio::test]
async fn test_missing_labels_are_classified() {
    let dir = tempdir().unwrap();
    let client = ScriptedChatClient::replies(["coding", "hard", "draft", "O(n)"]);

    let outcome = run(
        &client,
        EvalConfig::new().with_output(dir.path().join("results.json")),
        vec![Entry::new("Complexity of a linear scan?").with_output("O(n)")],
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    let report = &outcome.reports[0];
    assert_eq!(report.domain, Domain::Coding);
    assert_eq!(report.complexity, Some(Complexity::Hard));
    assert_eq!(report.correct, Some(true));
    assert_eq!(outcome.summary.domains[0].domain, "coding");
    assert_eq!(client.call_count(), 4);
}

#[tokio::test]
async fn test_unrecognized_classification_falls_back() {
    let dir = tempdir().unwrap();
    let client = ScriptedChatClient::replies(["astrology", "", "draft", "yes"]);

    let outcome = run(
        &client,
        EvalConfig::new().with_output(dir.path().join("results.json")),
        vec![Entry::new("Will it rain?")],
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(outcome.reports[0].domain, Domain::FALLBACK);
    assert_eq!(outcome.reports[0].complexity, Some(Complexity::FALLBACK));
    // No ground truth: answered but not scored.
    assert_eq!(outcome.reports[0].answer.as_deref(), Some("yes"));
    assert_eq!(outcome.summary.overall.total, 0);
}

#[tokio::test]
async fn test_classification_disabled_uses_fallback_domain() {
    let dir = tempdir().unwrap();
    let client = ScriptedChatClient::replies(["draft", "42"]);

    let outcome = run(
        &client,
        EvalConfig::new()
            .with_output(dir.path().join("results.json"))
            .with_classify(false),
        vec![Entry::new("Meaning of life?").with_output("42")],
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(client.call_count(), 2);
    assert_eq!(outcome.reports[0].domain, Domain::General);
    assert_eq!(outcome.reports[0].complexity, None);
    assert_eq!(outcome.reports[0].correct, Some(true));
}

#[tokio::test]
async fn test_react_mode_normalizes_answer() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("results.json");
    let client = ScriptedChatClient::replies([
        "Thought: compute it.\nAction: <math>[2*(3+4)]",
        "Thought: got it.\nFinal Answer: $\\boxed{14}$",
    ]);

    let outcome = run(
        &client,
        EvalConfig::new()
            .with_output(&output)
            .with_mode(EvalMode::React),
        vec![labelled("What is 2*(3+4)?", "14", Domain::Math)],
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    let report = &outcome.reports[0];
    assert_eq!(report.answer.as_deref(), Some("14"));
    assert_eq!(report.correct, Some(true));
    let trace = report.trace.as_ref().expect("react trace");
    assert_eq!(trace.tool_calls[0].observation, "14");
    assert_eq!(outputs(&output), vec!["14"]);
}

#[tokio::test]
async fn test_react_mode_classifies_domain_only() {
    let dir = tempdir().unwrap();
    let client = ScriptedChatClient::replies(["math", "Final Answer: 4"]);

    let outcome = run(
        &client,
        EvalConfig::new()
            .with_output(dir.path().join("results.json"))
            .with_mode(EvalMode::React),
        vec![Entry::new("What is 2+2?").with_output("4")],
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(client.call_count(), 2);
    let report = &outcome.reports[0];
    assert_eq!(report.domain, Domain::Math);
    assert_eq!(report.complexity, None);
    assert_eq!(report.correct, Some(true));
}

#[tokio::test]
async fn test_react_failure_persists_empty_record() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("results.json");
    let client = ScriptedChatClient::replies(["I am not sure."]);

    let outcome = run(
        &client,
        EvalConfig::new()
            .with_output(&output)
            .with_mode(EvalMode::React),
        vec![labelled("Hard one?", "x", Domain::Planning)],
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(outcome.records, vec![RunRecord::default()]);
    assert_eq!(outcome.reports[0].errors.len(), 1);
    assert_eq!(outcome.summary.overall.total, 0);
}

#[tokio::test]
async fn test_cancelled_before_start_writes_empty_file() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("results.json");
    let client = ScriptedChatClient::replies(["unused"]);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let outcome = run(
        &client,
        EvalConfig::new().with_output(&output),
        vec![labelled("Q?", "A", Domain::Math)],
        &cancel,
    )
    .await
    .unwrap();

    assert!(outcome.interrupted);
    assert_eq!(outcome.processed(), 0);
    assert_eq!(client.call_count(), 0);
    assert!(outputs(&output).is_empty());
}

#[tokio::test]
async fn test_interrupt_finishes_current_entry_then_flushes() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("results.json");
    let client = ScriptedChatClient::replies(["d1", "1", "d2", "2", "d3", "3"]);
    let prompts = PromptBook::default();
    let tools = ToolRegistry::with_defaults();
    let harness = EvalHarness::new(
        &client,
        &prompts,
        &tools,
        EvalConfig::new().with_output(&output),
    )
    .unwrap();
    let cancel = CancellationToken::new();
    let seen = Mutex::new(Vec::new());

    let entries = (1..=3)
        .map(|i| labelled(&format!("Q{}?", i), &i.to_string(), Domain::Math))
        .collect();
    let outcome = harness
        .run(entries, &cancel, |progress| {
            if let EvalProgress::EntryCompleted { completed, .. } = progress {
                seen.lock().unwrap().push(completed);
                // Interrupt arrives while the first entry is being reported.
                cancel.cancel();
            }
        })
        .await
        .unwrap();

    assert!(outcome.interrupted);
    assert_eq!(*seen.lock().unwrap(), vec![1]);
    assert_eq!(client.call_count(), 2);
    assert_eq!(outputs(&output), vec!["1"]);
    assert!(outcome.validation.is_none());
}

#[tokio::test]
async fn test_unwritable_output_is_fatal() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("missing").join("results.json");
    let client = ScriptedChatClient::replies(["draft", "1"]);

    let result = run(
        &client,
        EvalConfig::new().with_output(&output),
        vec![labelled("Q?", "1", Domain::Math)],
        &CancellationToken::new(),
    )
    .await;

    assert!(matches!(
        result,
        Err(EvalError::Results(ResultsError::Io(_)))
    ));
}
