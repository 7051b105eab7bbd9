//! Evaluation CLI for the reasoning pipeline and the ReAct loop.
//!
//! Runs a JSON dataset through the selected solver, prints per-entry reports
//! and a score summary, and writes the results file. Ctrl+C stops after the
//! current entry; results gathered so far are still written.

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use reckon_core::{HttpChatClient, LlmConfig, PromptBook, DEFAULT_API_BASE};
use reckon_eval::{
    Dataset, EvalConfig, EvalHarness, EvalMode, EvalProgress, JsonEntryDataset, RunOutcome,
    RunReport, Sampling,
};
use reckon_pipeline::PipelineConfig;
use reckon_react::ReactConfig;
use reckon_tools::ToolRegistry;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Evaluation CLI for the reasoning pipeline and the ReAct loop.
#[derive(Parser, Debug)]
#[command(name = "reckon-eval")]
#[command(about = "Evaluate a chat model on a JSON question set")]
#[command(version)]
struct Args {
    /// Path to a JSON array of {input, output?, domain?, complexity?}
    #[arg(long, short = 'i')]
    input: PathBuf,

    /// Evaluate at most this many entries (default: all)
    #[arg(long, short = 'n')]
    max: Option<usize>,

    /// Shuffle entries before truncating
    #[arg(long)]
    shuffle: bool,

    /// Seed for --shuffle
    #[arg(long, default_value = "0")]
    seed: u64,

    /// Solver: pipeline or react
    #[arg(long, short = 'm', default_value = "pipeline")]
    mode: EvalMode,

    /// Skip classification; missing domains fall back to general
    #[arg(long)]
    no_classify: bool,

    /// Results file path
    #[arg(long, short = 'o', default_value = "results.json")]
    output: PathBuf,

    /// Also write a detailed JSON run report here
    #[arg(long)]
    report: Option<PathBuf>,

    /// Base token budget of the reasoning pass
    #[arg(long, default_value = "1024")]
    reason_tokens: u32,

    /// Token budget of the extraction pass
    #[arg(long, default_value = "128")]
    extract_tokens: u32,

    /// Maximum model turns per entry in react mode
    #[arg(long, default_value = "3")]
    max_turns: usize,

    /// API key (can also use OPENAI_API_KEY env var)
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Base URL of the OpenAI-compatible backend
    #[arg(long, env = "API_BASE", default_value = DEFAULT_API_BASE)]
    api_base: String,

    /// Model name
    #[arg(long, env = "MODEL_NAME")]
    model: String,

    /// Request timeout in seconds
    #[arg(long, default_value = "120")]
    timeout: u64,

    /// Enable verbose logging and reasoning output
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// Validate CLI arguments.
    fn validate(&self) -> Result<(), String> {
        if self.max == Some(0) {
            return Err("--max must be greater than 0".to_string());
        }

        if self.reason_tokens == 0 || self.extract_tokens == 0 {
            return Err("token budgets must be greater than 0".to_string());
        }

        if self.max_turns == 0 {
            return Err("--max-turns must be greater than 0".to_string());
        }

        if self.timeout == 0 {
            return Err("--timeout must be greater than 0".to_string());
        }

        if self.model.trim().is_empty() {
            return Err("model name must not be empty".to_string());
        }

        if self.report.as_ref() == Some(&self.output) {
            return Err("--report must differ from --output".to_string());
        }

        Ok(())
    }

    fn llm_config(&self) -> LlmConfig {
        LlmConfig::new(&self.api_key, &self.model)
            .with_api_base(&self.api_base)
            .with_timeout(Duration::from_secs(self.timeout))
    }

    fn sampling(&self) -> Sampling {
        let mut sampling = Sampling::all();
        if self.shuffle {
            sampling = sampling.with_shuffle(self.seed);
        }
        if let Some(max) = self.max {
            sampling = sampling.with_max(max);
        }
        sampling
    }

    fn eval_config(&self) -> EvalConfig {
        EvalConfig::new()
            .with_mode(self.mode)
            .with_classify(!self.no_classify)
            .with_output(&self.output)
            .with_pipeline(
                PipelineConfig::default()
                    .with_reason_tokens(self.reason_tokens)
                    .with_extract_tokens(self.extract_tokens),
            )
            .with_react(ReactConfig::default().with_max_turns(self.max_turns))
    }
}

/// Cancel `token` on the first Ctrl+C. Later presses only log.
fn spawn_interrupt_listener(token: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            log::warn!("Could not install Ctrl+C handler");
            return;
        }
        eprintln!("\nInterrupt received: finishing the current entry, then saving results");
        token.cancel();

        while tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("Flush in progress; results will be written after the current entry");
        }
    });
}

fn progress_bar() -> ProgressBar {
    let bar = ProgressBar::new(0);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    bar.set_style(style);
    bar
}

/// Run evaluation with progress display.
async fn run_evaluation(args: &Args) -> Result<(String, RunOutcome), String> {
    if !args.input.exists() {
        return Err(format!("Dataset file not found: {}", args.input.display()));
    }

    let client = HttpChatClient::new(args.llm_config())
        .map_err(|e| format!("Failed to create client: {}", e))?;
    let prompts = PromptBook::default();
    let tools = ToolRegistry::with_defaults();

    let dataset = JsonEntryDataset::new(args.input.clone());
    let entries = dataset
        .load(args.sampling())
        .await
        .map_err(|e| format!("Failed to load dataset: {}", e))?;

    let harness = EvalHarness::new(&client, &prompts, &tools, args.eval_config())
        .map_err(|e| e.to_string())?;

    let cancel = CancellationToken::new();
    spawn_interrupt_listener(cancel.clone());

    let bar = progress_bar();
    let outcome = harness
        .run(entries, &cancel, |progress| match progress {
            EvalProgress::Started { total } => {
                bar.set_length(total as u64);
                bar.set_message("Evaluating...");
            }
            EvalProgress::EntryCompleted {
                completed,
                total,
                report,
            } => {
                bar.println(report.render(total, args.verbose));
                bar.set_position(completed as u64);
                if !report.errors.is_empty() {
                    bar.set_message("(some failures)");
                }
            }
            _ => {} // Handle future variants gracefully
        })
        .await
        .map_err(|e| format!("Evaluation failed: {}", e))?;

    if outcome.interrupted {
        bar.abandon_with_message("Interrupted");
    } else {
        bar.finish_with_message("Complete");
    }
    Ok((dataset.name().to_string(), outcome))
}

fn print_outcome(args: &Args, outcome: &RunOutcome) {
    println!();
    print!("{}", outcome.summary);
    println!(
        "Processed {} entries in {:.1}s{}",
        outcome.processed(),
        outcome.duration.as_secs_f64(),
        if outcome.interrupted {
            " (interrupted)"
        } else {
            ""
        }
    );
    match &outcome.validation {
        None => println!(
            "Results written to: {} ({} records)",
            args.output.display(),
            outcome.processed()
        ),
        Some(e) => eprintln!("Warning: results validation failed: {}", e),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    // Print configuration
    eprintln!("=== Reckon Evaluation ===");
    eprintln!("Dataset: {}", args.input.display());
    eprintln!("Mode: {}", args.mode);
    eprintln!("Model: {} @ {}", args.model, args.api_base);
    eprintln!(
        "Entries: {}",
        args.max
            .map(|s| s.to_string())
            .unwrap_or_else(|| "all".to_string())
    );
    eprintln!("Classify: {}", !args.no_classify);
    eprintln!();

    let (dataset_name, outcome) = match run_evaluation(&args).await {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    print_outcome(&args, &outcome);

    if let Some(path) = &args.report {
        let report = RunReport {
            dataset: dataset_name,
            mode: args.mode.to_string(),
            entries: outcome.reports,
            summary: outcome.summary,
            interrupted: outcome.interrupted,
            duration: outcome.duration,
        };
        if let Err(e) = report.write_json(path) {
            eprintln!("Error: failed to write report: {}", e);
            return ExitCode::FAILURE;
        }
        println!("Detailed report written to: {}", path.display());
    }

    ExitCode::SUCCESS
}
