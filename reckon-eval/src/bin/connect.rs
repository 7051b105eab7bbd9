//! Connection probe for the chat backend.
//!
//! Sends one known question, prints the outcome, then forwards each typed
//! line to the model until Ctrl+C or Ctrl+D.

use clap::Parser;
use reckon_core::{ChatClient, ChatRequest, HttpChatClient, LlmConfig, DEFAULT_API_BASE};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::process::ExitCode;
use std::time::Duration;

const PROBE_SYSTEM: &str =
    "You are a helpful assistant. Reply with only the final answer, no explanation.";

const PROBE_QUESTION: &str = "Answer the following math question with only the final answer.\n\n\
What is the product of the real roots of the equation \
$x^2 + 18x + 30 = 2 \\sqrt{x^2 + 18x + 45}$ ?";

const PROBE_EXPECTED: &str = "20";

const PROBE_MAX_TOKENS: u32 = 128;

const CHAT_MAX_TOKENS: u32 = 5000;

/// Check connectivity to an OpenAI-compatible backend.
#[derive(Parser, Debug)]
#[command(name = "reckon-connect")]
#[command(about = "Probe the chat backend, then chat with it line by line")]
#[command(version)]
struct Args {
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

    /// Skip the interactive prompt after the probe
    #[arg(long)]
    probe_only: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

async fn send(client: &dyn ChatClient, request: ChatRequest) -> bool {
    match client.complete(request).await {
        Ok(text) => {
            println!("OK");
            println!("Model: {}", text.trim());
            true
        }
        Err(e) => {
            println!("Error: {}", e);
            false
        }
    }
}

async fn probe(client: &dyn ChatClient) -> bool {
    println!("Question: {}", PROBE_QUESTION);
    println!("Expected: {}", PROBE_EXPECTED);
    let request = ChatRequest::with_system(PROBE_SYSTEM, PROBE_QUESTION)
        .with_temperature(0.0)
        .with_max_tokens(PROBE_MAX_TOKENS);
    send(client, request).await
}

async fn chat_loop(client: &dyn ChatClient) -> Result<(), ReadlineError> {
    let mut editor = DefaultEditor::new()?;
    println!("\nType a message to send it to the model. Ctrl+C or Ctrl+D exits.");

    loop {
        match editor.readline("> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(line);
                let request = ChatRequest::with_system(PROBE_SYSTEM, line)
                    .with_max_tokens(CHAT_MAX_TOKENS);
                send(client, request).await;
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!("Goodbye!");
                return Ok(());
            }
            Err(e) => return Err(e),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    eprintln!("=== Reckon Connect ===");
    eprintln!("Backend: {}", args.api_base);
    eprintln!("Model: {}", args.model);
    eprintln!();

    let config = LlmConfig::new(&args.api_key, &args.model)
        .with_api_base(&args.api_base)
        .with_timeout(Duration::from_secs(args.timeout));
    let client = match HttpChatClient::new(config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: failed to create client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let reachable = probe(&client).await;
    if args.probe_only {
        return if reachable {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        };
    }

    match chat_loop(&client).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Readline error: {}", e);
            ExitCode::FAILURE
        }
    }
}
