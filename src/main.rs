use std::{
    io::{self, Write},
    process::ExitCode,
};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use llm_gate::{
    CompletionResponse, Message, Registry, StartupCredentials, ask_model, print_stream,
};

const DEFAULT_SYSTEM_PROMPT: &str = "You're an expert software engineer and a great teacher. \
Assume the user is a beginner and explain with a short example.";

/// Ask a configured model a question and print the answer.
#[derive(Parser, Debug)]
#[command(name = "llm-gate", version, about)]
struct Args {
    /// Question to ask
    #[arg(required_unless_present = "list")]
    question: Option<String>,

    /// Registered service to ask
    #[arg(short, long, env = "LLM_GATE_MODEL", default_value = "gpt-4o-mini")]
    model: String,

    /// System prompt sent before the question
    #[arg(short, long, default_value = DEFAULT_SYSTEM_PROMPT)]
    system: String,

    /// Wait for the whole answer instead of streaming it
    #[arg(long)]
    no_stream: bool,

    /// List the registered services and exit
    #[arg(long)]
    list: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    match run(Args::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let credentials = StartupCredentials::from_env()?;
    let registry = Registry::default_services(&credentials);

    if args.list {
        for service in registry.services() {
            println!(
                "{}\t{}\t{}",
                service.name,
                service.model_id(),
                service.base_url.as_deref().unwrap_or("(default)")
            );
        }
        return Ok(());
    }

    let Some(question) = args.question else {
        return Err("missing question".into());
    };

    let messages = vec![Message::system(args.system), Message::user(question)];

    match ask_model(&registry, &args.model, &messages, !args.no_stream).await? {
        CompletionResponse::Complete(completion) => {
            println!("{}", completion.content);
        }
        CompletionResponse::Streaming(fragments) => {
            let mut stdout = io::stdout().lock();
            print_stream(fragments, &mut stdout).await;
            writeln!(stdout)?;
        }
    }

    Ok(())
}
