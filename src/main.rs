use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use llm_reply::config::{self, DisplayTimezone};
use llm_reply::{NormalizedMessage, TimestampFormatter, extract_text_and_timestamp};
use serde::Serialize;
use serde_json::Value;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

/// Normalize a chat server reply into `{text, timestamp}` JSON.
#[derive(Debug, Parser)]
#[command(name = "llm-reply", version)]
struct Args {
    /// Reply file to read; `-` or omitted reads stdin
    path: Option<PathBuf>,

    /// Display timestamps in UTC regardless of configuration
    #[arg(long)]
    utc: bool,

    /// strftime pattern for the display timestamp
    #[arg(long)]
    pattern: Option<String>,
}

#[derive(Debug, Serialize)]
struct Rendered {
    #[serde(flatten)]
    message: NormalizedMessage,
    display_timestamp: String,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    if let Err(err) = run(args) {
        error!(error = %format!("{err:#}"), "llm-reply failed");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let mut config = config::load().context("Configuration error")?;

    if args.utc {
        config.display.timezone = DisplayTimezone::Utc;
    }
    if let Some(pattern) = args.pattern {
        config.display.pattern = pattern;
    }

    let formatter = TimestampFormatter::new(config.display).context("Configuration error")?;
    debug!(display = ?formatter.config(), "Effective configuration loaded");

    let body = read_input(args.path.as_deref(), std::io::stdin())?;
    let response = parse_reply(&body)?;

    let rendered = render(&formatter, &response);
    info!(
        text_len = rendered.message.text.len(),
        has_timestamp = rendered.message.timestamp.is_some(),
        "Reply normalized"
    );

    println!("{}", serde_json::to_string_pretty(&rendered)?);
    Ok(())
}

fn read_input(path: Option<&Path>, mut stdin: impl Read) -> Result<String> {
    match path {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        _ => {
            let mut body = String::new();
            stdin
                .read_to_string(&mut body)
                .context("Failed to read stdin")?;
            Ok(body)
        }
    }
}

/// Any well-formed JSON document is accepted, whatever its shape.
fn parse_reply(body: &str) -> Result<Value> {
    serde_json::from_str(body).context("Reply is not valid JSON")
}

/// Replies without a timestamp are shown with the time they were received.
fn render(formatter: &TimestampFormatter, response: &Value) -> Rendered {
    let message = extract_text_and_timestamp(Some(response));
    let display_timestamp = match &message.timestamp {
        Some(raw) => formatter.format_raw(raw),
        None => formatter.format(&Utc::now()),
    };

    Rendered {
        message,
        display_timestamp,
    }
}
