//! capnote: capture chat messages into notes.
//!
//! `capnote run` reads one JSON [`IncomingMessage`] per line on stdin and
//! writes one JSON report per line on stdout.

use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use serde_json::json;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use capnote_capture::logging::{self, LogSettings};
use capnote_capture::{CaptureConfig, CaptureReport, CapturePipeline, IncomingMessage, NoteOutcome};

#[derive(Parser)]
#[command(name = "capnote")]
#[command(author, version, about = "Capture chat messages into notes")]
#[command(propagate_version = true)]
struct Cli {
    /// Config file (default: $CAPNOTE_CONFIG, ~/.config/capnote/capnote.toml, else CAPNOTE_* env vars)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process JSON messages from stdin, one per line
    Run,

    /// Capture a single message given on the command line
    Capture {
        /// Message text
        text: String,

        /// Sender display name
        #[arg(long, default_value = "admin")]
        sender: String,

        /// Treat the sender as a non-admin
        #[arg(long)]
        not_admin: bool,
    },

    /// Validate the configuration and print it as TOML
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let _log_guard = logging::init(&LogSettings::from_env());

    let cli = Cli::parse();
    let config = CaptureConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    match cli.command {
        Commands::CheckConfig => {
            let mut shown = config.clone();
            redact(&mut shown.joplin.token);
            redact(&mut shown.rest.api_token);
            println!("{}", toml::to_string_pretty(&shown)?);
            Ok(())
        }
        Commands::Capture {
            text,
            sender,
            not_admin,
        } => {
            let pipeline = CapturePipeline::from_config(&config).await?;
            let message = IncomingMessage {
                sender_id: sender.clone(),
                sender_name: sender,
                text,
                timestamp: Utc::now().timestamp_millis(),
                platform: "cli".to_string(),
                is_admin: !not_admin,
                ..Default::default()
            };
            let report = pipeline.process(&message).await;
            println!("{}", report_json(&report));
            pipeline.shutdown().await;
            Ok(())
        }
        Commands::Run => run(&config).await,
    }
}

async fn run(config: &CaptureConfig) -> anyhow::Result<()> {
    let pipeline = CapturePipeline::from_config(config).await?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    info!(subsystem = "capture", component = "cli", "Reading messages from stdin");

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line.context("Failed to read stdin")?,
            _ = tokio::signal::ctrl_c() => {
                info!(subsystem = "capture", component = "cli", "Interrupted");
                None
            }
        };
        let Some(line) = line else { break };
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<IncomingMessage>(&line) {
            Ok(message) => {
                let report = pipeline.process(&message).await;
                println!("{}", report_json(&report));
            }
            Err(e) => warn!(
                subsystem = "capture",
                component = "cli",
                error = %e,
                "Skipping malformed message line"
            ),
        }
    }

    pipeline.shutdown().await;
    Ok(())
}

fn redact(secret: &mut String) {
    if !secret.is_empty() {
        *secret = "********".to_string();
    }
}

fn report_json(report: &CaptureReport) -> serde_json::Value {
    let notes: Vec<serde_json::Value> = report
        .notes
        .iter()
        .map(|outcome| match outcome {
            NoteOutcome::Saved {
                title,
                note_id,
                failed_tags,
            } => json!({"outcome": "saved", "title": title, "note_id": note_id, "failed_tags": failed_tags}),
            NoteOutcome::Failed { title, error } => {
                json!({"outcome": "failed", "title": title, "error": error})
            }
            NoteOutcome::Skipped { url, reason } => {
                json!({"outcome": "skipped", "url": url, "reason": reason})
            }
        })
        .collect();

    json!({
        "capture_id": report.capture_id.to_string(),
        "stage": report.stage.as_str(),
        "admitted": report.admitted,
        "message_id": report.message_id,
        "memo_id": report.memo_id,
        "branches": report.branches.iter().map(|b| b.as_str()).collect::<Vec<_>>(),
        "notes": notes,
    })
}
