#![warn(missing_docs)]
//! # deepguard binary
//!
//! Command-line shell for the media check: stages one file through the
//! picker path, runs the analysis, and prints the verdict.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use deepguard_app::{
    APP_VERSION, AppConfig, SubmissionSession, build_client, load_media_file, project_status,
    render_status, timeout_from_secs,
};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "deepguard")]
#[command(about = "Check an image or video for deepfake manipulation")]
#[command(version = APP_VERSION)]
struct Cli {
    /// Classification service base address
    #[arg(long, global = true, env = "DEEPGUARD_ENDPOINT")]
    endpoint: Option<String>,

    /// Overall request timeout in seconds (0 disables)
    #[arg(long, global = true, env = "DEEPGUARD_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Submit one image or video and print the verdict
    Analyze {
        /// Media file to check
        path: PathBuf,
        /// Print the status as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check that the classification service is up
    Health,
}

/// CLI entry point.
fn main() -> anyhow::Result<ExitCode> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    runtime.block_on(run(cli))
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "deepguard=info,deepguard_app=info,deepguard_upload=info"
    } else {
        "deepguard=warn,deepguard_app=warn,deepguard_upload=warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut config = AppConfig::from_env()?;
    if let Some(endpoint) = cli.endpoint {
        config.endpoint = endpoint;
    }
    if let Some(seconds) = cli.timeout_secs {
        config.request_timeout = timeout_from_secs(seconds);
    }
    let client = build_client(&config)?;

    match cli.command {
        Command::Analyze { path, json } => {
            let media = load_media_file(&path).await?;
            info!(file = %path.display(), mime_type = %media.mime_type(), "staging file");

            let mut session = SubmissionSession::new(client);
            session.pick_file(media);
            session.settle().await;
            if session.controller().error().is_none() && session.analyze() {
                session.settle().await;
            }

            let view = project_status(session.controller());
            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                println!("{}", render_status(&view));
            }

            Ok(if view.error.is_some() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            })
        }
        Command::Health => {
            let status = client
                .health()
                .await
                .with_context(|| format!("health check against {} failed", config.endpoint))?;
            println!("{status}");
            Ok(ExitCode::SUCCESS)
        }
    }
}
