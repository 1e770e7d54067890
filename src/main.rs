//! Query ID Bot - Main Entry Point
//!
//! Logs Telegram accounts in by phone number or from saved session files
//! and collects the WebView init data a bot hands out to each of them.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use query_id_bot::config::{AppSettings, TelegramConfig};
use query_id_bot::prompt::TerminalPrompter;
use query_id_bot::storage::{ResultStore, SessionStore};
use query_id_bot::telegram::GrammersConnector;
use query_id_bot::workflow::Workflow;

/// Interactive Telegram utility collecting bot WebView query data.
#[derive(Parser, Debug)]
#[command(name = "query_id_bot")]
#[command(about = "Collect Telegram WebView query data for many accounts")]
#[command(version)]
struct Args {
    /// Path to the .env file for environment variables.
    #[arg(long, default_value = ".env")]
    env_file: String,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    init_logging(&args.log_level);

    // Load environment variables
    if let Err(e) = dotenvy::from_filename(&args.env_file) {
        debug!("Could not load .env file ({}): {}", args.env_file, e);
    }

    let tg_config = TelegramConfig::from_env()
        .context("Failed to load Telegram configuration from environment")?;
    let settings = AppSettings::from_env_with_defaults();

    println!("Welcome to the Telegram Bot Utility!");
    println!("Telegram Query ID Bot");

    info!(
        "Sessions in {}, results in {}",
        settings.sessions_dir.display(),
        settings.results_dir.display()
    );

    let connector = GrammersConnector::new(tg_config, settings.webview_platform.clone())
        .context("Failed to prepare live session directory")?;

    Workflow::new(
        connector,
        TerminalPrompter::new(),
        SessionStore::new(&settings.sessions_dir),
        ResultStore::new(&settings.results_dir),
    )
    .with_login_delay(settings.login_delay())
    .run()
    .await
    .context("Interactive session failed")?;

    info!("Goodbye");
    Ok(())
}

/// Initializes the logging subsystem.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
