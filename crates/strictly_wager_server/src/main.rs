//! Strictly Wager - command-line launcher
//!
//! Serves the match engine over HTTP or validates an engine config.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use std::path::PathBuf;
use strictly_wager::{Amount, EngineConfig, MatchEngine};
use strictly_wager_server::{AppState, router};
use tokio::net::TcpListener;
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            port,
            host,
            config,
            faucet_amount,
        } => run_http_server(host, port, config, faucet_amount).await,
        Command::CheckConfig { config } => check_config(config),
    }
}

/// Loads the engine config, falling back to built-in defaults.
#[instrument]
fn load_config(path: Option<&PathBuf>) -> Result<EngineConfig> {
    match path {
        Some(path) => {
            info!(path = %path.display(), "Loading engine config");
            Ok(EngineConfig::from_file(path)?)
        }
        None => {
            info!("No config given, using defaults");
            Ok(EngineConfig::default())
        }
    }
}

/// Run the HTTP match server
async fn run_http_server(
    host: String,
    port: u16,
    config: Option<PathBuf>,
    faucet_amount: Amount,
) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,strictly_wager=debug")),
        )
        .init();

    let config = load_config(config.as_ref())?;
    info!(
        admin = %config.admin().principal(),
        currency = %config.preferred_currency(),
        "Starting Strictly Wager server"
    );

    let state = AppState::new(MatchEngine::in_memory(config)?, faucet_amount);
    let app = router(state);

    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, "Server ready");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Validate a config file and print the effective settings
fn check_config(path: PathBuf) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = load_config(Some(&path))?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
