//! Command-line interface for strictly_wager_server.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Strictly Wager - wagered tic-tac-toe match server
#[derive(Parser, Debug)]
#[command(name = "strictly_wager_server")]
#[command(about = "Wagered tic-tac-toe match engine over HTTP", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP match server
    Serve {
        /// Port to bind to
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Engine config (TOML). Built-in defaults apply when omitted.
        #[arg(short, long, env = "STRICTLY_WAGER_CONFIG")]
        config: Option<PathBuf>,

        /// Tokens minted per faucet request that names no amount
        #[arg(long, default_value = "100000000")]
        faucet_amount: u64,
    },

    /// Load and validate an engine config, then print it
    CheckConfig {
        /// Engine config (TOML)
        #[arg(short, long, env = "STRICTLY_WAGER_CONFIG")]
        config: PathBuf,
    },
}
