//! CLI command definitions for the `linkdex` binary.

pub mod check;
pub mod search;
pub mod stats;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Semantic search over a saved-links corpus.
#[derive(Parser)]
#[command(name = "linkdex", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (default: `config.toml` in the data directory).
    #[arg(long, global = true, env = "LINKDEX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Export spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server.
    Serve {
        /// Port to listen on (overrides `[server] port`).
        #[arg(long)]
        port: Option<u16>,

        /// Host to bind to (overrides `[server] host`).
        #[arg(long)]
        host: Option<String>,
    },

    /// Run a single search against the corpus.
    Search {
        /// Search term. Blank lists every record in load order.
        #[arg(default_value = "")]
        term: String,

        /// Show at most this many results.
        #[arg(long, short = 'n')]
        limit: Option<usize>,
    },

    /// Show corpus statistics.
    Stats,

    /// Validate the configuration and corpus source, then exit.
    Check,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
