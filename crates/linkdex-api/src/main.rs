//! linkdex CLI and HTTP server entry point.
//!
//! Binary name: `linkdex`
//!
//! Parses CLI arguments, loads configuration, then dispatches to the
//! requested command or starts the HTTP server.

mod cli;
mod http;
mod state;

use std::path::PathBuf;

use anyhow::anyhow;
use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands};
use linkdex_infra::config::{load_config, load_config_file, resolve_data_dir};
use linkdex_observe::{LogFormat, TracingOptions, filter_for_verbosity, init_tracing, shutdown_tracing};
use linkdex_types::config::LinkdexConfig;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(&TracingOptions {
        default_filter: filter_for_verbosity(cli.verbose, cli.quiet).to_string(),
        format: if cli.log_json {
            LogFormat::Json
        } else {
            LogFormat::Text
        },
        enable_otel: cli.otel,
    })
    .map_err(|e| anyhow!("failed to initialize tracing: {e}"))?;

    // Shell completions don't need configuration
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "linkdex", &mut std::io::stdout());
        return Ok(());
    }

    let data_dir = resolve_data_dir();
    let config = match &cli.config {
        Some(path) => load_config_file(path).await?,
        None => load_config(&data_dir).await,
    };

    let result = run(cli, config, data_dir).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli, config: LinkdexConfig, data_dir: PathBuf) -> anyhow::Result<()> {
    match cli.command {
        Commands::Serve { port, host } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);

            let state = AppState::init(config, data_dir).await?;
            let records = state.search_service.snapshot().await.len();
            tracing::debug!(data_dir = %state.data_dir.display(), "data directory");

            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            if !cli.quiet {
                println!(
                    "  {} linkdex serving {} records on {}",
                    console::style("⚡").bold(),
                    console::style(records).bold(),
                    console::style(format!("http://{addr}")).cyan()
                );
                println!("  {}", console::style("Press Ctrl+C to stop").dim());
            }

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            if !cli.quiet {
                println!("\n  Server stopped.");
            }
        }

        Commands::Search { term, limit } => {
            let state = AppState::init(config, data_dir).await?;
            cli::search::search(&state, &term, limit, cli.json).await?;
        }

        Commands::Stats => {
            cli::stats::stats(&config, &data_dir, cli.json).await?;
        }

        Commands::Check => {
            cli::check::check(&config, &data_dir, cli.json).await?;
        }

        Commands::Completions { .. } => unreachable!("handled in main"),
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
