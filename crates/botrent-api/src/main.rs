//! botrent CLI and REST API entry point.
//!
//! Binary name: `botrent`
//!
//! Parses CLI arguments, opens the trial tracker, then dispatches to the
//! appropriate command handler or starts the REST API server.

mod cli;
mod http;
mod state;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use clap_complete::generate;

use botrent_core::trial::spawn_sweeper;

use cli::{Cli, Commands, TrialCommand};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions don't need tracing or app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "botrent", &mut std::io::stdout());
        return Ok(());
    }

    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,botrent=debug",
        _ => "trace",
    };
    botrent_observe::tracing_setup::init_tracing(filter, cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    botrent_observe::tracing_setup::shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let state = AppState::init().await?;

    match cli.command {
        Commands::Trial { action } => match action {
            TrialCommand::Activate { bot_id, name } => {
                cli::trial::activate_trial(&state, bot_id, name, cli.json).await?;
            }
            TrialCommand::Deactivate { bot_id, force } => {
                cli::trial::deactivate_trial(&state, bot_id, force, cli.json).await?;
            }
            TrialCommand::Status { bot_id } => {
                cli::trial::show_trial(&state, bot_id, cli.json).await?;
            }
            TrialCommand::List => {
                cli::trial::list_trials(&state, cli.json).await?;
            }
            TrialCommand::Sweep => {
                cli::trial::sweep_trials(&state, cli.json).await?;
            }
        },

        Commands::Status => {
            cli::status::status(&state, cli.json).await?;
        }

        Commands::Serve { port, host } => {
            let sweeper = spawn_sweeper(Arc::clone(&state.tracker), state.config.sweep_interval());

            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("failed to bind {addr}"))?;

            if !cli.quiet {
                println!();
                println!(
                    "  {} botrent API listening on {}",
                    console::style("⚡").bold(),
                    console::style(format!("http://{addr}/api/v1")).cyan()
                );
                println!(
                    "  {} sweeping every {}s",
                    console::style("↻").dim(),
                    state.config.sweep_interval().as_secs()
                );
                println!();
            }
            tracing::info!(%addr, storage = %state.config.storage, "Server started");

            let router = http::router::build_router(state.clone());
            let served = axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await;

            sweeper.stop().await;
            served?;

            if !cli.quiet {
                println!("\n  Server stopped.");
            }
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
