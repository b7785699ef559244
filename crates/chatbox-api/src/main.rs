//! chatbox CLI and REST API entry point.
//!
//! Binary name: `chatbox`
//!
//! Parses CLI arguments, loads configuration, initializes tracing, then
//! dispatches to the selected command.

mod cli;
mod http;
mod state;

use clap::Parser;

use chatbox_infra::config::load_config;
use chatbox_observe::tracing_setup::{default_filter, init_tracing, shutdown_tracing};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(default_filter(cli.verbose, cli.quiet), cli.otel)
        .map_err(|e| anyhow::anyhow!(e))?;

    let result = run(cli).await;
    if let Err(e) = &result {
        tracing::error!(error = %format!("{e:#}"), "chatbox exited with an error");
    }

    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref()).await?;

    match cli.command {
        Commands::Serve { listen } => cli::serve::serve(&config, listen).await,
        Commands::Migrate => cli::migrate::migrate(&config).await,
        Commands::CheckConfig => cli::config::check_config(&config),
    }
}
