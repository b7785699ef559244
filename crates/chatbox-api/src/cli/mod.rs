//! CLI command definitions for the `chatbox` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod config;
pub mod migrate;
pub mod serve;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use chatbox_infra::config::effective_database_url;
use chatbox_infra::sqlite::pool::{resolve_data_dir, DatabasePool};
use chatbox_types::config::AppConfig;

/// Account-authenticated chat backend.
#[derive(Parser)]
#[command(name = "chatbox", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the TOML configuration file (default: ./chatbox.toml).
    #[arg(long, global = true, env = "CHATBOX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export spans to stdout through OpenTelemetry.
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run migrations and start the HTTP server.
    Serve {
        /// Address to bind, overriding `listen_address`.
        #[arg(long)]
        listen: Option<String>,
    },

    /// Apply database migrations and exit.
    Migrate,

    /// Print the effective configuration (API key redacted).
    CheckConfig,
}

/// Open the configured database, creating the default data directory when
/// no explicit URL is set. Migrations run as part of opening.
pub async fn open_database(config: &AppConfig) -> anyhow::Result<DatabasePool> {
    if config.database_url.is_none() {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir)
            .await
            .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;
    }

    let url = effective_database_url(config);
    DatabasePool::new(&url)
        .await
        .context("failed to open database")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_serve_with_global_flags() {
        let cli = Cli::try_parse_from([
            "chatbox",
            "-vv",
            "--otel",
            "serve",
            "--listen",
            "127.0.0.1:9000",
            "--config",
            "dev.toml",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.otel);
        assert_eq!(cli.config, Some(PathBuf::from("dev.toml")));
        match cli.command {
            Commands::Serve { listen } => assert_eq!(listen.as_deref(), Some("127.0.0.1:9000")),
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_parse_check_config() {
        let cli = Cli::try_parse_from(["chatbox", "--quiet", "check-config"]).unwrap();
        assert!(cli.quiet);
        assert!(matches!(cli.command, Commands::CheckConfig));
    }

    #[tokio::test]
    async fn test_open_database_with_explicit_url() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            database_url: Some(format!(
                "sqlite://{}?mode=rwc",
                dir.path().join("cli.db").display()
            )),
            ..AppConfig::default()
        };
        let pool = open_database(&config).await.unwrap();
        assert_eq!(pool.applied_migrations().await.unwrap().len(), 3);
    }
}
