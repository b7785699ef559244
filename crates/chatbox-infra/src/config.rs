//! Configuration loader for chatbox.
//!
//! Reads a TOML file into [`AppConfig`], then applies environment overrides.
//! A missing default file yields the defaults; a file that exists but does
//! not parse is an error.

use std::path::{Path, PathBuf};

use chatbox_types::config::AppConfig;

use crate::sqlite::pool::default_database_url;

/// File name looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "chatbox.toml";

/// Environment variables that override `provider.api_key`, highest
/// precedence first.
pub const API_KEY_ENV_VARS: &[&str] = &["CHATBOX_OPENAI_API_KEY", "OPENAI_API_KEY"];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Load configuration.
///
/// - `explicit` set: the file must exist.
/// - `explicit` unset: `chatbox.toml` in the working directory, defaults if absent.
///
/// Environment overrides are applied in both cases.
pub async fn load_config(explicit: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let (path, required) = match explicit {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };

    let mut config = match tokio::fs::read_to_string(&path).await {
        Ok(content) => toml::from_str::<AppConfig>(&content)
            .map_err(|source| ConfigError::Parse {
                path: path.clone(),
                source,
            })?,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound && !required => {
            tracing::debug!(path = %path.display(), "no config file found, using defaults");
            AppConfig::default()
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConfigError::NotFound(path));
        }
        Err(source) => return Err(ConfigError::Read { path, source }),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

/// Apply environment overrides using `lookup` to read variables.
pub fn apply_env_overrides(config: &mut AppConfig, lookup: impl Fn(&str) -> Option<String>) {
    let from_env = API_KEY_ENV_VARS
        .iter()
        .find_map(|key| lookup(key).filter(|v| !v.is_empty()).map(|v| (*key, v)));

    if let Some((key, value)) = from_env {
        tracing::debug!(source = key, "provider API key taken from environment");
        config.provider.api_key = Some(value);
    }
}

/// The database URL in effect: configured, else the data-directory default.
pub fn effective_database_url(config: &AppConfig) -> String {
    config
        .database_url
        .clone()
        .unwrap_or_else(default_database_url)
}

/// A copy safe to print: the API key is masked.
pub fn redacted(config: &AppConfig) -> AppConfig {
    let mut copy = config.clone();
    if copy.provider.api_key.is_some() {
        copy.provider.api_key = Some("********".to_string());
    }
    copy
}
