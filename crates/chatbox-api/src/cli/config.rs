//! `chatbox check-config`: print the configuration in effect.

use chatbox_infra::config::{effective_database_url, redacted};
use chatbox_types::config::AppConfig;

/// Render the effective configuration as TOML with secrets masked and the
/// database URL resolved.
pub fn render(config: &AppConfig) -> anyhow::Result<String> {
    let mut shown = redacted(config);
    shown.database_url = Some(effective_database_url(config));
    Ok(toml::to_string_pretty(&shown)?)
}

pub fn check_config(config: &AppConfig) -> anyhow::Result<()> {
    print!("{}", render(config)?);
    Ok(())
}
