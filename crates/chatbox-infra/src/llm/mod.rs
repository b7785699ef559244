//! Completion provider implementations.
//!
//! [`create_provider`] builds the configured provider behind a
//! [`BoxLlmProvider`] so the rest of the application stays provider-agnostic.

pub mod openai;

use std::time::Duration;

use secrecy::SecretString;

use chatbox_core::llm::box_provider::BoxLlmProvider;
use chatbox_types::config::ProviderSettings;
use chatbox_types::llm::LlmError;

use self::openai::{OpenAiConfig, OpenAiProvider};

/// Provider names that speak the OpenAI chat completions protocol.
const OPENAI_COMPATIBLE: &[&str] = &["openai", "openai-compatible", "azure-openai", "ollama"];

/// Extra transport headroom over the engine's own call deadline, so the
/// engine's timeout is the one callers observe.
const TRANSPORT_GRACE: Duration = Duration::from_secs(5);

/// Create a [`BoxLlmProvider`] from `[provider]` settings.
///
/// The API key must already be resolved (see `config::load_config`).
pub fn create_provider(settings: &ProviderSettings) -> Result<BoxLlmProvider, LlmError> {
    let name = settings.name.to_lowercase();
    if !OPENAI_COMPATIBLE.contains(&name.as_str()) {
        return Err(LlmError::Provider {
            message: format!("unknown provider '{}'", settings.name),
        });
    }

    let key = settings
        .api_key
        .as_deref()
        .filter(|k| !k.is_empty())
        .ok_or(LlmError::AuthenticationFailed)?;

    let provider = OpenAiProvider::new(OpenAiConfig {
        provider_name: name.clone(),
        base_url: settings.base_url.clone(),
        api_key: SecretString::from(key.to_string()),
        model: settings.model.clone(),
        request_timeout: Duration::from_secs(settings.timeout_secs) + TRANSPORT_GRACE,
    })?;

    tracing::info!(
        provider = %name,
        model = %settings.model,
        base_url = %settings.base_url,
        "completion provider configured"
    );
    Ok(BoxLlmProvider::new(provider))
}
