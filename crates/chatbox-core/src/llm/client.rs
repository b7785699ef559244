//! CompletionClient: bounded, single-reply completion calls.

use std::sync::Arc;
use std::time::Duration;

use chatbox_types::config::ProviderSettings;
use chatbox_types::llm::{LlmError, Message};

use super::box_provider::BoxLlmProvider;
use super::prompt::{RequestOptions, build_request};

/// Wraps a provider with the request options and the call deadline.
///
/// Stateless: every call sends the full prompt.
#[derive(Clone)]
pub struct CompletionClient {
    provider: Arc<BoxLlmProvider>,
    options: RequestOptions,
    timeout: Duration,
}

impl CompletionClient {
    pub fn new(provider: Arc<BoxLlmProvider>, options: RequestOptions, timeout: Duration) -> Self {
        Self {
            provider,
            options,
            timeout,
        }
    }

    /// Build a client from `[provider]` settings.
    pub fn from_settings(provider: Arc<BoxLlmProvider>, settings: &ProviderSettings) -> Self {
        let options = RequestOptions {
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
        };
        Self::new(provider, options, Duration::from_secs(settings.timeout_secs))
    }

    /// Ask the provider for one reply to `new_message` given the system
    /// instruction and prior turns.
    ///
    /// Fails with `LlmError::Timeout` when the deadline passes; the pending
    /// request is dropped.
    #[tracing::instrument(
        name = "completion",
        skip_all,
        fields(provider = %self.provider.name(), model = %self.options.model, history_len = history.len())
    )]
    pub async fn complete(
        &self,
        system_instruction: &str,
        history: &[Message],
        new_message: &str,
    ) -> Result<Message, LlmError> {
        let request = build_request(&self.options, system_instruction, history, new_message);

        let response = match tokio::time::timeout(self.timeout, self.provider.complete(&request)).await
        {
            Ok(result) => result?,
            Err(_) => {
                let timeout_ms = self.timeout.as_millis() as u64;
                tracing::warn!(timeout_ms, "completion call timed out");
                return Err(LlmError::Timeout { timeout_ms });
            }
        };

        tracing::debug!(
            response_id = %response.id,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            finish_reason = response.finish_reason.as_deref().unwrap_or(""),
            "completion received"
        );

        Ok(response.reply)
    }
}
