//! LlmProvider trait definition.
//!
//! The single abstraction every completion backend implements. Uses RPITIT
//! for `complete`; [`super::box_provider::BoxLlmProvider`] erases the type
//! for runtime provider selection.

use chatbox_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for completion provider backends.
///
/// Implementations live in chatbox-infra (e.g., `OpenAiProvider`).
/// A provider is stateless: the full prompt travels in every request.
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "openai").
    fn name(&self) -> &str;

    /// Model identifier requests are sent with.
    fn model(&self) -> &str;

    /// Send a completion request and receive exactly one reply.
    ///
    /// Returns `LlmError::EmptyReply` when the provider yields no choices.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
