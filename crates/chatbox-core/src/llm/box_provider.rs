//! BoxLlmProvider -- object-safe dynamic dispatch wrapper for LlmProvider.
//!
//! 1. `LlmProviderDyn` is an object-safe mirror of `LlmProvider` with boxed futures
//! 2. Every `T: LlmProvider` gets `LlmProviderDyn` through a blanket impl
//! 3. `BoxLlmProvider` wraps `Box<dyn LlmProviderDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use chatbox_types::llm::{CompletionRequest, CompletionResponse, LlmError};

use super::provider::LlmProvider;

/// Object-safe version of [`LlmProvider`] with boxed futures.
pub trait LlmProviderDyn: Send + Sync {
    fn name(&self) -> &str;

    fn model(&self) -> &str;

    fn complete_boxed<'a>(
        &'a self,
        request: &'a CompletionRequest,
    ) -> Pin<Box<dyn Future<Output = Result<CompletionResponse, LlmError>> + Send + 'a>>;
}

impl<T: LlmProvider> LlmProviderDyn for T {
    fn name(&self) -> &str {
        LlmProvider::name(self)
    }

    fn model(&self) -> &str {
        LlmProvider::model(self)
    }

    fn complete_boxed<'a>(
        &'a self,
        request: &'a CompletionRequest,
    ) -> Pin<Box<dyn Future<Output = Result<CompletionResponse, LlmError>> + Send + 'a>> {
        Box::pin(self.complete(request))
    }
}

/// Type-erased completion provider.
///
/// `LlmProvider` uses RPITIT and cannot be a trait object directly, so the
/// application holds a `BoxLlmProvider` chosen from configuration at startup.
pub struct BoxLlmProvider {
    inner: Box<dyn LlmProviderDyn + Send + Sync>,
}

impl BoxLlmProvider {
    pub fn new<T: LlmProvider + 'static>(provider: T) -> Self {
        Self {
            inner: Box::new(provider),
        }
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub fn model(&self) -> &str {
        self.inner.model()
    }

    pub async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, LlmError> {
        self.inner.complete_boxed(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatbox_types::llm::{Message, MessageRole, Usage};

    struct EchoProvider;

    impl LlmProvider for EchoProvider {
        fn name(&self) -> &str {
            "echo"
        }

        fn model(&self) -> &str {
            "echo-1"
        }

        async fn complete(
            &self,
            request: &CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            let last = request
                .messages
                .last()
                .map(|m| m.content.clone())
                .unwrap_or_default();
            Ok(CompletionResponse {
                id: "resp-1".to_string(),
                model: request.model.clone(),
                reply: Message::new(MessageRole::Assistant, last),
                finish_reason: Some("stop".to_string()),
                usage: Usage::default(),
            })
        }
    }

    #[tokio::test]
    async fn test_box_provider_delegates() {
        let provider = BoxLlmProvider::new(EchoProvider);
        assert_eq!(provider.name(), "echo");
        assert_eq!(provider.model(), "echo-1");

        let request = CompletionRequest {
            model: "echo-1".to_string(),
            messages: vec![Message::new(MessageRole::User, "ping")],
            max_tokens: None,
            temperature: None,
        };
        let response = provider.complete(&request).await.unwrap();
        assert_eq!(response.reply.content, "ping");
        assert_eq!(response.reply.role, MessageRole::Assistant);
    }
}
