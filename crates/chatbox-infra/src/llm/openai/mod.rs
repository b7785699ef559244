//! OpenAiProvider -- [`LlmProvider`] for OpenAI-compatible chat completions.
//!
//! Posts the full prompt to `{base_url}/chat/completions` and returns the
//! first choice. The API key is wrapped in [`SecretString`] and only exposed
//! when building the `Authorization` header.

pub mod types;

use std::str::FromStr;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use chatbox_core::llm::provider::LlmProvider;
use chatbox_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, Message, MessageRole, Usage,
};

use self::types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};

/// Connection settings for an OpenAI-compatible endpoint.
pub struct OpenAiConfig {
    pub provider_name: String,
    /// Base URL including the version segment, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    pub api_key: SecretString,
    pub model: String,
    /// Transport-level ceiling; the engine applies its own deadline too.
    pub request_timeout: Duration,
}

/// OpenAI-compatible completion provider.
///
/// Does not derive Debug so the client and key never end up in logs.
pub struct OpenAiProvider {
    client: reqwest::Client,
    provider_name: String,
    base_url: String,
    api_key: SecretString,
    model: String,
}

impl OpenAiProvider {
    pub fn new(config: OpenAiConfig) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| LlmError::Provider {
                message: format!("failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            provider_name: config.provider_name,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
            model: config.model,
        })
    }

    fn url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn to_wire_request(request: &CompletionRequest) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: request.model.clone(),
            messages: request
                .messages
                .iter()
                .map(|m| ChatMessage {
                    role: m.role.to_string(),
                    content: Some(m.content.clone()),
                })
                .collect(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        }
    }
}

impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        &self.provider_name
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = Self::to_wire_request(request);

        let response = self
            .client
            .post(self.url())
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Provider {
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            tracing::warn!(provider = %self.provider_name, %status, "completion request rejected");
            return Err(match status.as_u16() {
                401 | 403 => LlmError::AuthenticationFailed,
                429 => LlmError::RateLimited,
                _ => LlmError::Provider {
                    message: format!("HTTP {status}: {error_body}"),
                },
            });
        }

        let wire: ChatCompletionResponse = response.json().await.map_err(|e| {
            LlmError::Deserialization(format!("failed to parse response: {e}"))
        })?;

        let usage = wire.usage.unwrap_or_default();
        let choice = wire.choices.into_iter().next().ok_or(LlmError::EmptyReply)?;
        let role = MessageRole::from_str(&choice.message.role).map_err(|_| {
            LlmError::Deserialization(format!("unknown reply role '{}'", choice.message.role))
        })?;
        let content = choice.message.content.ok_or(LlmError::EmptyReply)?;

        Ok(CompletionResponse {
            id: wire.id,
            model: wire.model,
            reply: Message::new(role, content),
            finish_reason: choice.finish_reason,
            usage: Usage {
                input_tokens: usage.prompt_tokens,
                output_tokens: usage.completion_tokens,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{Value, json};

    #[derive(Clone)]
    struct Upstream {
        status: StatusCode,
        body: Value,
        seen: Arc<Mutex<Vec<(Option<String>, Value)>>>,
    }

    async fn handler(
        State(upstream): State<Upstream>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        upstream.seen.lock().unwrap().push((auth, body));
        (upstream.status, Json(upstream.body.clone()))
    }

    /// Serve one canned response on an ephemeral port.
    async fn spawn_upstream(status: StatusCode, body: Value) -> (String, Upstream) {
        let upstream = Upstream {
            status,
            body,
            seen: Arc::default(),
        };
        let app = Router::new()
            .route("/v1/chat/completions", post(handler))
            .with_state(upstream.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}/v1"), upstream)
    }

    fn provider(base_url: String) -> OpenAiProvider {
        OpenAiProvider::new(OpenAiConfig {
            provider_name: "openai".to_string(),
            base_url,
            api_key: SecretString::from("sk-test".to_string()),
            model: "gpt-3.5-turbo".to_string(),
            request_timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    fn request() -> CompletionRequest {
        CompletionRequest {
            model: "gpt-3.5-turbo".to_string(),
            messages: vec![
                Message::new(MessageRole::System, "From now you are Primbon Ajaib!"),
                Message::new(MessageRole::User, "What is my fortune?"),
            ],
            max_tokens: None,
            temperature: Some(0.7),
        }
    }

    #[tokio::test]
    async fn test_complete_parses_first_choice() {
        let (url, upstream) = spawn_upstream(
            StatusCode::OK,
            json!({
                "id": "chatcmpl-1",
                "model": "gpt-3.5-turbo",
                "choices": [
                    {"message": {"role": "assistant", "content": "Good luck"}, "finish_reason": "stop"},
                    {"message": {"role": "assistant", "content": "ignored"}, "finish_reason": "stop"}
                ],
                "usage": {"prompt_tokens": 12, "completion_tokens": 2}
            }),
        )
        .await;

        let response = provider(url).complete(&request()).await.unwrap();
        assert_eq!(response.reply, Message::new(MessageRole::Assistant, "Good luck"));
        assert_eq!(response.id, "chatcmpl-1");
        assert_eq!(response.finish_reason.as_deref(), Some("stop"));
        assert_eq!(response.usage.input_tokens, 12);
        assert_eq!(response.usage.output_tokens, 2);

        let seen = upstream.seen.lock().unwrap();
        let (auth, body) = &seen[0];
        assert_eq!(auth.as_deref(), Some("Bearer sk-test"));
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "What is my fortune?");
        assert_eq!(body["temperature"], 0.7);
        assert!(body.get("max_tokens").is_none());
    }

    #[tokio::test]
    async fn test_zero_choices_is_empty_reply() {
        let (url, _) = spawn_upstream(StatusCode::OK, json!({"id": "x", "choices": []})).await;
        let err = provider(url).complete(&request()).await.unwrap_err();
        assert!(matches!(err, LlmError::EmptyReply));
    }

    #[tokio::test]
    async fn test_reply_role_is_taken_from_first_choice() {
        let (url, _) = spawn_upstream(
            StatusCode::OK,
            json!({"id": "x", "choices": [{"message": {"role": "system", "content": "hi"}}]}),
        )
        .await;
        let response = provider(url).complete(&request()).await.unwrap();
        assert_eq!(response.reply, Message::new(MessageRole::System, "hi"));
    }

    #[tokio::test]
    async fn test_unknown_reply_role_is_deserialization_error() {
        let (url, _) = spawn_upstream(
            StatusCode::OK,
            json!({"id": "x", "choices": [{"message": {"role": "tool", "content": "hi"}}]}),
        )
        .await;
        let err = provider(url).complete(&request()).await.unwrap_err();
        assert!(matches!(err, LlmError::Deserialization(_)));
    }

    #[tokio::test]
    async fn test_null_content_is_empty_reply() {
        let (url, _) = spawn_upstream(
            StatusCode::OK,
            json!({"id": "x", "choices": [{"message": {"role": "assistant", "content": null}}]}),
        )
        .await;
        let err = provider(url).complete(&request()).await.unwrap_err();
        assert!(matches!(err, LlmError::EmptyReply));
    }

    #[tokio::test]
    async fn test_status_codes_map_to_errors() {
        let (url, _) = spawn_upstream(StatusCode::UNAUTHORIZED, json!({"error": "bad key"})).await;
        assert!(matches!(
            provider(url).complete(&request()).await.unwrap_err(),
            LlmError::AuthenticationFailed
        ));

        let (url, _) = spawn_upstream(StatusCode::TOO_MANY_REQUESTS, json!({})).await;
        assert!(matches!(
            provider(url).complete(&request()).await.unwrap_err(),
            LlmError::RateLimited
        ));

        let (url, _) = spawn_upstream(StatusCode::INTERNAL_SERVER_ERROR, json!({"error": "boom"})).await;
        match provider(url).complete(&request()).await.unwrap_err() {
            LlmError::Provider { message } => assert!(message.contains("500")),
            other => panic!("expected provider error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_provider_error() {
        let err = provider("http://127.0.0.1:9/v1".to_string())
            .complete(&request())
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Provider { .. }));
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let p = provider("http://localhost:1234/v1/".to_string());
        assert_eq!(p.url(), "http://localhost:1234/v1/chat/completions");
    }
}
