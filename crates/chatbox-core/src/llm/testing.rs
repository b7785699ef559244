//! Scripted providers for engine tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use chatbox_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, Message, MessageRole, Usage,
};

use super::provider::LlmProvider;

/// Replies with queued contents in order and records every request.
#[derive(Clone, Default)]
pub struct ScriptedProvider {
    replies: Arc<Mutex<VecDeque<String>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl ScriptedProvider {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Arc::new(Mutex::new(replies.into_iter().map(Into::into).collect())),
            requests: Arc::default(),
        }
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted-1"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        let content = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or(LlmError::EmptyReply)?;
        Ok(CompletionResponse {
            id: "scripted".to_string(),
            model: request.model.clone(),
            reply: Message::new(MessageRole::Assistant, content),
            finish_reason: Some("stop".to_string()),
            usage: Usage::default(),
        })
    }
}

/// Always fails with a provider error.
pub struct FailingProvider;

impl LlmProvider for FailingProvider {
    fn name(&self) -> &str {
        "failing"
    }

    fn model(&self) -> &str {
        "failing-1"
    }

    async fn complete(&self, _request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        Err(LlmError::Provider {
            message: "upstream unavailable".to_string(),
        })
    }
}

/// Never answers.
pub struct HangingProvider;

impl LlmProvider for HangingProvider {
    fn name(&self) -> &str {
        "hanging"
    }

    fn model(&self) -> &str {
        "hanging-1"
    }

    async fn complete(&self, _request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        std::future::pending::<()>().await;
        Err(LlmError::EmptyReply)
    }
}
