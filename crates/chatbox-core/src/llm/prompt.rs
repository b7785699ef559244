//! Prompt assembly.
//!
//! Every prompt is rebuilt from storage: the fixed system instruction, the
//! stored turns in order, then the new user message. No state is carried
//! between calls.

use chatbox_types::chat::Turn;
use chatbox_types::llm::{CompletionRequest, Message, MessageRole};

/// Model parameters attached to every request.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub model: String,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f64>,
}

/// Convert stored turns into prompt messages, preserving order and roles.
pub fn history_messages(history: &[Turn]) -> Vec<Message> {
    history
        .iter()
        .map(|turn| Message::new(turn.role, turn.content.clone()))
        .collect()
}

/// `[system] ++ history ++ [user new_message]`.
pub fn prompt_messages(
    system_instruction: &str,
    history: &[Message],
    new_message: &str,
) -> Vec<Message> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(Message::new(MessageRole::System, system_instruction));
    messages.extend(history.iter().cloned());
    messages.push(Message::new(MessageRole::User, new_message));
    messages
}

pub fn build_request(
    options: &RequestOptions,
    system_instruction: &str,
    history: &[Message],
    new_message: &str,
) -> CompletionRequest {
    CompletionRequest {
        model: options.model.clone(),
        messages: prompt_messages(system_instruction, history, new_message),
        max_tokens: options.max_tokens,
        temperature: options.temperature,
    }
}
