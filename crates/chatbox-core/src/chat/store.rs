//! MessageStore: append and replay of conversation turns.

use chatbox_types::chat::{MessageRole, NewTurn, Turn};
use chatbox_types::error::ChatError;

use super::repository::TurnRepository;

/// Durable, ordered turn storage keyed by conversation code.
///
/// Performs no ownership checks; callers resolve the conversation through
/// [`super::directory::ConversationDirectory`] first.
pub struct MessageStore<T: TurnRepository> {
    repo: T,
}

impl<T: TurnRepository> MessageStore<T> {
    pub fn new(repo: T) -> Self {
        Self { repo }
    }

    /// Append one turn. On success the turn is visible to every later
    /// [`history`](Self::history) call.
    pub async fn append(
        &self,
        conversation_code: &str,
        role: MessageRole,
        content: &str,
    ) -> Result<Turn, ChatError> {
        let turn = NewTurn {
            conversation_code: conversation_code.to_string(),
            role,
            content: content.to_string(),
        };

        let stored = self
            .repo
            .insert_turn(&turn)
            .await
            .map_err(|e| ChatError::storage("append_turn", conversation_code, e))?;

        tracing::debug!(
            conversation = %conversation_code,
            role = %stored.role,
            seq = stored.seq,
            "turn appended"
        );
        Ok(stored)
    }

    /// Every turn of the conversation in insertion order. An unknown code
    /// yields an empty history.
    pub async fn history(&self, conversation_code: &str) -> Result<Vec<Turn>, ChatError> {
        self.repo
            .list_turns(conversation_code)
            .await
            .map_err(|e| ChatError::storage("read_history", conversation_code, e))
    }

    pub async fn count(&self, conversation_code: &str) -> Result<u64, ChatError> {
        self.repo
            .count_turns(conversation_code)
            .await
            .map_err(|e| ChatError::storage("count_turns", conversation_code, e))
    }
}
