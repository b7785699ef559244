//! ConversationDirectory: owner-scoped lookup and lazy creation.

use chrono::Utc;
use uuid::Uuid;

use chatbox_types::account::AccountId;
use chatbox_types::chat::{CONVERSATION_LIST_LIMIT, Conversation, TITLE_MAX_CHARS};
use chatbox_types::error::{ChatError, RepositoryError};

use super::repository::ConversationRepository;

/// Attempts at generating a fresh code before giving up on a conflict.
const CREATE_ATTEMPTS: usize = 3;

/// Derive a conversation title from its seed message.
///
/// Keeps the first [`TITLE_MAX_CHARS`] Unicode scalar values, so a
/// multi-byte character is never split.
pub fn title_from_seed(seed: &str) -> String {
    seed.chars().take(TITLE_MAX_CHARS).collect()
}

/// Maps `(owner, code)` to conversation records.
pub struct ConversationDirectory<C: ConversationRepository> {
    repo: C,
}

impl<C: ConversationRepository> ConversationDirectory<C> {
    pub fn new(repo: C) -> Self {
        Self { repo }
    }

    /// Return the owner's conversation with `code`, or create a new one
    /// seeded by `seed_message` when `code` is empty or unknown to this
    /// owner. A code owned by somebody else counts as unknown.
    pub async fn resolve_or_create(
        &self,
        owner: AccountId,
        code: &str,
        seed_message: &str,
    ) -> Result<Conversation, ChatError> {
        if !code.is_empty() {
            if let Some(existing) = self.resolve(owner, code).await? {
                return Ok(existing);
            }
            tracing::debug!(%owner, code, "conversation code not found for owner, creating new");
        }

        let title = title_from_seed(seed_message);
        let mut last_conflict = None;

        for _ in 0..CREATE_ATTEMPTS {
            let conversation = Conversation {
                code: Uuid::new_v4().to_string(),
                owner_account_id: owner,
                title: title.clone(),
                created_at: Utc::now(),
            };

            match self.repo.create_conversation(&conversation).await {
                Ok(created) => {
                    tracing::info!(%owner, code = %created.code, "conversation created");
                    return Ok(created);
                }
                Err(RepositoryError::Conflict(msg)) => {
                    tracing::warn!(%owner, "conversation code collision, regenerating");
                    last_conflict = Some(RepositoryError::Conflict(msg));
                }
                Err(e) => {
                    return Err(ChatError::storage("create_conversation", owner.to_string(), e));
                }
            }
        }

        Err(ChatError::storage(
            "create_conversation",
            owner.to_string(),
            last_conflict.unwrap_or_else(|| RepositoryError::Conflict("code".to_string())),
        ))
    }

    /// Owner-scoped lookup without side effects.
    pub async fn resolve(
        &self,
        owner: AccountId,
        code: &str,
    ) -> Result<Option<Conversation>, ChatError> {
        self.repo
            .find_by_owner_and_code(owner, code)
            .await
            .map_err(|e| ChatError::storage("resolve_conversation", code, e))
    }

    /// The owner's conversations, newest first, capped at
    /// [`CONVERSATION_LIST_LIMIT`].
    pub async fn list_for_account(&self, owner: AccountId) -> Result<Vec<Conversation>, ChatError> {
        self.repo
            .list_by_owner(owner, CONVERSATION_LIST_LIMIT)
            .await
            .map_err(|e| ChatError::storage("list_conversations", owner.to_string(), e))
    }
}
