//! ConversationEngine: the post-message orchestration.
//!
//! Flow for one `post_message`:
//! 1. validate the message and resolve the caller's account
//! 2. resolve or lazily create the conversation
//! 3. (optionally) take the per-conversation lock
//! 4. replay stored history and call the provider
//! 5. append the user turn, then the reply turn
//!
//! Nothing is written before the provider succeeds, so a failed or timed
//! out call leaves no turns behind. The two appends run on a spawned task
//! that owns the conversation lock; dropping the caller's future after the
//! reply arrived still stores both turns.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::OwnedMutexGuard;
use tracing::Instrument;

use chatbox_types::account::Identity;
use chatbox_types::chat::{Conversation, MessageRole, PostMessageOutcome, Reply, Turn};
use chatbox_types::config::ChatSettings;
use chatbox_types::error::{ChatError, RepositoryError};
use chatbox_types::llm::Message;

use crate::account::repository::AccountRepository;
use crate::account::resolver::AccountResolver;
use crate::llm::client::CompletionClient;
use crate::llm::prompt::history_messages;
use crate::validation;

use super::directory::ConversationDirectory;
use super::locks::ConversationLocks;
use super::repository::{ConversationRepository, TurnRepository};
use super::store::MessageStore;

/// Tunables for the engine, usually taken from `[chat]` settings.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub system_instruction: String,
    /// Attempts per append after a successful provider call (at least 1).
    pub append_retries: u32,
    pub append_backoff: Duration,
    pub serialize_per_conversation: bool,
}

impl From<&ChatSettings> for EngineSettings {
    fn from(settings: &ChatSettings) -> Self {
        Self {
            system_instruction: settings.system_instruction.clone(),
            append_retries: settings.append_retries.max(1),
            append_backoff: Duration::from_millis(settings.append_retry_backoff_ms),
            serialize_per_conversation: settings.serialize_per_conversation,
        }
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::from(&ChatSettings::default())
    }
}

/// Orchestrates conversations for authenticated callers.
///
/// Generic over its repositories following the service pattern used across
/// this crate; the API layer fixes the concrete SQLite types.
pub struct ConversationEngine<A, C, T>
where
    A: AccountRepository,
    C: ConversationRepository,
    T: TurnRepository,
{
    accounts: AccountResolver<A>,
    directory: ConversationDirectory<C>,
    store: Arc<MessageStore<T>>,
    client: CompletionClient,
    settings: EngineSettings,
    locks: ConversationLocks,
}

impl<A, C, T> ConversationEngine<A, C, T>
where
    A: AccountRepository,
    C: ConversationRepository,
    T: TurnRepository + 'static,
{
    pub fn new(
        accounts: AccountResolver<A>,
        directory: ConversationDirectory<C>,
        store: MessageStore<T>,
        client: CompletionClient,
        settings: EngineSettings,
    ) -> Self {
        Self {
            accounts,
            directory,
            store: Arc::new(store),
            client,
            settings,
            locks: ConversationLocks::new(),
        }
    }

    /// Post `message` to the conversation `code` (empty for a new one) and
    /// return the assistant's reply together with the effective code.
    ///
    /// On success exactly two turns were appended, user then assistant.
    #[tracing::instrument(
        name = "post_message",
        skip_all,
        fields(account_id = %identity.account_id, code = %code)
    )]
    pub async fn post_message(
        &self,
        identity: &Identity,
        code: &str,
        message: &str,
    ) -> Result<PostMessageOutcome, ChatError> {
        validation::validate_message(message).map_err(ChatError::Validation)?;

        let owner = self.accounts.resolve(identity).await?;
        let conversation = self.directory.resolve_or_create(owner, code, message).await?;

        let guard = if self.settings.serialize_per_conversation {
            Some(self.locks.lock(&conversation.code).await)
        } else {
            None
        };

        let result = self.exchange(&conversation, message, guard).await;
        self.locks.prune();

        let reply = result?;
        Ok(PostMessageOutcome {
            chatbox_code: conversation.code,
            result: Reply {
                role: reply.role,
                content: reply.content,
            },
        })
    }

    /// History replay and provider call, then the two appends.
    ///
    /// `guard` moves into the append task and is released once both turns
    /// are stored or the appends gave up.
    async fn exchange(
        &self,
        conversation: &Conversation,
        message: &str,
        guard: Option<OwnedMutexGuard<()>>,
    ) -> Result<Turn, ChatError> {
        let code = conversation.code.as_str();
        let history = self.store.history(code).await?;

        let reply = self
            .client
            .complete(
                &self.settings.system_instruction,
                &history_messages(&history),
                message,
            )
            .await
            .inspect_err(|e| tracing::warn!(code, error = %e, "provider call failed, nothing persisted"))?;

        let persist = tokio::spawn(
            persist_exchange(
                self.store.clone(),
                AppendRetry::from(&self.settings),
                code.to_string(),
                message.to_string(),
                reply,
                guard,
            )
            .in_current_span(),
        );
        let stored = persist.await.map_err(|e| {
            tracing::error!(code, error = %e, "turn append task aborted");
            ChatError::storage("append_turn", code, RepositoryError::Query(e.to_string()))
        })??;

        match self.store.count(code).await {
            Ok(turns) => tracing::info!(code, history_len = history.len(), turns, "exchange completed"),
            Err(e) => tracing::warn!(code, error = %e, "exchange completed, turn count unavailable"),
        }
        Ok(stored)
    }

    /// The caller's conversations, newest first.
    pub async fn list_conversations(
        &self,
        identity: &Identity,
    ) -> Result<Vec<Conversation>, ChatError> {
        let owner = self.accounts.resolve(identity).await?;
        self.directory.list_for_account(owner).await
    }

    /// Every turn of one of the caller's conversations, in order.
    ///
    /// A code owned by another account is reported as not found.
    pub async fn get_history(&self, identity: &Identity, code: &str) -> Result<Vec<Turn>, ChatError> {
        let owner = self.accounts.resolve(identity).await?;
        let conversation = self
            .directory
            .resolve(owner, code)
            .await?
            .ok_or(ChatError::NotFound)?;
        self.store.history(&conversation.code).await
    }
}

/// Append attempts and the linear backoff step between them.
#[derive(Debug, Clone, Copy)]
struct AppendRetry {
    attempts: u32,
    backoff: Duration,
}

impl From<&EngineSettings> for AppendRetry {
    fn from(settings: &EngineSettings) -> Self {
        Self {
            attempts: settings.append_retries.max(1),
            backoff: settings.append_backoff,
        }
    }
}

/// Store the user turn, then the provider's reply. The reply is skipped
/// when the user turn could not be stored.
async fn persist_exchange<T: TurnRepository>(
    store: Arc<MessageStore<T>>,
    retry: AppendRetry,
    code: String,
    message: String,
    reply: Message,
    _guard: Option<OwnedMutexGuard<()>>,
) -> Result<Turn, ChatError> {
    append_with_retry(&store, retry, &code, MessageRole::User, &message).await?;
    append_with_retry(&store, retry, &code, reply.role, &reply.content).await
}

async fn append_with_retry<T: TurnRepository>(
    store: &MessageStore<T>,
    retry: AppendRetry,
    code: &str,
    role: MessageRole,
    content: &str,
) -> Result<Turn, ChatError> {
    let mut attempt = 1;
    loop {
        match store.append(code, role, content).await {
            Ok(turn) => return Ok(turn),
            Err(e) if attempt < retry.attempts => {
                tracing::warn!(code, %role, attempt, error = %e, "append failed, retrying");
                tokio::time::sleep(retry.backoff * attempt).await;
                attempt += 1;
            }
            Err(e) => {
                tracing::error!(code, %role, attempts = retry.attempts, error = %e, "append failed, giving up");
                return Err(e);
            }
        }
    }
}
