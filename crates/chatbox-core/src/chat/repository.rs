//! Conversation and turn repository traits.
//!
//! Follows the RPITIT pattern used by every repository port in this crate.
//! Implementations live in chatbox-infra (e.g., `SqliteConversationRepository`).

use chatbox_types::account::AccountId;
use chatbox_types::chat::{Conversation, NewTurn, Turn};
use chatbox_types::error::RepositoryError;

/// Persistence for conversation records.
///
/// `code` is globally unique; every lookup is scoped by owner so a code
/// belonging to another account behaves exactly like an unknown code.
pub trait ConversationRepository: Send + Sync {
    /// Find a conversation by owner and code.
    fn find_by_owner_and_code(
        &self,
        owner: AccountId,
        code: &str,
    ) -> impl std::future::Future<Output = Result<Option<Conversation>, RepositoryError>> + Send;

    /// Insert a new conversation. Returns `RepositoryError::Conflict` when
    /// the code is already taken.
    fn create_conversation(
        &self,
        conversation: &Conversation,
    ) -> impl std::future::Future<Output = Result<Conversation, RepositoryError>> + Send;

    /// List an owner's conversations, newest first, at most `limit`.
    fn list_by_owner(
        &self,
        owner: AccountId,
        limit: i64,
    ) -> impl std::future::Future<Output = Result<Vec<Conversation>, RepositoryError>> + Send;
}

/// Append-only persistence for turns.
pub trait TurnRepository: Send + Sync {
    /// Durably append one turn and return it with its assigned sequence
    /// and timestamp.
    fn insert_turn(
        &self,
        turn: &NewTurn,
    ) -> impl std::future::Future<Output = Result<Turn, RepositoryError>> + Send;

    /// All turns of a conversation ordered by `(created_at, seq)` ascending.
    fn list_turns(
        &self,
        conversation_code: &str,
    ) -> impl std::future::Future<Output = Result<Vec<Turn>, RepositoryError>> + Send;

    /// Number of turns stored for a conversation.
    fn count_turns(
        &self,
        conversation_code: &str,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
