//! SQLite conversation repository implementation.
//!
//! Implements `ConversationRepository` from `chatbox-core` over the
//! `chatboxes` table: raw queries, a private Row struct, split pool usage.

use chatbox_core::chat::repository::ConversationRepository;
use chatbox_types::account::AccountId;
use chatbox_types::chat::Conversation;
use chatbox_types::error::RepositoryError;
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, is_unique_violation, parse_datetime};

/// SQLite-backed implementation of `ConversationRepository`.
#[derive(Clone)]
pub struct SqliteConversationRepository {
    pool: DatabasePool,
}

impl SqliteConversationRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct ConversationRow {
    code: String,
    account_id: i64,
    title: String,
    created_at: String,
}

impl ConversationRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            code: row.try_get("code")?,
            account_id: row.try_get("account_id")?,
            title: row.try_get("title")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_conversation(self) -> Result<Conversation, RepositoryError> {
        Ok(Conversation {
            code: self.code,
            owner_account_id: AccountId(self.account_id),
            title: self.title,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

fn map_row(row: &sqlx::sqlite::SqliteRow) -> Result<Conversation, RepositoryError> {
    ConversationRow::from_row(row)
        .map_err(|e| RepositoryError::Query(e.to_string()))?
        .into_conversation()
}

impl ConversationRepository for SqliteConversationRepository {
    async fn find_by_owner_and_code(
        &self,
        owner: AccountId,
        code: &str,
    ) -> Result<Option<Conversation>, RepositoryError> {
        let row = sqlx::query(
            "SELECT code, account_id, title, created_at FROM chatboxes WHERE account_id = ? AND code = ?",
        )
        .bind(owner.0)
        .bind(code)
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        row.as_ref().map(map_row).transpose()
    }

    async fn create_conversation(
        &self,
        conversation: &Conversation,
    ) -> Result<Conversation, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO chatboxes (code, account_id, title, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&conversation.code)
        .bind(conversation.owner_account_id.0)
        .bind(&conversation.title)
        .bind(format_datetime(&conversation.created_at))
        .execute(&self.pool.writer)
        .await;

        match result {
            Ok(_) => Ok(conversation.clone()),
            Err(e) if is_unique_violation(&e) => Err(RepositoryError::Conflict(format!(
                "conversation code '{}' already exists",
                conversation.code
            ))),
            Err(e) => Err(RepositoryError::Query(e.to_string())),
        }
    }

    async fn list_by_owner(
        &self,
        owner: AccountId,
        limit: i64,
    ) -> Result<Vec<Conversation>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT code, account_id, title, created_at FROM chatboxes
             WHERE account_id = ? ORDER BY created_at DESC, rowid DESC LIMIT ?",
        )
        .bind(owner.0)
        .bind(limit)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows.iter().map(map_row).collect()
    }
}
