//! SQLite turn repository implementation.
//!
//! Implements `TurnRepository` over `chatbox_messages`. Timestamps are
//! assigned here and clamped so they never decrease within a conversation,
//! even if the wall clock steps backwards.

use chatbox_core::chat::repository::TurnRepository;
use chatbox_types::chat::{MessageRole, NewTurn, Turn};
use chatbox_types::error::RepositoryError;
use chrono::Utc;
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime};

/// SQLite-backed implementation of `TurnRepository`.
#[derive(Clone)]
pub struct SqliteTurnRepository {
    pool: DatabasePool,
}

impl SqliteTurnRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct TurnRow {
    id: i64,
    chatbox_code: String,
    role: String,
    content: String,
    created_at: String,
}

impl TurnRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            chatbox_code: row.try_get("chatbox_code")?,
            role: row.try_get("role")?,
            content: row.try_get("content")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_turn(self) -> Result<Turn, RepositoryError> {
        let role: MessageRole = self
            .role
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;
        Ok(Turn {
            seq: self.id,
            conversation_code: self.chatbox_code,
            role,
            content: self.content,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

impl TurnRepository for SqliteTurnRepository {
    async fn insert_turn(&self, turn: &NewTurn) -> Result<Turn, RepositoryError> {
        let row = sqlx::query(
            r#"INSERT INTO chatbox_messages (chatbox_code, role, content, created_at)
               VALUES (?, ?, ?, MAX(?, COALESCE(
                   (SELECT MAX(created_at) FROM chatbox_messages WHERE chatbox_code = ?), '')))
               RETURNING id, chatbox_code, role, content, created_at"#,
        )
        .bind(&turn.conversation_code)
        .bind(turn.role.to_string())
        .bind(&turn.content)
        .bind(format_datetime(&Utc::now()))
        .bind(&turn.conversation_code)
        .fetch_one(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        TurnRow::from_row(&row)
            .map_err(|e| RepositoryError::Query(e.to_string()))?
            .into_turn()
    }

    async fn list_turns(&self, conversation_code: &str) -> Result<Vec<Turn>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, chatbox_code, role, content, created_at FROM chatbox_messages
             WHERE chatbox_code = ? ORDER BY created_at ASC, id ASC",
        )
        .bind(conversation_code)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut turns = Vec::with_capacity(rows.len());
        for row in &rows {
            let turn_row =
                TurnRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            turns.push(turn_row.into_turn()?);
        }
        Ok(turns)
    }

    async fn count_turns(&self, conversation_code: &str) -> Result<u64, RepositoryError> {
        let row = sqlx::query("SELECT COUNT(*) AS cnt FROM chatbox_messages WHERE chatbox_code = ?")
            .bind(conversation_code)
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let count: i64 = row
            .try_get("cnt")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(count as u64)
    }
}
