//! SQLite storage layer.
//!
//! Repository implementations backed by SQLite with WAL mode and split
//! read/write connection pools.

pub mod account;
pub mod conversation;
pub mod pool;
pub mod turn;

use chatbox_types::error::RepositoryError;
use chrono::{DateTime, SecondsFormat, Utc};

/// Fixed-width RFC 3339 (microseconds, `Z`), so text order is time order.
pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.message().contains("UNIQUE"))
}

#[cfg(test)]
pub(crate) mod testing {
    use chatbox_types::account::AccountId;
    use chrono::Utc;

    use super::format_datetime;
    use super::pool::DatabasePool;

    /// A migrated database in a temp dir. Keep the `TempDir` alive for the
    /// duration of the test.
    pub async fn test_pool() -> (tempfile::TempDir, DatabasePool) {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        let pool = DatabasePool::new(&url).await.unwrap();
        (dir, pool)
    }

    /// Insert a bare account row and return its id.
    pub async fn seed_account(pool: &DatabasePool, email: &str) -> AccountId {
        let now = format_datetime(&Utc::now());
        let result = sqlx::query(
            r#"INSERT INTO accounts (name, email, password_hash, phone_number, address, created_at, updated_at)
               VALUES ('Seed', ?, 'x', ?, 'addr', ?, ?)"#,
        )
        .bind(email)
        .bind(email)
        .bind(&now)
        .bind(&now)
        .execute(&pool.writer)
        .await
        .unwrap();
        AccountId(result.last_insert_rowid())
    }
}
