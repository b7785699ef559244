//! Database pool with split reader/writer connections in WAL mode.
//!
//! SQLite allows only one writer at a time. `DatabasePool` pairs a
//! multi-connection reader pool for concurrent reads with a single-connection
//! writer pool for serialized writes. Both use WAL journal mode and enforce
//! foreign keys.

use std::path::PathBuf;
use std::str::FromStr;

use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

/// Split read/write pool for SQLite with WAL mode.
///
/// - `reader`: Multi-connection pool (up to 8) for concurrent SELECT queries.
/// - `writer`: Single-connection pool for serialized INSERT/UPDATE/DELETE.
#[derive(Clone)]
pub struct DatabasePool {
    pub reader: SqlitePool,
    pub writer: SqlitePool,
}

impl DatabasePool {
    /// Open both pools, running pending migrations on the writer first.
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        let base_opts = SqliteConnectOptions::from_str(database_url)?
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .busy_timeout(std::time::Duration::from_secs(5))
            .create_if_missing(true);

        let read_opts = base_opts.clone().read_only(true);
        let write_opts = base_opts;

        let writer = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(write_opts)
            .await?;

        // Readers open read-only, so the schema must exist first.
        sqlx::migrate!("../../migrations").run(&writer).await?;

        let reader = SqlitePoolOptions::new()
            .max_connections(8)
            .connect_with(read_opts)
            .await?;

        tracing::debug!(url = %redact_url(database_url), "database pool ready");
        Ok(Self { reader, writer })
    }

    /// Applied migrations as `(version, description)`, oldest first.
    pub async fn applied_migrations(&self) -> Result<Vec<(i64, String)>, sqlx::Error> {
        let rows = sqlx::query(
            "SELECT version, description FROM _sqlx_migrations WHERE success = 1 ORDER BY version",
        )
        .fetch_all(&self.reader)
        .await?;

        rows.iter()
            .map(|row| Ok((row.try_get("version")?, row.try_get("description")?)))
            .collect()
    }

    pub async fn close(&self) {
        self.reader.close().await;
        self.writer.close().await;
    }
}

/// Data directory: `CHATBOX_DATA_DIR`, else `~/.chatbox`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("CHATBOX_DATA_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".chatbox")
}

/// `sqlite://<data_dir>/chatbox.db?mode=rwc`.
pub fn default_database_url() -> String {
    let db_path = resolve_data_dir().join("chatbox.db");
    format!("sqlite://{}?mode=rwc", db_path.display())
}

/// Strip query parameters before logging a URL.
fn redact_url(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}
