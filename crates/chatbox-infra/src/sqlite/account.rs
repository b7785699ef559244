//! SQLite account and token repository implementation.

use chatbox_core::account::repository::AccountRepository;
use chatbox_types::account::{
    Account, AccountId, AccountType, AccountUpdate, NewAccount, TokenRecord,
};
use chatbox_types::error::RepositoryError;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, is_unique_violation, parse_datetime};

const ACCOUNT_COLUMNS: &str = "id, name, email, password_hash, phone_number, address, account_type, valid_until, created_at, updated_at";

/// SQLite-backed implementation of `AccountRepository`.
#[derive(Clone)]
pub struct SqliteAccountRepository {
    pool: DatabasePool,
}

impl SqliteAccountRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    async fn fetch_by_id(
        &self,
        id: AccountId,
        executor: &sqlx::SqlitePool,
    ) -> Result<Option<(Account, String)>, RepositoryError> {
        let row = sqlx::query(&format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = ?"))
            .bind(id.0)
            .fetch_optional(executor)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        row.as_ref().map(map_account_row).transpose()
    }
}

struct AccountRow {
    id: i64,
    name: String,
    email: String,
    password_hash: String,
    phone_number: String,
    address: String,
    account_type: String,
    valid_until: Option<String>,
    created_at: String,
    updated_at: String,
}

impl AccountRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            phone_number: row.try_get("phone_number")?,
            address: row.try_get("address")?,
            account_type: row.try_get("account_type")?,
            valid_until: row.try_get("valid_until")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    /// Returns the domain account and its password hash.
    fn into_account(self) -> Result<(Account, String), RepositoryError> {
        let account_type: AccountType = self
            .account_type
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;
        let valid_until = self
            .valid_until
            .as_deref()
            .map(|s| {
                NaiveDate::parse_from_str(s, "%Y-%m-%d")
                    .map_err(|e| RepositoryError::Query(format!("invalid valid_until: {e}")))
            })
            .transpose()?;

        let account = Account {
            id: AccountId(self.id),
            name: self.name,
            email: self.email,
            phone_number: self.phone_number,
            address: self.address,
            account_type,
            valid_until,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        };
        Ok((account, self.password_hash))
    }
}

fn map_account_row(row: &sqlx::sqlite::SqliteRow) -> Result<(Account, String), RepositoryError> {
    AccountRow::from_row(row)
        .map_err(|e| RepositoryError::Query(e.to_string()))?
        .into_account()
}

struct TokenRow {
    token_hash: String,
    account_id: i64,
    email: String,
    account_type: String,
    is_premium: bool,
    created_at: String,
    expires_at: String,
}

impl TokenRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            token_hash: row.try_get("token_hash")?,
            account_id: row.try_get("account_id")?,
            email: row.try_get("email")?,
            account_type: row.try_get("account_type")?,
            is_premium: row.try_get("is_premium")?,
            created_at: row.try_get("created_at")?,
            expires_at: row.try_get("expires_at")?,
        })
    }

    fn into_record(self) -> Result<TokenRecord, RepositoryError> {
        Ok(TokenRecord {
            token_hash: self.token_hash,
            account_id: AccountId(self.account_id),
            email: self.email,
            account_type: self
                .account_type
                .parse()
                .map_err(|e: String| RepositoryError::Query(e))?,
            is_premium: self.is_premium,
            created_at: parse_datetime(&self.created_at)?,
            expires_at: parse_datetime(&self.expires_at)?,
        })
    }
}

impl AccountRepository for SqliteAccountRepository {
    async fn create_account(&self, account: &NewAccount) -> Result<Account, RepositoryError> {
        let now = format_datetime(&Utc::now());
        let result = sqlx::query(
            r#"INSERT INTO accounts (name, email, password_hash, phone_number, address, account_type, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&account.name)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(&account.phone_number)
        .bind(&account.address)
        .bind(account.account_type.to_string())
        .bind(&now)
        .bind(&now)
        .execute(&self.pool.writer)
        .await;

        let id = match result {
            Ok(done) => AccountId(done.last_insert_rowid()),
            Err(e) if is_unique_violation(&e) => {
                return Err(RepositoryError::Conflict(
                    "email or phone number already registered".to_string(),
                ));
            }
            Err(e) => return Err(RepositoryError::Query(e.to_string())),
        };

        self.fetch_by_id(id, &self.pool.writer)
            .await?
            .map(|(account, _)| account)
            .ok_or(RepositoryError::NotFound)
    }

    async fn get_account(&self, id: AccountId) -> Result<Option<Account>, RepositoryError> {
        Ok(self
            .fetch_by_id(id, &self.pool.reader)
            .await?
            .map(|(account, _)| account))
    }

    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<(Account, String)>, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = ?"
        ))
        .bind(email)
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        row.as_ref().map(map_account_row).transpose()
    }

    async fn update_account(
        &self,
        id: AccountId,
        update: &AccountUpdate,
    ) -> Result<Account, RepositoryError> {
        let result = sqlx::query(
            r#"UPDATE accounts SET
                   name = COALESCE(?, name),
                   phone_number = COALESCE(?, phone_number),
                   address = COALESCE(?, address),
                   updated_at = ?
               WHERE id = ?"#,
        )
        .bind(&update.name)
        .bind(&update.phone_number)
        .bind(&update.address)
        .bind(format_datetime(&Utc::now()))
        .bind(id.0)
        .execute(&self.pool.writer)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                RepositoryError::Conflict("phone number already registered".to_string())
            } else {
                RepositoryError::Query(e.to_string())
            }
        })?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        self.fetch_by_id(id, &self.pool.writer)
            .await?
            .map(|(account, _)| account)
            .ok_or(RepositoryError::NotFound)
    }

    async fn save_token(&self, token: &TokenRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"INSERT INTO auth_tokens (token_hash, account_id, email, account_type, is_premium, created_at, expires_at)
               VALUES (?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&token.token_hash)
        .bind(token.account_id.0)
        .bind(&token.email)
        .bind(token.account_type.to_string())
        .bind(token.is_premium)
        .bind(format_datetime(&token.created_at))
        .bind(format_datetime(&token.expires_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn find_token(&self, token_hash: &str) -> Result<Option<TokenRecord>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM auth_tokens WHERE token_hash = ?")
            .bind(token_hash)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let token_row =
                    TokenRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(token_row.into_record()?))
            }
            None => Ok(None),
        }
    }

    async fn delete_expired_tokens(&self, now: DateTime<Utc>) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM auth_tokens WHERE expires_at <= ?")
            .bind(format_datetime(&now))
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(result.rows_affected())
    }
}
