//! AccountRepository trait definition.

use chrono::{DateTime, Utc};

use chatbox_types::account::{Account, AccountId, AccountUpdate, NewAccount, TokenRecord};
use chatbox_types::error::RepositoryError;

/// Persistence for accounts and issued bearer tokens.
///
/// Implementations live in chatbox-infra (e.g., `SqliteAccountRepository`).
pub trait AccountRepository: Send + Sync {
    /// Insert a new account. Returns `RepositoryError::Conflict` when the
    /// email or phone number is already registered.
    fn create_account(
        &self,
        account: &NewAccount,
    ) -> impl std::future::Future<Output = Result<Account, RepositoryError>> + Send;

    fn get_account(
        &self,
        id: AccountId,
    ) -> impl std::future::Future<Output = Result<Option<Account>, RepositoryError>> + Send;

    /// Look up an account by email together with its password hash.
    fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<Option<(Account, String)>, RepositoryError>> + Send;

    /// Apply the set fields of `update`. `RepositoryError::NotFound` when
    /// the account does not exist.
    fn update_account(
        &self,
        id: AccountId,
        update: &AccountUpdate,
    ) -> impl std::future::Future<Output = Result<Account, RepositoryError>> + Send;

    fn save_token(
        &self,
        token: &TokenRecord,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    fn find_token(
        &self,
        token_hash: &str,
    ) -> impl std::future::Future<Output = Result<Option<TokenRecord>, RepositoryError>> + Send;

    /// Remove tokens that expired at or before `now`. Returns how many.
    fn delete_expired_tokens(
        &self,
        now: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
