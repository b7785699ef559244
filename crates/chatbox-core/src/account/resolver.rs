//! AccountResolver: map an authenticated identity to an owning account.

use chatbox_types::account::{AccountId, Identity};
use chatbox_types::error::ChatError;

use super::repository::AccountRepository;

/// Confirms that the caller's account still exists.
///
/// With a fallback configured, a missing account resolves to the fallback
/// (logged); otherwise the caller is rejected with `ChatError::Auth`.
pub struct AccountResolver<A: AccountRepository> {
    repo: A,
    fallback: Option<AccountId>,
}

impl<A: AccountRepository> AccountResolver<A> {
    pub fn new(repo: A, fallback: Option<AccountId>) -> Self {
        Self { repo, fallback }
    }

    pub async fn resolve(&self, identity: &Identity) -> Result<AccountId, ChatError> {
        let account = self
            .repo
            .get_account(identity.account_id)
            .await
            .map_err(|e| ChatError::storage("resolve_account", identity.account_id.to_string(), e))?;

        match (account, self.fallback) {
            (Some(account), _) => Ok(account.id),
            (None, Some(fallback)) => {
                tracing::warn!(
                    account_id = %identity.account_id,
                    fallback = %fallback,
                    "authenticated account no longer exists, using fallback account"
                );
                Ok(fallback)
            }
            (None, None) => {
                tracing::warn!(account_id = %identity.account_id, "authenticated account no longer exists");
                Err(ChatError::Auth)
            }
        }
    }
}
