//! AccountService: registration, login, token authentication and profile
//! updates.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tokio::task;

use chatbox_types::account::{
    Account, AccountId, AccountType, AccountUpdate, Identity, IssuedToken, LoginRequest,
    NewAccount, RegisterRequest, TokenRecord,
};
use chatbox_types::error::AccountError;
use chatbox_types::job::Job;

use crate::job::JobDispatcher;
use crate::validation;

use super::credentials::CredentialHasher;
use super::repository::AccountRepository;

/// Account operations, generic over storage and hashing.
pub struct AccountService<A: AccountRepository, H: CredentialHasher> {
    repo: A,
    hasher: Arc<H>,
    jobs: Arc<dyn JobDispatcher>,
    token_ttl: Duration,
}

impl<A: AccountRepository, H: CredentialHasher + 'static> AccountService<A, H> {
    pub fn new(repo: A, hasher: H, jobs: Arc<dyn JobDispatcher>, token_ttl: Duration) -> Self {
        Self {
            repo,
            hasher: Arc::new(hasher),
            jobs,
            token_ttl,
        }
    }

    /// Password hashing runs on the blocking pool.
    async fn hash_password(&self, password: String) -> Result<String, AccountError> {
        let hasher = self.hasher.clone();
        task::spawn_blocking(move || hasher.hash_password(&password))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "password hashing task failed");
                AccountError::Hashing
            })?
    }

    async fn verify_password(&self, password: String, hash: String) -> bool {
        let hasher = self.hasher.clone();
        task::spawn_blocking(move || hasher.verify_password(&password, &hash))
            .await
            .unwrap_or_else(|e| {
                tracing::error!(error = %e, "password verification task failed");
                false
            })
    }

    /// Register a new customer account and enqueue the registration job.
    ///
    /// A failed enqueue is logged; the account stays registered.
    pub async fn register(&self, req: RegisterRequest) -> Result<Account, AccountError> {
        validation::validate_registration(&req).map_err(AccountError::Validation)?;

        let email = req.email.trim().to_lowercase();
        let password_hash = self.hash_password(req.password).await?;
        let new_account = NewAccount {
            name: req.name.trim().to_string(),
            email,
            phone_number: req.phone_number.trim().to_string(),
            address: req.address.trim().to_string(),
            password_hash,
            account_type: AccountType::Customer,
        };

        let account = self.repo.create_account(&new_account).await.map_err(|e| {
            match AccountError::from(e) {
                AccountError::Conflict(_) => {
                    AccountError::Conflict("email or phone number is already registered".to_string())
                }
                other => other,
            }
        })?;
        tracing::info!(account_id = %account.id, "account created");

        let job = Job::AccountRegistered {
            account_id: account.id,
            email: account.email.clone(),
            name: account.name.clone(),
        };
        if let Err(e) = self.jobs.dispatch(job) {
            tracing::warn!(account_id = %account.id, error = %e, "failed to enqueue registration job");
        }

        Ok(account)
    }

    /// Verify credentials and issue a bearer token.
    ///
    /// Unknown email and wrong password are indistinguishable to the caller.
    pub async fn login(&self, req: LoginRequest) -> Result<IssuedToken, AccountError> {
        validation::validate_login(&req).map_err(AccountError::Validation)?;

        let email = req.email.trim().to_lowercase();
        let Some((account, password_hash)) = self.repo.find_credentials_by_email(&email).await?
        else {
            tracing::debug!("login for unknown email");
            return Err(AccountError::InvalidCredentials);
        };

        if !self.verify_password(req.password, password_hash).await {
            tracing::debug!(account_id = %account.id, "login with wrong password");
            return Err(AccountError::InvalidCredentials);
        }

        let now = Utc::now();
        match self.repo.delete_expired_tokens(now).await {
            Ok(0) => {}
            Ok(removed) => tracing::debug!(removed, "expired tokens removed"),
            Err(e) => tracing::warn!(error = %e, "failed to remove expired tokens"),
        }

        let token = self.hasher.generate_token();
        let record = TokenRecord {
            token_hash: self.hasher.digest_token(&token),
            account_id: account.id,
            email: account.email.clone(),
            account_type: account.account_type,
            is_premium: account.is_premium_on(now.date_naive()),
            created_at: now,
            expires_at: now + self.token_ttl,
        };
        self.repo.save_token(&record).await?;
        tracing::info!(account_id = %account.id, "token issued");

        Ok(IssuedToken {
            token,
            expires_at: record.expires_at,
        })
    }

    /// Resolve a bearer token to the identity captured at login.
    pub async fn authenticate(&self, token: &str) -> Result<Identity, AccountError> {
        if token.is_empty() {
            return Err(AccountError::InvalidCredentials);
        }

        let digest = self.hasher.digest_token(token);
        let record = self
            .repo
            .find_token(&digest)
            .await?
            .ok_or(AccountError::InvalidCredentials)?;

        if record.is_expired_at(Utc::now()) {
            tracing::debug!(account_id = %record.account_id, "expired token presented");
            return Err(AccountError::InvalidCredentials);
        }

        Ok(record.identity())
    }

    pub async fn get_account(&self, id: AccountId) -> Result<Account, AccountError> {
        self.repo
            .get_account(id)
            .await?
            .ok_or(AccountError::NotFound)
    }

    pub async fn update_profile(
        &self,
        id: AccountId,
        update: AccountUpdate,
    ) -> Result<Account, AccountError> {
        validation::validate_update(&update).map_err(AccountError::Validation)?;

        let update = AccountUpdate {
            name: update.name.map(|v| v.trim().to_string()),
            phone_number: update.phone_number.map(|v| v.trim().to_string()),
            address: update.address.map(|v| v.trim().to_string()),
        };
        let account = self.repo.update_account(id, &update).await?;
        tracing::info!(account_id = %id, "account updated");
        Ok(account)
    }
}
