//! Application state wiring all services together.
//!
//! Services are generic over repository and hasher traits; AppState pins
//! them to the concrete SQLite and Argon2 implementations.

use std::sync::Arc;

use chatbox_core::account::resolver::AccountResolver;
use chatbox_core::account::service::AccountService;
use chatbox_core::chat::directory::ConversationDirectory;
use chatbox_core::chat::engine::{ConversationEngine, EngineSettings};
use chatbox_core::chat::store::MessageStore;
use chatbox_core::job::JobDispatcher;
use chatbox_core::llm::box_provider::BoxLlmProvider;
use chatbox_core::llm::client::CompletionClient;
use chatbox_infra::crypto::credentials::Argon2CredentialHasher;
use chatbox_infra::sqlite::account::SqliteAccountRepository;
use chatbox_infra::sqlite::conversation::SqliteConversationRepository;
use chatbox_infra::sqlite::pool::DatabasePool;
use chatbox_infra::sqlite::turn::SqliteTurnRepository;
use chatbox_types::account::AccountId;
use chatbox_types::config::AppConfig;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteEngine =
    ConversationEngine<SqliteAccountRepository, SqliteConversationRepository, SqliteTurnRepository>;

pub type ConcreteAccountService = AccountService<SqliteAccountRepository, Argon2CredentialHasher>;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ConcreteEngine>,
    pub accounts: Arc<ConcreteAccountService>,
}

impl AppState {
    /// Wire services over an open pool, a configured provider and a job
    /// dispatcher.
    pub fn new(
        pool: DatabasePool,
        config: &AppConfig,
        provider: BoxLlmProvider,
        jobs: Arc<dyn JobDispatcher>,
    ) -> Self {
        let account_repo = SqliteAccountRepository::new(pool.clone());

        let fallback = config.chat.fallback_account_id.map(AccountId);
        if let Some(id) = fallback {
            tracing::warn!(account_id = %id, "fallback account enabled for unresolved identities");
        }

        let engine = ConversationEngine::new(
            AccountResolver::new(account_repo.clone(), fallback),
            ConversationDirectory::new(SqliteConversationRepository::new(pool.clone())),
            MessageStore::new(SqliteTurnRepository::new(pool)),
            CompletionClient::from_settings(Arc::new(provider), &config.provider),
            EngineSettings::from(&config.chat),
        );

        let accounts = AccountService::new(
            account_repo,
            Argon2CredentialHasher::new(),
            jobs,
            chrono::Duration::hours(config.auth.token_ttl_hours),
        );

        Self {
            engine: Arc::new(engine),
            accounts: Arc::new(accounts),
        }
    }
}
