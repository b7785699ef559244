//! In-memory repositories for engine tests.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;

use chatbox_types::account::{Account, AccountId, AccountType, AccountUpdate, NewAccount, TokenRecord};
use chatbox_types::chat::{Conversation, MessageRole, NewTurn, Turn};
use chatbox_types::error::RepositoryError;

use crate::account::repository::AccountRepository;

use super::repository::{ConversationRepository, TurnRepository};

#[derive(Default)]
struct State {
    conversations: Vec<Conversation>,
    turns: Vec<Turn>,
    next_seq: i64,
}

/// Shared in-memory conversation and turn storage.
///
/// Clones share state, so a test can keep a handle for inspection while the
/// engine owns another.
#[derive(Clone, Default)]
pub struct MemoryChatRepository {
    state: Arc<Mutex<State>>,
    failing_inserts: Arc<AtomicU32>,
    failing_creates: Arc<AtomicU32>,
    assistant_delay_ms: Arc<AtomicU64>,
}

impl MemoryChatRepository {
    /// Make the next `n` turn inserts fail with a query error.
    pub fn fail_next_inserts(&self, n: u32) {
        self.failing_inserts.store(n, Ordering::SeqCst);
    }

    /// Make the next `n` conversation creates fail with a query error.
    pub fn fail_next_creates(&self, n: u32) {
        self.failing_creates.store(n, Ordering::SeqCst);
    }

    /// Delay every assistant turn insert by `delay`.
    pub fn delay_assistant_inserts(&self, delay: Duration) {
        self.assistant_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn conversation_count(&self) -> usize {
        self.state.lock().unwrap().conversations.len()
    }

    pub fn turn_count(&self) -> usize {
        self.state.lock().unwrap().turns.len()
    }

    fn take_failure(counter: &AtomicU32) -> bool {
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

impl ConversationRepository for MemoryChatRepository {
    async fn find_by_owner_and_code(
        &self,
        owner: AccountId,
        code: &str,
    ) -> Result<Option<Conversation>, RepositoryError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .conversations
            .iter()
            .find(|c| c.owner_account_id == owner && c.code == code)
            .cloned())
    }

    async fn create_conversation(
        &self,
        conversation: &Conversation,
    ) -> Result<Conversation, RepositoryError> {
        if Self::take_failure(&self.failing_creates) {
            return Err(RepositoryError::Query("injected create failure".to_string()));
        }
        let mut state = self.state.lock().unwrap();
        if state.conversations.iter().any(|c| c.code == conversation.code) {
            return Err(RepositoryError::Conflict(conversation.code.clone()));
        }
        state.conversations.push(conversation.clone());
        Ok(conversation.clone())
    }

    async fn list_by_owner(
        &self,
        owner: AccountId,
        limit: i64,
    ) -> Result<Vec<Conversation>, RepositoryError> {
        let state = self.state.lock().unwrap();
        let mut list: Vec<_> = state
            .conversations
            .iter()
            .filter(|c| c.owner_account_id == owner)
            .cloned()
            .collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        list.truncate(limit.max(0) as usize);
        Ok(list)
    }
}

impl TurnRepository for MemoryChatRepository {
    async fn insert_turn(&self, turn: &NewTurn) -> Result<Turn, RepositoryError> {
        if Self::take_failure(&self.failing_inserts) {
            return Err(RepositoryError::Query("injected insert failure".to_string()));
        }
        let delay_ms = self.assistant_delay_ms.load(Ordering::SeqCst);
        if turn.role == MessageRole::Assistant && delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }
        let mut state = self.state.lock().unwrap();
        state.next_seq += 1;
        let stored = Turn {
            seq: state.next_seq,
            conversation_code: turn.conversation_code.clone(),
            role: turn.role,
            content: turn.content.clone(),
            created_at: Utc::now(),
        };
        state.turns.push(stored.clone());
        Ok(stored)
    }

    async fn list_turns(&self, conversation_code: &str) -> Result<Vec<Turn>, RepositoryError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .turns
            .iter()
            .filter(|t| t.conversation_code == conversation_code)
            .cloned()
            .collect())
    }

    async fn count_turns(&self, conversation_code: &str) -> Result<u64, RepositoryError> {
        Ok(self.list_turns(conversation_code).await?.len() as u64)
    }
}

#[derive(Default)]
struct AccountState {
    accounts: Vec<(Account, String)>,
    tokens: Vec<TokenRecord>,
}

/// In-memory account storage.
#[derive(Clone, Default)]
pub struct MemoryAccountRepository {
    state: Arc<Mutex<AccountState>>,
}

impl MemoryAccountRepository {
    /// Seed an account with a fixed id.
    pub fn with_account(id: i64, email: &str) -> Self {
        let repo = Self::default();
        repo.state.lock().unwrap().accounts.push((
            Account {
                id: AccountId(id),
                name: "Test".to_string(),
                email: email.to_string(),
                phone_number: "0800".to_string(),
                address: "Somewhere".to_string(),
                account_type: AccountType::Customer,
                valid_until: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            String::new(),
        ));
        repo
    }

    pub fn token_count(&self) -> usize {
        self.state.lock().unwrap().tokens.len()
    }
}

impl AccountRepository for MemoryAccountRepository {
    async fn create_account(&self, account: &NewAccount) -> Result<Account, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        if state
            .accounts
            .iter()
            .any(|(a, _)| a.email == account.email || a.phone_number == account.phone_number)
        {
            return Err(RepositoryError::Conflict(account.email.clone()));
        }
        let id = state.accounts.iter().map(|(a, _)| a.id.0).max().unwrap_or(0) + 1;
        let now = Utc::now();
        let created = Account {
            id: AccountId(id),
            name: account.name.clone(),
            email: account.email.clone(),
            phone_number: account.phone_number.clone(),
            address: account.address.clone(),
            account_type: account.account_type,
            valid_until: None,
            created_at: now,
            updated_at: now,
        };
        state
            .accounts
            .push((created.clone(), account.password_hash.clone()));
        Ok(created)
    }

    async fn get_account(&self, id: AccountId) -> Result<Option<Account>, RepositoryError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .accounts
            .iter()
            .find(|(a, _)| a.id == id)
            .map(|(a, _)| a.clone()))
    }

    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<(Account, String)>, RepositoryError> {
        let state = self.state.lock().unwrap();
        Ok(state.accounts.iter().find(|(a, _)| a.email == email).cloned())
    }

    async fn update_account(
        &self,
        id: AccountId,
        update: &AccountUpdate,
    ) -> Result<Account, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        let (account, _) = state
            .accounts
            .iter_mut()
            .find(|(a, _)| a.id == id)
            .ok_or(RepositoryError::NotFound)?;
        if let Some(name) = &update.name {
            account.name = name.clone();
        }
        if let Some(phone) = &update.phone_number {
            account.phone_number = phone.clone();
        }
        if let Some(address) = &update.address {
            account.address = address.clone();
        }
        account.updated_at = Utc::now();
        Ok(account.clone())
    }

    async fn save_token(&self, token: &TokenRecord) -> Result<(), RepositoryError> {
        self.state.lock().unwrap().tokens.push(token.clone());
        Ok(())
    }

    async fn find_token(&self, token_hash: &str) -> Result<Option<TokenRecord>, RepositoryError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .tokens
            .iter()
            .find(|t| t.token_hash == token_hash)
            .cloned())
    }

    async fn delete_expired_tokens(
        &self,
        now: chrono::DateTime<Utc>,
    ) -> Result<u64, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        let before = state.tokens.len();
        state.tokens.retain(|t| !t.is_expired_at(now));
        Ok((before - state.tokens.len()) as u64)
    }
}
