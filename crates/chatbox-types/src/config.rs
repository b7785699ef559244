//! Configuration types for chatbox.
//!
//! `AppConfig` represents the top-level `chatbox.toml`. Every field has a
//! default so an empty or missing file yields a runnable configuration.

use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Address the HTTP server binds to.
    #[serde(default = "default_listen_address")]
    pub listen_address: String,

    /// sqlx SQLite URL. When absent the data-directory default is used.
    #[serde(default)]
    pub database_url: Option<String>,

    #[serde(default)]
    pub provider: ProviderSettings,

    #[serde(default)]
    pub chat: ChatSettings,

    #[serde(default)]
    pub auth: AuthSettings,

    #[serde(default)]
    pub jobs: JobSettings,
}

fn default_listen_address() -> String {
    "0.0.0.0:8080".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_address: default_listen_address(),
            database_url: None,
            provider: ProviderSettings::default(),
            chat: ChatSettings::default(),
            auth: AuthSettings::default(),
            jobs: JobSettings::default(),
        }
    }
}

/// Completion provider settings (OpenAI-compatible chat completions).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    #[serde(default = "default_provider_name")]
    pub name: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// API key. Environment variables take precedence when set.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub temperature: Option<f64>,
}

fn default_provider_name() -> String {
    "openai".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            name: default_provider_name(),
            base_url: default_base_url(),
            model: default_model(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            max_tokens: None,
            temperature: None,
        }
    }
}

/// Conversation engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSettings {
    /// Fixed leading system instruction, re-synthesized on every prompt.
    #[serde(default = "default_system_instruction")]
    pub system_instruction: String,
    /// Account substituted when an authenticated identity no longer resolves.
    /// Unset means such callers are rejected as unauthorized.
    #[serde(default)]
    pub fallback_account_id: Option<i64>,
    /// Attempts per turn append after a successful provider call.
    #[serde(default = "default_append_retries")]
    pub append_retries: u32,
    #[serde(default = "default_append_retry_backoff_ms")]
    pub append_retry_backoff_ms: u64,
    /// Hold a per-conversation lock from history read to the final append.
    #[serde(default = "default_true")]
    pub serialize_per_conversation: bool,
}

fn default_system_instruction() -> String {
    "From now you are Primbon Ajaib!".to_string()
}

fn default_append_retries() -> u32 {
    3
}

fn default_append_retry_backoff_ms() -> u64 {
    100
}

fn default_true() -> bool {
    true
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            system_instruction: default_system_instruction(),
            fallback_account_id: None,
            append_retries: default_append_retries(),
            append_retry_backoff_ms: default_append_retry_backoff_ms(),
            serialize_per_conversation: true,
        }
    }
}

/// Bearer-token settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSettings {
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,
}

fn default_token_ttl_hours() -> i64 {
    7 * 24
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            token_ttl_hours: default_token_ttl_hours(),
        }
    }
}

/// In-process job queue settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSettings {
    #[serde(default = "default_workers")]
    pub workers: usize,
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    #[serde(default = "default_max_execution_secs")]
    pub max_execution_secs: u64,
    #[serde(default = "default_max_retry")]
    pub max_retry: u32,
}

fn default_workers() -> usize {
    4
}

fn default_queue_capacity() -> usize {
    256
}

fn default_max_execution_secs() -> u64 {
    180
}

fn default_max_retry() -> u32 {
    10
}

impl Default for JobSettings {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            queue_capacity: default_queue_capacity(),
            max_execution_secs: default_max_execution_secs(),
            max_retry: default_max_retry(),
        }
    }
}
