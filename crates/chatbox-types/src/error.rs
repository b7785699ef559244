use serde::Serialize;
use thiserror::Error;

use crate::llm::LlmError;

/// Errors from repository operations (used by trait definitions in chatbox-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Errors surfaced by the conversation engine.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("validation failed")]
    Validation(Vec<FieldError>),

    #[error("unauthorized")]
    Auth,

    #[error("conversation not found")]
    NotFound,

    #[error("storage error during {operation} ({key}): {source}")]
    Storage {
        operation: &'static str,
        key: String,
        #[source]
        source: RepositoryError,
    },

    #[error(transparent)]
    Provider(#[from] LlmError),
}

impl ChatError {
    pub fn storage(operation: &'static str, key: impl Into<String>, source: RepositoryError) -> Self {
        ChatError::Storage {
            operation,
            key: key.into(),
            source,
        }
    }
}

/// Errors related to account registration, login and profile updates.
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("validation failed")]
    Validation(Vec<FieldError>),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("account not found")]
    NotFound,

    #[error("credential hashing failed")]
    Hashing,

    #[error("storage error: {0}")]
    Storage(String),
}

impl From<RepositoryError> for AccountError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::Conflict(msg) => AccountError::Conflict(msg),
            RepositoryError::NotFound => AccountError::NotFound,
            other => AccountError::Storage(other.to_string()),
        }
    }
}

/// Errors from dispatching background jobs.
#[derive(Debug, Error)]
pub enum JobError {
    #[error("job queue is full")]
    QueueFull,

    #[error("job queue is closed")]
    Closed,

    #[error("job payload error: {0}")]
    Payload(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }

    #[test]
    fn test_storage_error_names_operation_and_key() {
        let err = ChatError::storage("append", "code-1", RepositoryError::Connection);
        let msg = err.to_string();
        assert!(msg.contains("append"));
        assert!(msg.contains("code-1"));
    }

    #[test]
    fn test_provider_error_is_transparent() {
        let err: ChatError = LlmError::EmptyReply.into();
        assert_eq!(err.to_string(), "provider returned no choices");
    }

    #[test]
    fn test_account_error_from_conflict() {
        let err: AccountError = RepositoryError::Conflict("email".to_string()).into();
        assert!(matches!(err, AccountError::Conflict(_)));
        let err: AccountError = RepositoryError::Connection.into();
        assert!(matches!(err, AccountError::Storage(_)));
    }
}
