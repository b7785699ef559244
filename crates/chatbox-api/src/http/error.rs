//! Application error type mapping to HTTP status codes and the error envelope.
//!
//! Storage and provider internals are logged here and never returned to
//! the caller.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use chatbox_types::error::{AccountError, ChatError, FieldError};

use crate::http::response::ErrorResponse;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Conversation engine errors.
    Chat(ChatError),
    /// Account and authentication errors.
    Account(AccountError),
    /// Missing or unusable bearer token.
    Unauthorized(String),
    /// Body that could not be decoded as the expected JSON.
    InvalidBody(String),
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Chat(e)
    }
}

impl From<AccountError> for AppError {
    fn from(e: AccountError) -> Self {
        AppError::Account(e)
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::InvalidBody(e.body_text())
    }
}

const INTERNAL_MESSAGE: &str = "internal server error";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match self {
            AppError::Chat(ChatError::Validation(fields))
            | AppError::Account(AccountError::Validation(fields)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "VALIDATION_ERROR",
                "validation failed".to_string(),
                field_details(&fields),
            ),
            AppError::Chat(ChatError::Auth)
            | AppError::Account(AccountError::InvalidCredentials) => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "unauthorized".to_string(),
                None,
            ),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg, None),
            AppError::Chat(ChatError::NotFound) => (
                StatusCode::NOT_FOUND,
                "CHATBOX_NOT_FOUND",
                "chatbox not found".to_string(),
                None,
            ),
            AppError::Account(AccountError::NotFound) => (
                StatusCode::NOT_FOUND,
                "ACCOUNT_NOT_FOUND",
                "account not found".to_string(),
                None,
            ),
            AppError::Account(AccountError::Conflict(msg)) => {
                (StatusCode::CONFLICT, "ACCOUNT_CONFLICT", msg, None)
            }
            AppError::InvalidBody(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_BODY", msg, None)
            }
            AppError::Chat(ChatError::Storage {
                operation,
                key,
                source,
            }) => {
                tracing::error!(operation, key = %key, error = %source, "storage failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    INTERNAL_MESSAGE.to_string(),
                    None,
                )
            }
            AppError::Chat(ChatError::Provider(e)) => {
                tracing::error!(error = %e, "completion provider failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "PROVIDER_ERROR",
                    INTERNAL_MESSAGE.to_string(),
                    None,
                )
            }
            AppError::Account(e) => {
                tracing::error!(error = %e, "account operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    INTERNAL_MESSAGE.to_string(),
                    None,
                )
            }
        };

        (status, ErrorResponse::new(code, message, details)).into_response()
    }
}

fn field_details(fields: &[FieldError]) -> Option<serde_json::Value> {
    serde_json::to_value(fields).ok()
}
