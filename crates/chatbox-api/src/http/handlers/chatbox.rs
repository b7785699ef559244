//! Conversation handlers.
//!
//! Endpoints:
//! - POST /chatbox        - Send a message, creating the chatbox if needed
//! - GET  /chatbox        - List the caller's chatboxes
//! - GET  /chatbox/{code} - Ordered history of one chatbox

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use chatbox_types::chat::{Conversation, PostMessageOutcome, Turn};

use crate::http::error::AppError;
use crate::http::extractors::auth::AuthenticatedAccount;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Body of `POST /chatbox`.
#[derive(Debug, Deserialize)]
pub struct PostMessageBody {
    #[serde(default)]
    pub chatbox_code: Option<String>,
    #[serde(default)]
    pub message: String,
}

/// POST /chatbox
pub async fn post_message(
    State(state): State<AppState>,
    AuthenticatedAccount(identity): AuthenticatedAccount,
    body: Result<Json<PostMessageBody>, JsonRejection>,
) -> Result<ApiResponse<PostMessageOutcome>, AppError> {
    let Json(body) = body?;
    let code = body.chatbox_code.unwrap_or_default();
    let outcome = state
        .engine
        .post_message(&identity, &code, &body.message)
        .await?;
    Ok(ApiResponse::success(outcome))
}

/// GET /chatbox
pub async fn list_chatboxes(
    State(state): State<AppState>,
    AuthenticatedAccount(identity): AuthenticatedAccount,
) -> Result<ApiResponse<Vec<Conversation>>, AppError> {
    let conversations = state.engine.list_conversations(&identity).await?;
    Ok(ApiResponse::success(conversations))
}

/// GET /chatbox/{code}
pub async fn get_history(
    State(state): State<AppState>,
    AuthenticatedAccount(identity): AuthenticatedAccount,
    Path(code): Path<String>,
) -> Result<ApiResponse<Vec<Turn>>, AppError> {
    let turns = state.engine.get_history(&identity, &code).await?;
    Ok(ApiResponse::success(turns))
}
