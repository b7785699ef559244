//! Account lifecycle handlers.
//!
//! Endpoints:
//! - POST /register - Create a customer account
//! - POST /login    - Exchange credentials for a bearer token
//! - GET  /account  - The authenticated account
//! - PUT  /account  - Update name, phone number or address

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use chatbox_types::account::{Account, AccountUpdate, LoginRequest, RegisterRequest};

use crate::http::error::AppError;
use crate::http::extractors::auth::AuthenticatedAccount;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Data returned by a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// POST /register
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<ApiResponse<Account>, AppError> {
    let Json(body) = body?;
    let account = state.accounts.register(body).await?;
    Ok(ApiResponse::created(account))
}

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<ApiResponse<LoginResponse>, AppError> {
    let Json(body) = body?;
    let issued = state.accounts.login(body).await?;
    Ok(ApiResponse::success(LoginResponse {
        token: issued.token,
        expires_at: issued.expires_at,
    }))
}

/// GET /account
pub async fn get_account(
    State(state): State<AppState>,
    AuthenticatedAccount(identity): AuthenticatedAccount,
) -> Result<ApiResponse<Account>, AppError> {
    let account = state.accounts.get_account(identity.account_id).await?;
    Ok(ApiResponse::success(account))
}

/// PUT /account
pub async fn update_account(
    State(state): State<AppState>,
    AuthenticatedAccount(identity): AuthenticatedAccount,
    body: Result<Json<AccountUpdate>, JsonRejection>,
) -> Result<ApiResponse<Account>, AppError> {
    let Json(update) = body?;
    let account = state
        .accounts
        .update_profile(identity.account_id, update)
        .await?;
    Ok(ApiResponse::success(account))
}
