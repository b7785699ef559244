//! Bearer token authentication extractor.
//!
//! Reads `Authorization: Bearer <token>` and resolves it to an [`Identity`]
//! through the account service. Only the token's digest is ever looked up.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use chatbox_types::account::Identity;

use crate::http::error::AppError;
use crate::state::AppState;

/// The authenticated caller. Extracting this validates the bearer token.
pub struct AuthenticatedAccount(pub Identity);

impl FromRequestParts<AppState> for AuthenticatedAccount {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let identity = state.accounts.authenticate(token).await?;
        Ok(AuthenticatedAccount(identity))
    }
}

/// Extract the bearer token from the `Authorization` header.
fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or_else(|| AppError::Unauthorized("missing bearer token".to_string()))?;

    let value = header
        .to_str()
        .map_err(|_| AppError::Unauthorized("invalid Authorization header encoding".to_string()))?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Unauthorized("missing bearer token".to_string()))
}
