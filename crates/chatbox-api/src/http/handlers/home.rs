//! Unauthenticated landing and health endpoints.

use axum::Json;
use serde_json::json;

use crate::http::response::ApiResponse;

/// GET / - Welcome payload.
pub async fn welcome() -> ApiResponse<serde_json::Value> {
    ApiResponse::success(json!({
        "name": "chatbox",
        "greeting": "Welcome to chatbox",
    }))
}

/// GET /health - Liveness probe with the running version.
pub async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
