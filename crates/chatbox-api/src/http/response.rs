//! Envelope response format for all API responses.
//!
//! Success:
//! ```json
//! { "message": "Success!", "data": { ... } }
//! ```
//! Failure:
//! ```json
//! { "error": { "code": "...", "message": "...", "details": [ ... ] } }
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

const SUCCESS_MESSAGE: &str = "Success!";

/// Envelope wrapping successful payloads.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub message: &'static str,
    pub data: T,
    #[serde(skip)]
    status: StatusCode,
}

impl<T: Serialize> ApiResponse<T> {
    /// 200 with `data`.
    pub fn success(data: T) -> Self {
        Self {
            message: SUCCESS_MESSAGE,
            data,
            status: StatusCode::OK,
        }
    }

    /// 201 with `data`.
    pub fn created(data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            ..Self::success(data)
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status;
        (status, Json(self)).into_response()
    }
}

/// Envelope wrapping an error.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ApiErrorDetail,
}

/// Individual error detail.
#[derive(Debug, Serialize)]
pub struct ApiErrorDetail {
    /// Machine-readable error code.
    pub code: &'static str,
    /// Human-readable error message.
    pub message: String,
    /// Field-level context, when there is any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: &'static str, message: String, details: Option<serde_json::Value>) -> Self {
        Self {
            error: ApiErrorDetail {
                code,
                message,
                details,
            },
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
