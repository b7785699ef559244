//! HTTP/REST API layer for chatbox.
//!
//! Axum router with bearer-token authentication, envelope responses and
//! CORS support.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod response;
pub mod router;
