//! Axum router configuration with middleware.
//!
//! Middleware: CORS, request tracing.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::home::welcome))
        .route("/health", get(handlers::home::health_check))
        // Accounts
        .route("/register", post(handlers::account::register))
        .route("/login", post(handlers::account::login))
        .route(
            "/account",
            get(handlers::account::get_account).put(handlers::account::update_account),
        )
        // Chatboxes
        .route(
            "/chatbox",
            get(handlers::chatbox::list_chatboxes).post(handlers::chatbox::post_message),
        )
        .route("/chatbox/{code}", get(handlers::chatbox::get_history))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
