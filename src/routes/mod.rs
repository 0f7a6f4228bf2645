//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the HTTP surface the UI collaborator consumes: the
//! session lifecycle, the chat loop, and the pipeline endpoints. Handlers
//! translate wire shapes and status codes; all pipeline behavior lives in
//! the service modules.

pub mod chat;
pub mod error;
pub mod pipeline;

use axum::Router;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router with CORS and request tracing.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/session/start", post(chat::start_session))
        .route("/api/session/reset", post(chat::reset_session))
        .route("/api/chat", post(chat::chat))
        .route("/api/mood", post(pipeline::detect_mood))
        .route("/api/generate-image", post(pipeline::generate_image))
        .route("/api/feed", post(pipeline::generate_feed))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "status": "ok",
        "service": "moodfeed",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
