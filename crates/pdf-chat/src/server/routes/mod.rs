//! API routes

pub mod chat;
pub mod ingest;

use axum::{
    routing::{get, post},
    Router,
};

use crate::server::state::AppState;

/// Build the /api route tree
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/chat", post(chat::handle_message))
        .route("/chat/start", get(chat::chat_start))
        .route("/ingest", post(ingest::ingest_document))
}
