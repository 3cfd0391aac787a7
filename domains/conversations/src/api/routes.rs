//! Route definitions for Conversations domain API

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{chat, conversations};
use super::middleware::ConversationsState;

/// Create chat routes
fn chat_routes() -> Router<ConversationsState> {
    Router::new().route("/api/gemini3/chat", post(chat::send_turn))
}

/// Create conversation listing and thread routes
fn conversation_routes() -> Router<ConversationsState> {
    Router::new()
        .route("/api/conversations", get(conversations::list_conversations))
        .route(
            "/api/conversations/{session_id}/messages",
            get(conversations::list_messages),
        )
}

/// Create all Conversations domain API routes
pub fn routes() -> Router<ConversationsState> {
    Router::new()
        .merge(chat_routes())
        .merge(conversation_routes())
}
