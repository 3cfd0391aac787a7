//! Conversation listing and thread API handlers

use axum::{extract::State, Json};
use chatrelay_common::{ApiPath, ApiQuery, ApiResponse, Pagination, Result};

use crate::api::middleware::ConversationsState;
use crate::service::{ConversationPage, ThreadMessage};

/// List conversations, optionally filtered by title keyword
pub async fn list_conversations(
    State(state): State<ConversationsState>,
    ApiQuery(params): ApiQuery<Pagination>,
) -> Result<Json<ApiResponse<ConversationPage>>> {
    let page = state.listing.list_conversations(&params).await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// List every message of a session
pub async fn list_messages(
    State(state): State<ConversationsState>,
    ApiPath(session_id): ApiPath<String>,
) -> Result<Json<ApiResponse<Vec<ThreadMessage>>>> {
    let thread = state.thread.get_thread(&session_id).await?;
    Ok(Json(ApiResponse::ok(thread)))
}
