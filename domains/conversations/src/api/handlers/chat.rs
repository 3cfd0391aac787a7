//! Chat turn API handler

use axum::{extract::State, Json};
use chatrelay_common::{ApiResponse, Result, ValidatedJson};
use serde::Deserialize;
use validator::Validate;

use crate::api::middleware::ConversationsState;
use crate::service::TurnReply;

/// Request for one chat turn
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendTurnRequest {
    #[validate(length(min = 1, message = "sessionId is required"))]
    pub session_id: String,

    #[validate(length(min = 1, message = "message is required"))]
    pub message: String,

    /// Previously uploaded attachment IDs, stored as given
    #[serde(default)]
    pub attachments: Option<Vec<String>>,
}

/// Send a message and wait for the model's reply
pub async fn send_turn(
    State(state): State<ConversationsState>,
    ValidatedJson(req): ValidatedJson<SendTurnRequest>,
) -> Result<Json<ApiResponse<TurnReply>>> {
    let reply = state
        .chat
        .send_turn(
            &req.session_id,
            &req.message,
            req.attachments.unwrap_or_default(),
        )
        .await?;

    Ok(Json(ApiResponse::ok(reply)))
}
