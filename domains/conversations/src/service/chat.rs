//! Chat orchestrator
//!
//! One turn: store the user message, ask the completion gateway, store the
//! reply, then upsert the conversation. There is no transaction around the
//! turn; a gateway failure leaves the user message behind on purpose.

use std::sync::Arc;

use chatrelay_common::{Error, Result};
use chatrelay_llm::LlmService;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::entities::{Conversation, Message};
use crate::repository::ConversationsRepositories;

/// Outcome of a successful turn
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnReply {
    pub session_id: String,
    pub message_id: Uuid,
    /// The gateway's sender label, e.g. `gemini3`
    pub role: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct ChatService {
    repos: ConversationsRepositories,
    llm: Arc<dyn LlmService>,
}

impl ChatService {
    pub fn new(repos: ConversationsRepositories, llm: Arc<dyn LlmService>) -> Self {
        Self { repos, llm }
    }

    /// Run one chat turn.
    ///
    /// Attachment IDs are stored verbatim; they are not checked against the
    /// attachment registry.
    pub async fn send_turn(
        &self,
        session_id: &str,
        text: &str,
        attachment_ids: Vec<String>,
    ) -> Result<TurnReply> {
        // Validates both inputs before anything is written
        let user_message = Message::new_user(session_id, text, attachment_ids)?;
        self.repos.messages.create(&user_message).await?;

        let completion = self.llm.complete(text).await.map_err(|e| {
            tracing::error!(
                session_id = %session_id,
                error = %e,
                "Completion gateway failed; user message kept without reply"
            );
            Error::ExternalService(e.to_string())
        })?;

        let sender_label = self.llm.sender_label();
        let reply = Message::new_external_ai(session_id, completion.content, sender_label)?;
        let reply = self.repos.messages.create(&reply).await?;

        let title = Conversation::title_from_message(text);
        self.repos
            .conversations
            .upsert_turn(session_id, &title, Utc::now())
            .await?;

        tracing::info!(
            session_id = %session_id,
            message_id = %reply.id,
            model = %completion.model,
            "Chat turn completed"
        );

        Ok(TurnReply {
            session_id: reply.session_id,
            message_id: reply.id,
            role: sender_label.to_string(),
            content: reply.content,
            created_at: reply.created_at,
        })
    }
}
