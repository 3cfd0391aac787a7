//! Message thread of one session

use chatrelay_attachments::{AttachmentRef, AttachmentService};
use chatrelay_common::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::entities::MessageRole;
use crate::repository::ConversationsRepositories;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadMessage {
    pub message_id: Uuid,
    pub role: MessageRole,
    pub content: String,
    pub attachments: Vec<AttachmentRef>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct ThreadService {
    repos: ConversationsRepositories,
    attachments: AttachmentService,
}

impl ThreadService {
    pub fn new(repos: ConversationsRepositories, attachments: AttachmentService) -> Self {
        Self { repos, attachments }
    }

    /// Every message of the session in order, with attachment references
    /// resolved. Unknown sessions yield an empty thread.
    pub async fn get_thread(&self, session_id: &str) -> Result<Vec<ThreadMessage>> {
        let messages = self.repos.messages.list_by_session(session_id).await?;

        let raw_ids: Vec<String> = messages
            .iter()
            .flat_map(|m| m.attachments.iter().cloned())
            .collect();
        let resolved = self.attachments.resolve(&raw_ids).await?;

        Ok(messages
            .into_iter()
            .map(|m| ThreadMessage {
                message_id: m.id,
                role: m.role,
                attachments: m
                    .attachments
                    .iter()
                    .filter_map(|raw| resolved.get(raw).cloned())
                    .collect(),
                content: m.content,
                created_at: m.created_at,
            })
            .collect())
    }
}
