//! Domain entities for Conversations domain
//!
//! A conversation is keyed by the client-chosen session id and is only ever
//! created or refreshed by the upsert at the end of a chat turn. Messages
//! refer to their session by value; nothing enforces that the conversation
//! exists.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use chatrelay_common::{Error, Result};

/// Title of a conversation before any turn has named it
pub const DEFAULT_TITLE: &str = "New Conversation";

/// Number of characters of the user text used as title
pub const TITLE_LENGTH: usize = 30;

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "message_role")]
pub enum MessageRole {
    #[sqlx(rename = "user")]
    #[serde(rename = "user")]
    User,
    #[sqlx(rename = "assistant")]
    #[serde(rename = "assistant")]
    Assistant,
    /// Replies from the external model
    #[sqlx(rename = "external-ai")]
    #[serde(rename = "external-ai")]
    ExternalAi,
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
            MessageRole::ExternalAi => write!(f, "external-ai"),
        }
    }
}

/// Conversation entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Conversation {
    pub session_id: String,
    /// Owner tag, never read by any operation
    pub user_id: Option<String>,
    pub title: String,
    /// Soft-delete marker; no operation sets it
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Create a new conversation with the placeholder title
    pub fn new(session_id: impl Into<String>, at: DateTime<Utc>) -> Result<Self> {
        let session_id = session_id.into();
        validate_session_id(&session_id)?;

        Ok(Conversation {
            session_id,
            user_id: None,
            title: DEFAULT_TITLE.to_string(),
            is_deleted: false,
            created_at: at,
            updated_at: at,
        })
    }

    /// Title derived from a user message: its first 30 characters
    pub fn title_from_message(text: &str) -> String {
        text.chars().take(TITLE_LENGTH).collect()
    }

    /// Apply a turn: refresh `updated_at` and overwrite the title
    pub fn touch(&mut self, title: impl Into<String>, at: DateTime<Utc>) {
        self.title = title.into();
        self.updated_at = at;
    }
}

/// Message entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Message {
    pub id: Uuid,
    pub session_id: String,
    pub role: MessageRole,
    pub content: String,
    /// Attachment ids exactly as the client sent them
    pub attachments: Vec<String>,
    /// Model variant label, set only on model-authored messages
    pub sender_ai: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Create a new user message
    pub fn new_user(
        session_id: impl Into<String>,
        content: impl Into<String>,
        attachments: Vec<String>,
    ) -> Result<Self> {
        let session_id = session_id.into();
        let content = content.into();
        validate_session_id(&session_id)?;
        Self::validate_content(&content)?;

        Ok(Message {
            id: Uuid::new_v4(),
            session_id,
            role: MessageRole::User,
            content,
            attachments,
            sender_ai: None,
            created_at: Utc::now(),
        })
    }

    /// Create a new reply message authored by the external model
    pub fn new_external_ai(
        session_id: impl Into<String>,
        content: impl Into<String>,
        sender_ai: impl Into<String>,
    ) -> Result<Self> {
        let session_id = session_id.into();
        let content = content.into();
        validate_session_id(&session_id)?;
        Self::validate_content(&content)?;

        Ok(Message {
            id: Uuid::new_v4(),
            session_id,
            role: MessageRole::ExternalAi,
            content,
            attachments: Vec::new(),
            sender_ai: Some(sender_ai.into()),
            created_at: Utc::now(),
        })
    }

    /// Validate message content
    fn validate_content(content: &str) -> Result<()> {
        if content.trim().is_empty() {
            return Err(Error::Validation("message is required".to_string()));
        }
        Ok(())
    }
}

fn validate_session_id(session_id: &str) -> Result<()> {
    if session_id.trim().is_empty() {
        return Err(Error::Validation("sessionId is required".to_string()));
    }
    Ok(())
}
