//! Message repository

use std::collections::HashMap;

use crate::domain::entities::Message;
use chatrelay_common::Result;
use sqlx::PgPool;

/// Columns read back into [`Message`]; `seq` is storage-only.
const MESSAGE_COLUMNS: &str = "\
    id, session_id, role, content, attachments, \
    sender_ai, created_at";

#[async_trait::async_trait]
pub trait MessageStore: Send + Sync {
    /// Append a message
    async fn create(&self, msg: &Message) -> Result<Message>;

    /// Every message of a session, by `created_at` then insertion order
    async fn list_by_session(&self, session_id: &str) -> Result<Vec<Message>>;

    /// Message counts for the given sessions. Sessions without messages are
    /// absent from the map.
    async fn count_by_sessions(&self, session_ids: &[String]) -> Result<HashMap<String, i64>>;
}

#[derive(Clone)]
pub struct MessageRepository {
    pool: PgPool,
}

impl MessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl MessageStore for MessageRepository {
    async fn create(&self, msg: &Message) -> Result<Message> {
        let query = format!(
            "INSERT INTO messages (id, session_id, role, content, attachments, sender_ai, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {MESSAGE_COLUMNS}"
        );
        let created = sqlx::query_as::<_, Message>(&query)
            .bind(msg.id)
            .bind(&msg.session_id)
            .bind(msg.role)
            .bind(&msg.content)
            .bind(&msg.attachments)
            .bind(&msg.sender_ai)
            .bind(msg.created_at)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    async fn list_by_session(&self, session_id: &str) -> Result<Vec<Message>> {
        let query = format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages \
             WHERE session_id = $1 \
             ORDER BY created_at ASC, seq ASC"
        );
        let messages = sqlx::query_as::<_, Message>(&query)
            .bind(session_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(messages)
    }

    async fn count_by_sessions(&self, session_ids: &[String]) -> Result<HashMap<String, i64>> {
        if session_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, (String, i64)>(
            r#"
            SELECT session_id, COUNT(*)
            FROM messages
            WHERE session_id = ANY($1)
            GROUP BY session_id
            "#,
        )
        .bind(session_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().collect())
    }
}
