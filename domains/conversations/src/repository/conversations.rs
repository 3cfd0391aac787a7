//! Conversation repository

use crate::domain::entities::Conversation;
use chatrelay_common::{db::like_pattern, Result};
use chrono::{DateTime, Utc};
use sqlx::PgPool;

/// All columns in the conversations table, used for SELECT and RETURNING clauses.
const CONVERSATION_COLUMNS: &str = "\
    session_id, user_id, title, is_deleted, \
    created_at, updated_at";

/// Filter and window for a conversation listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationQuery {
    /// Case-insensitive title substring; `None` matches everything
    pub keyword: Option<String>,
    pub offset: i64,
    pub limit: i64,
}

#[async_trait::async_trait]
pub trait ConversationStore: Send + Sync {
    /// Find conversation by session ID
    async fn find(&self, session_id: &str) -> Result<Option<Conversation>>;

    /// Create the conversation if absent, otherwise overwrite its title and
    /// refresh `updated_at`. A single atomic statement.
    async fn upsert_turn(
        &self,
        session_id: &str,
        title: &str,
        at: DateTime<Utc>,
    ) -> Result<Conversation>;

    /// Non-deleted conversations matching the query, most recent first
    async fn search(&self, query: &ConversationQuery) -> Result<Vec<Conversation>>;

    /// Number of non-deleted conversations matching the keyword
    async fn count(&self, keyword: Option<&str>) -> Result<i64>;
}

#[derive(Clone)]
pub struct ConversationRepository {
    pool: PgPool,
}

impl ConversationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ConversationStore for ConversationRepository {
    async fn find(&self, session_id: &str) -> Result<Option<Conversation>> {
        let query =
            format!("SELECT {CONVERSATION_COLUMNS} FROM conversations WHERE session_id = $1");
        let conv = sqlx::query_as::<_, Conversation>(&query)
            .bind(session_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(conv)
    }

    async fn upsert_turn(
        &self,
        session_id: &str,
        title: &str,
        at: DateTime<Utc>,
    ) -> Result<Conversation> {
        let query = format!(
            "INSERT INTO conversations (session_id, title, is_deleted, created_at, updated_at) \
             VALUES ($1, $2, FALSE, $3, $3) \
             ON CONFLICT (session_id) DO UPDATE \
             SET title = EXCLUDED.title, updated_at = EXCLUDED.updated_at \
             RETURNING {CONVERSATION_COLUMNS}"
        );
        let conv = sqlx::query_as::<_, Conversation>(&query)
            .bind(session_id)
            .bind(title)
            .bind(at)
            .fetch_one(&self.pool)
            .await?;

        Ok(conv)
    }

    async fn search(&self, query: &ConversationQuery) -> Result<Vec<Conversation>> {
        let convs = match query.keyword.as_deref() {
            Some(keyword) => {
                let sql = format!(
                    "SELECT {CONVERSATION_COLUMNS} FROM conversations \
                     WHERE is_deleted = FALSE AND title ILIKE $1 ESCAPE '\\' \
                     ORDER BY updated_at DESC, session_id ASC \
                     OFFSET $2 LIMIT $3"
                );
                sqlx::query_as::<_, Conversation>(&sql)
                    .bind(like_pattern(keyword))
                    .bind(query.offset)
                    .bind(query.limit)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!(
                    "SELECT {CONVERSATION_COLUMNS} FROM conversations \
                     WHERE is_deleted = FALSE \
                     ORDER BY updated_at DESC, session_id ASC \
                     OFFSET $1 LIMIT $2"
                );
                sqlx::query_as::<_, Conversation>(&sql)
                    .bind(query.offset)
                    .bind(query.limit)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(convs)
    }

    async fn count(&self, keyword: Option<&str>) -> Result<i64> {
        let count = match keyword {
            Some(keyword) => {
                sqlx::query_scalar::<_, i64>(
                    r#"
                    SELECT COUNT(*) FROM conversations
                    WHERE is_deleted = FALSE AND title ILIKE $1 ESCAPE '\'
                    "#,
                )
                .bind(like_pattern(keyword))
                .fetch_one(&self.pool)
                .await?
            }
            None => {
                sqlx::query_scalar::<_, i64>(
                    "SELECT COUNT(*) FROM conversations WHERE is_deleted = FALSE",
                )
                .fetch_one(&self.pool)
                .await?
            }
        };

        Ok(count)
    }
}
