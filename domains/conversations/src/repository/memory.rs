//! In-memory conversation and message stores
//!
//! Backs tests and local wiring without PostgreSQL. Thread-safe via `Arc<Mutex<>>`;
//! each operation holds the lock for its whole duration, so an upsert is atomic.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chatrelay_common::{RepositoryError, Result};
use chrono::{DateTime, Utc};

use super::{ConversationQuery, ConversationStore, MessageStore};
use crate::domain::entities::{Conversation, Message};

fn lock<'a, T>(mutex: &'a Mutex<T>, what: &str) -> Result<MutexGuard<'a, T>> {
    mutex
        .lock()
        .map_err(|e| RepositoryError::Unavailable(format!("{what} lock poisoned: {e}")).into())
}

fn title_matches(conv: &Conversation, keyword: Option<&str>) -> bool {
    match keyword {
        Some(keyword) => conv
            .title
            .to_lowercase()
            .contains(&keyword.to_lowercase()),
        None => true,
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryConversationStore {
    rows: Arc<Mutex<HashMap<String, Conversation>>>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored conversations, deleted or not
    pub fn len(&self) -> usize {
        self.rows.lock().map(|rows| rows.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert a conversation as-is, replacing any with the same session ID
    pub fn insert(&self, conv: Conversation) -> Result<()> {
        lock(&self.rows, "conversations")?.insert(conv.session_id.clone(), conv);
        Ok(())
    }
}

#[async_trait::async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn find(&self, session_id: &str) -> Result<Option<Conversation>> {
        Ok(lock(&self.rows, "conversations")?.get(session_id).cloned())
    }

    async fn upsert_turn(
        &self,
        session_id: &str,
        title: &str,
        at: DateTime<Utc>,
    ) -> Result<Conversation> {
        let mut rows = lock(&self.rows, "conversations")?;
        let conv = match rows.get_mut(session_id) {
            Some(existing) => {
                existing.touch(title, at);
                existing.clone()
            }
            None => {
                let mut created = Conversation::new(session_id, at)?;
                created.touch(title, at);
                rows.insert(session_id.to_string(), created.clone());
                created
            }
        };
        Ok(conv)
    }

    async fn search(&self, query: &ConversationQuery) -> Result<Vec<Conversation>> {
        let rows = lock(&self.rows, "conversations")?;
        let mut matching: Vec<&Conversation> = rows
            .values()
            .filter(|c| !c.is_deleted && title_matches(c, query.keyword.as_deref()))
            .collect();
        matching.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then_with(|| a.session_id.cmp(&b.session_id))
        });

        let offset = usize::try_from(query.offset).unwrap_or(0);
        let limit = usize::try_from(query.limit).unwrap_or(0);
        Ok(matching
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn count(&self, keyword: Option<&str>) -> Result<i64> {
        let rows = lock(&self.rows, "conversations")?;
        let count = rows
            .values()
            .filter(|c| !c.is_deleted && title_matches(c, keyword))
            .count();
        Ok(i64::try_from(count).unwrap_or(i64::MAX))
    }
}

/// Messages kept in insertion order, which doubles as the tiebreak
#[derive(Debug, Clone, Default)]
pub struct InMemoryMessageStore {
    rows: Arc<Mutex<Vec<Message>>>,
}

impl InMemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().map(|rows| rows.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait::async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn create(&self, msg: &Message) -> Result<Message> {
        lock(&self.rows, "messages")?.push(msg.clone());
        Ok(msg.clone())
    }

    async fn list_by_session(&self, session_id: &str) -> Result<Vec<Message>> {
        let mut messages: Vec<Message> = lock(&self.rows, "messages")?
            .iter()
            .filter(|m| m.session_id == session_id)
            .cloned()
            .collect();
        // Stable sort keeps insertion order for equal timestamps
        messages.sort_by_key(|m| m.created_at);
        Ok(messages)
    }

    async fn count_by_sessions(&self, session_ids: &[String]) -> Result<HashMap<String, i64>> {
        let rows = lock(&self.rows, "messages")?;
        let mut counts = HashMap::new();
        for msg in rows.iter().filter(|m| session_ids.contains(&m.session_id)) {
            *counts.entry(msg.session_id.clone()).or_insert(0) += 1;
        }
        Ok(counts)
    }
}
