//! Conversation listing

use chatrelay_common::{Pagination, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::repository::{ConversationQuery, ConversationsRepositories};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    pub session_id: String,
    pub title: String,
    pub updated_at: DateTime<Utc>,
    pub message_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub has_more: bool,
}

impl PageInfo {
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        Self {
            page,
            limit,
            total,
            has_more: page.saturating_mul(limit) < total,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversationPage {
    pub list: Vec<ConversationSummary>,
    pub pagination: PageInfo,
}

#[derive(Clone)]
pub struct ListingService {
    repos: ConversationsRepositories,
}

impl ListingService {
    pub fn new(repos: ConversationsRepositories) -> Self {
        Self { repos }
    }

    /// One page of non-deleted conversations, most recently updated first,
    /// each with its message count
    pub async fn list_conversations(&self, params: &Pagination) -> Result<ConversationPage> {
        let (page, limit) = (params.page(), params.limit());
        let keyword = params.keyword();

        let query = ConversationQuery {
            keyword: keyword.map(str::to_string),
            offset: params.offset(),
            limit,
        };
        let conversations = self.repos.conversations.search(&query).await?;
        // Separate statement; a turn landing in between can skew `total` against `list`
        let total = self.repos.conversations.count(keyword).await?;

        let session_ids: Vec<String> = conversations
            .iter()
            .map(|c| c.session_id.clone())
            .collect();
        let counts = self.repos.messages.count_by_sessions(&session_ids).await?;

        let list = conversations
            .into_iter()
            .map(|c| ConversationSummary {
                message_count: counts.get(&c.session_id).copied().unwrap_or(0),
                session_id: c.session_id,
                title: c.title,
                updated_at: c.updated_at,
            })
            .collect();

        Ok(ConversationPage {
            list,
            pagination: PageInfo::new(page, limit, total),
        })
    }
}
