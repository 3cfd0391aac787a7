//! Repository implementations for Conversations domain

pub mod conversations;
#[cfg(any(test, feature = "test-support"))]
pub mod memory;
pub mod messages;

use std::sync::Arc;

use sqlx::PgPool;

pub use conversations::{ConversationQuery, ConversationRepository, ConversationStore};
#[cfg(any(test, feature = "test-support"))]
pub use memory::{InMemoryConversationStore, InMemoryMessageStore};
pub use messages::{MessageRepository, MessageStore};

/// Combined repository access for the Conversations domain
#[derive(Clone)]
pub struct ConversationsRepositories {
    pub conversations: Arc<dyn ConversationStore>,
    pub messages: Arc<dyn MessageStore>,
}

impl ConversationsRepositories {
    pub fn new(pool: PgPool) -> Self {
        Self {
            conversations: Arc::new(ConversationRepository::new(pool.clone())),
            messages: Arc::new(MessageRepository::new(pool)),
        }
    }

    /// Repositories backed by fresh in-memory stores
    #[cfg(any(test, feature = "test-support"))]
    pub fn in_memory() -> Self {
        Self {
            conversations: Arc::new(InMemoryConversationStore::new()),
            messages: Arc::new(InMemoryMessageStore::new()),
        }
    }
}
