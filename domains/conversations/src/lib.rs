//! Conversations domain: chat turns, message threads, conversation listing

pub mod api;
pub mod domain;
pub mod repository;
pub mod service;

// Re-export domain types at the crate root for convenience
pub use domain::entities::{Conversation, Message, MessageRole, DEFAULT_TITLE};

// Re-export repository types
pub use repository::{
    ConversationQuery, ConversationRepository, ConversationStore, ConversationsRepositories,
    MessageRepository, MessageStore,
};
#[cfg(any(test, feature = "test-support"))]
pub use repository::{InMemoryConversationStore, InMemoryMessageStore};

pub use service::{
    ChatService, ConversationPage, ConversationSummary, ListingService, PageInfo, ThreadMessage,
    ThreadService, TurnReply,
};

// Re-export API types
pub use api::routes;
pub use api::ConversationsState;
