//! Conversation services: the chat turn write path and the two read paths

pub mod chat;
pub mod listing;
pub mod thread;

pub use chat::{ChatService, TurnReply};
pub use listing::{ConversationPage, ConversationSummary, ListingService, PageInfo};
pub use thread::{ThreadMessage, ThreadService};
