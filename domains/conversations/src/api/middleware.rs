//! Conversations domain state

use crate::service::{ChatService, ListingService, ThreadService};

/// Application state for the Conversations domain
#[derive(Clone)]
pub struct ConversationsState {
    pub chat: ChatService,
    pub listing: ListingService,
    pub thread: ThreadService,
}
