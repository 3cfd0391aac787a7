//! HTTP handlers for the Conversations domain

pub mod chat;
pub mod conversations;
