//! Repository implementations for Attachments domain

pub mod attachments;
#[cfg(any(test, feature = "test-support"))]
pub mod memory;

pub use attachments::{AttachmentRepository, AttachmentStore};
#[cfg(any(test, feature = "test-support"))]
pub use memory::InMemoryAttachmentStore;
