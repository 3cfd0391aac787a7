//! Attachments domain: uploaded file storage and metadata registry

pub mod api;
pub mod domain;
pub mod repository;
pub mod service;
pub mod storage;

// Re-export domain types at the crate root for convenience
pub use domain::entities::{
    is_supported_mime, Attachment, AttachmentRef, NewAttachment, ALLOWED_MIME_TYPES,
    MAX_FILE_SIZE_BYTES,
};

// Re-export repository types
pub use repository::{AttachmentRepository, AttachmentStore};
#[cfg(any(test, feature = "test-support"))]
pub use repository::InMemoryAttachmentStore;

pub use service::{AttachmentService, AttachmentView, Upload};
pub use storage::FileStorage;

// Re-export API types
pub use api::routes;
pub use api::AttachmentsState;
