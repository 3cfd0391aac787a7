//! Attachments domain state

use crate::service::AttachmentService;

/// Application state for the Attachments domain
#[derive(Clone)]
pub struct AttachmentsState {
    pub service: AttachmentService,
}
