//! Domain entities for Attachments domain
//!
//! An attachment is the metadata record of an uploaded file. It is created
//! once at upload time, before any message exists, and is never mutated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

use chatrelay_common::{Error, Result};

/// Maximum file size (10MB)
pub const MAX_FILE_SIZE_BYTES: i64 = 10 * 1024 * 1024;

/// MIME types accepted for upload
pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "application/pdf",
    "text/plain",
    "text/markdown",
    "text/csv",
    "application/json",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

/// URL path prefix under which stored files are served
pub const PUBLIC_PATH_PREFIX: &str = "/uploads";

/// Strip parameters (`; charset=utf-8`) and normalize case
fn essence(mime_type: &str) -> String {
    mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Whether a MIME type may be uploaded
pub fn is_supported_mime(mime_type: &str) -> bool {
    ALLOWED_MIME_TYPES.contains(&essence(mime_type).as_str())
}

/// Metadata of an already-stored file, input to registration
#[derive(Debug, Clone, PartialEq)]
pub struct NewAttachment {
    pub original_name: String,
    pub mime_type: String,
    pub size_bytes: i64,
    /// Path of the stored file relative to the upload root
    pub storage_path: String,
    pub session_id: Option<String>,
}

/// Attachment entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Attachment {
    pub id: Uuid,
    pub session_id: Option<String>,
    pub message_id: Option<Uuid>,
    pub file_name: String,
    pub file_type: String,
    pub file_size: i64,
    pub file_path: String,
    pub uploaded_at: DateTime<Utc>,
}

impl Attachment {
    /// Create a new attachment record. `message_id` is always unset: the
    /// upload precedes the message that will reference it.
    pub fn new(new: NewAttachment) -> Result<Self> {
        Self::validate_format(&new.mime_type)?;
        Self::validate_size(new.size_bytes)?;

        if new.storage_path.trim().is_empty() {
            return Err(Error::Validation("Storage path is required".to_string()));
        }

        let file_name = if new.original_name.trim().is_empty() {
            file_name_of(&new.storage_path).to_string()
        } else {
            new.original_name
        };

        let session_id = new.session_id.filter(|s| !s.trim().is_empty());

        Ok(Attachment {
            id: Uuid::new_v4(),
            session_id,
            message_id: None,
            file_name,
            file_type: essence(&new.mime_type),
            file_size: new.size_bytes,
            file_path: new.storage_path,
            uploaded_at: Utc::now(),
        })
    }

    /// Reject MIME types outside the allow-list
    pub fn validate_format(mime_type: &str) -> Result<()> {
        if !is_supported_mime(mime_type) {
            return Err(Error::UnsupportedFormat(format!(
                "Unsupported file type: {}",
                mime_type
            )));
        }
        Ok(())
    }

    /// Reject empty files and files above the size ceiling
    pub fn validate_size(size_bytes: i64) -> Result<()> {
        if size_bytes <= 0 {
            return Err(Error::Validation("File is empty".to_string()));
        }
        if size_bytes > MAX_FILE_SIZE_BYTES {
            return Err(Error::PayloadTooLarge(format!(
                "File must be at most {} bytes",
                MAX_FILE_SIZE_BYTES
            )));
        }
        Ok(())
    }

    /// Name of the stored file on disk
    pub fn stored_file_name(&self) -> &str {
        file_name_of(&self.file_path)
    }

    /// Public URL, derived from the stored file name and the server base address
    pub fn public_url(&self, base_url: &str) -> String {
        format!(
            "{}{}/{}",
            base_url.trim_end_matches('/'),
            PUBLIC_PATH_PREFIX,
            self.stored_file_name()
        )
    }

    pub fn is_orphan(&self) -> bool {
        self.message_id.is_none()
    }
}

fn file_name_of(path: &str) -> &str {
    Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(path)
}

/// Attachment reference as embedded in a message thread
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentRef {
    pub file_id: Uuid,
    pub file_name: String,
    pub url: String,
}

impl AttachmentRef {
    pub fn from_attachment(attachment: &Attachment, base_url: &str) -> Self {
        Self {
            file_id: attachment.id,
            file_name: attachment.file_name.clone(),
            url: attachment.public_url(base_url),
        }
    }
}
