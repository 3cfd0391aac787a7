//! Attachment registrar
//!
//! Validates, stores and records uploaded files, and resolves attachment
//! identifiers back to public references for message threads.

use std::collections::HashMap;
use std::sync::Arc;

use chatrelay_common::Result;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::entities::{Attachment, AttachmentRef, NewAttachment};
use crate::repository::AttachmentStore;
use crate::storage::FileStorage;

/// A file received from a client, not yet stored
#[derive(Debug, Clone)]
pub struct Upload {
    pub original_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
    pub session_id: Option<String>,
}

/// Registered attachment as returned to clients
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentView {
    pub file_id: Uuid,
    pub file_name: String,
    pub file_type: String,
    pub file_size: i64,
    pub url: String,
}

impl AttachmentView {
    fn new(attachment: &Attachment, base_url: &str) -> Self {
        Self {
            file_id: attachment.id,
            file_name: attachment.file_name.clone(),
            file_type: attachment.file_type.clone(),
            file_size: attachment.file_size,
            url: attachment.public_url(base_url),
        }
    }
}

#[derive(Clone)]
pub struct AttachmentService {
    store: Arc<dyn AttachmentStore>,
    storage: FileStorage,
    public_base_url: String,
}

impl AttachmentService {
    pub fn new(
        store: Arc<dyn AttachmentStore>,
        storage: FileStorage,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            store,
            storage,
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn public_base_url(&self) -> &str {
        &self.public_base_url
    }

    /// Validate, write to storage, then register.
    ///
    /// Format and size are checked before any byte reaches storage.
    pub async fn upload(&self, upload: Upload) -> Result<AttachmentView> {
        Attachment::validate_format(&upload.mime_type)?;
        let size_bytes = i64::try_from(upload.bytes.len()).unwrap_or(i64::MAX);
        Attachment::validate_size(size_bytes)?;

        let storage_path = self
            .storage
            .store(&upload.original_name, &upload.bytes)
            .await?;

        let registered = self
            .register(NewAttachment {
                original_name: upload.original_name,
                mime_type: upload.mime_type,
                size_bytes,
                storage_path: storage_path.clone(),
                session_id: upload.session_id,
            })
            .await;

        if registered.is_err() {
            self.storage.remove(&storage_path).await;
        }
        registered
    }

    /// Record metadata for an already-stored file
    pub async fn register(&self, new: NewAttachment) -> Result<AttachmentView> {
        let attachment = Attachment::new(new)?;
        let created = self.store.create(&attachment).await?;

        tracing::info!(
            file_id = %created.id,
            file_type = %created.file_type,
            file_size = created.file_size,
            "Attachment registered"
        );

        Ok(AttachmentView::new(&created, &self.public_base_url))
    }

    /// Look up an attachment by ID; orphans are returned like any other
    pub async fn find(&self, id: Uuid) -> Result<Option<AttachmentView>> {
        let attachment = self.store.find(id).await?;
        Ok(attachment.map(|a| AttachmentView::new(&a, &self.public_base_url)))
    }

    /// Resolve raw attachment IDs (as stored on messages) to references.
    ///
    /// The map is keyed by the raw ID string. IDs that are not UUIDs or have
    /// no record are absent from the map.
    pub async fn resolve(&self, raw_ids: &[String]) -> Result<HashMap<String, AttachmentRef>> {
        let parsed: Vec<(&String, Uuid)> = raw_ids
            .iter()
            .filter_map(|raw| Uuid::parse_str(raw.trim()).ok().map(|id| (raw, id)))
            .collect();

        if parsed.is_empty() {
            return Ok(HashMap::new());
        }

        let mut ids: Vec<Uuid> = parsed.iter().map(|(_, id)| *id).collect();
        ids.sort_unstable();
        ids.dedup();

        let found: HashMap<Uuid, AttachmentRef> = self
            .store
            .find_many(&ids)
            .await?
            .iter()
            .map(|a| (a.id, AttachmentRef::from_attachment(a, &self.public_base_url)))
            .collect();

        Ok(parsed
            .into_iter()
            .filter_map(|(raw, id)| found.get(&id).map(|r| (raw.clone(), r.clone())))
            .collect())
    }
}
