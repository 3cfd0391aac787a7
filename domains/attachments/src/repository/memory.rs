//! In-memory attachment store
//!
//! Backs tests and local wiring without PostgreSQL. Thread-safe via `Arc<Mutex<>>`.

use std::sync::{Arc, Mutex};

use chatrelay_common::{RepositoryError, Result};
use uuid::Uuid;

use super::AttachmentStore;
use crate::domain::entities::Attachment;

#[derive(Debug, Clone, Default)]
pub struct InMemoryAttachmentStore {
    rows: Arc<Mutex<Vec<Attachment>>>,
}

impl InMemoryAttachmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.rows.lock().map(|rows| rows.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn rows(&self) -> Result<std::sync::MutexGuard<'_, Vec<Attachment>>> {
        self.rows
            .lock()
            .map_err(|e| RepositoryError::Unavailable(format!("attachments lock poisoned: {e}")).into())
    }
}

#[async_trait::async_trait]
impl AttachmentStore for InMemoryAttachmentStore {
    async fn create(&self, attachment: &Attachment) -> Result<Attachment> {
        self.rows()?.push(attachment.clone());
        Ok(attachment.clone())
    }

    async fn find(&self, id: Uuid) -> Result<Option<Attachment>> {
        Ok(self.rows()?.iter().find(|a| a.id == id).cloned())
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Attachment>> {
        Ok(self
            .rows()?
            .iter()
            .filter(|a| ids.contains(&a.id))
            .cloned()
            .collect())
    }
}
