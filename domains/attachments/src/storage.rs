//! Local blob storage for uploaded files
//!
//! Files are written under a single root directory with a generated name,
//! `{uuid}.{ext}`, so client-supplied names never reach the filesystem.

use std::path::{Path, PathBuf};

use chatrelay_common::Result;
use uuid::Uuid;

/// Longest extension kept from the original file name
const MAX_EXTENSION_LENGTH: usize = 10;

#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the root directory if it does not exist yet
    pub async fn ensure_root(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    /// Write `bytes` to a freshly named file and return its path relative to the root
    pub async fn store(&self, original_name: &str, bytes: &[u8]) -> Result<String> {
        self.ensure_root().await?;

        let stored_name = match sanitized_extension(original_name) {
            Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
            None => Uuid::new_v4().to_string(),
        };

        tokio::fs::write(self.root.join(&stored_name), bytes).await?;
        tracing::debug!(stored_name = %stored_name, size = bytes.len(), "Stored uploaded file");

        Ok(stored_name)
    }

    /// Best-effort removal of a stored file
    pub async fn remove(&self, relative_path: &str) {
        if let Err(e) = tokio::fs::remove_file(self.root.join(relative_path)).await {
            tracing::warn!(path = %relative_path, error = %e, "Failed to remove stored file");
        }
    }
}

fn sanitized_extension(original_name: &str) -> Option<String> {
    let ext = Path::new(original_name).extension()?.to_str()?;
    if ext.is_empty()
        || ext.len() > MAX_EXTENSION_LENGTH
        || !ext.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}
