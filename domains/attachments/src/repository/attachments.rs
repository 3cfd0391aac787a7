//! Attachment repository

use crate::domain::entities::Attachment;
use chatrelay_common::Result;
use sqlx::PgPool;
use uuid::Uuid;

/// All columns in the attachments table, used for SELECT and RETURNING clauses.
const ATTACHMENT_COLUMNS: &str = "\
    id, session_id, message_id, \
    file_name, file_type, file_size, file_path, \
    uploaded_at";

/// Durable registry of attachment metadata
#[async_trait::async_trait]
pub trait AttachmentStore: Send + Sync {
    /// Persist a new attachment record
    async fn create(&self, attachment: &Attachment) -> Result<Attachment>;

    /// Find attachment by ID, orphaned or not
    async fn find(&self, id: Uuid) -> Result<Option<Attachment>>;

    /// Find every attachment whose ID is in `ids`; unknown IDs are skipped
    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Attachment>>;
}

#[derive(Clone)]
pub struct AttachmentRepository {
    pool: PgPool,
}

impl AttachmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl AttachmentStore for AttachmentRepository {
    async fn create(&self, attachment: &Attachment) -> Result<Attachment> {
        let query = format!(
            "INSERT INTO attachments ({ATTACHMENT_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {ATTACHMENT_COLUMNS}"
        );
        let created = sqlx::query_as::<_, Attachment>(&query)
            .bind(attachment.id)
            .bind(&attachment.session_id)
            .bind(attachment.message_id)
            .bind(&attachment.file_name)
            .bind(&attachment.file_type)
            .bind(attachment.file_size)
            .bind(&attachment.file_path)
            .bind(attachment.uploaded_at)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Attachment>> {
        let query = format!("SELECT {ATTACHMENT_COLUMNS} FROM attachments WHERE id = $1");
        let attachment = sqlx::query_as::<_, Attachment>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(attachment)
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Attachment>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = format!("SELECT {ATTACHMENT_COLUMNS} FROM attachments WHERE id = ANY($1)");
        let attachments = sqlx::query_as::<_, Attachment>(&query)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;

        Ok(attachments)
    }
}
