//! Upload API handlers

use axum::{
    extract::{multipart::MultipartError, State},
    http::StatusCode,
    Json,
};
use chatrelay_common::{ApiMultipart, ApiPath, ApiResponse, Error, Result};
use uuid::Uuid;

use crate::api::middleware::AttachmentsState;
use crate::domain::entities::Attachment;
use crate::service::{AttachmentView, Upload};

/// Multipart field carrying the file
const FILE_FIELD: &str = "file";

/// Optional multipart field tagging the upload with a session
const SESSION_FIELD: &str = "sessionId";

fn multipart_error(e: MultipartError) -> Error {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        Error::PayloadTooLarge(e.body_text())
    } else {
        Error::Validation(format!("Invalid multipart body: {}", e.body_text()))
    }
}

/// Upload a single file
pub async fn upload_file(
    State(state): State<AttachmentsState>,
    ApiMultipart(mut multipart): ApiMultipart,
) -> Result<Json<ApiResponse<AttachmentView>>> {
    let mut file: Option<(String, String, Vec<u8>)> = None;
    let mut session_id: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        match field.name() {
            Some(FILE_FIELD) => {
                let original_name = field.file_name().unwrap_or_default().to_string();
                let mime_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();

                // Reject before the body is buffered or stored
                if let Err(e) = Attachment::validate_format(&mime_type) {
                    tracing::warn!(mime_type = %mime_type, "Rejected upload with unsupported type");
                    return Err(e);
                }

                let bytes = field.bytes().await.map_err(multipart_error)?;
                file = Some((original_name, mime_type, bytes.to_vec()));
            }
            Some(SESSION_FIELD) => {
                session_id = Some(field.text().await.map_err(multipart_error)?);
            }
            _ => {}
        }
    }

    let (original_name, mime_type, bytes) =
        file.ok_or_else(|| Error::Validation("No file uploaded".to_string()))?;

    let view = state
        .service
        .upload(Upload {
            original_name,
            mime_type,
            bytes,
            session_id,
        })
        .await?;

    Ok(Json(ApiResponse::ok(view)))
}

/// Get a single attachment by ID
pub async fn get_attachment(
    State(state): State<AttachmentsState>,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<ApiResponse<AttachmentView>>> {
    let id = Uuid::parse_str(&id)
        .map_err(|_| Error::NotFound("Attachment not found".to_string()))?;

    let view = state
        .service
        .find(id)
        .await?
        .ok_or_else(|| Error::NotFound("Attachment not found".to_string()))?;

    Ok(Json(ApiResponse::ok(view)))
}
