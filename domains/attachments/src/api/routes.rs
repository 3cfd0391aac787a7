//! Route definitions for Attachments domain API

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use super::handlers::uploads;
use super::middleware::AttachmentsState;
use crate::domain::entities::MAX_FILE_SIZE_BYTES;

/// Room for multipart boundaries and the text fields next to the file
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Create upload routes
fn upload_routes() -> Router<AttachmentsState> {
    Router::new().route(
        "/api/upload",
        post(uploads::upload_file).layer(DefaultBodyLimit::max(
            MAX_FILE_SIZE_BYTES as usize + MULTIPART_OVERHEAD_BYTES,
        )),
    )
}

/// Create attachment lookup routes
fn attachment_routes() -> Router<AttachmentsState> {
    Router::new().route("/api/attachments/{id}", get(uploads::get_attachment))
}

/// Create all Attachments domain API routes
pub fn routes() -> Router<AttachmentsState> {
    Router::new()
        .merge(upload_routes())
        .merge(attachment_routes())
}
