//! Common error types and handling for Chatrelay

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::response::ApiResponse;

/// Common result type
pub type Result<T> = std::result::Result<T, Error>;

/// Message returned to clients for every failure of the generative-AI call
const EXTERNAL_SERVICE_MESSAGE: &str = "External service error";

/// Message returned to clients for every other server-side failure
const INTERNAL_MESSAGE: &str = "Internal server error";

/// Common error type for the Chatrelay application
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unexpected error: {0}")]
    Unexpected(#[from] anyhow::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Get the appropriate HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::UnsupportedFormat(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Error::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::ExternalService(_)
            | Error::Unexpected(_)
            | Error::Database(_)
            | Error::Io(_)
            | Error::Serialization(_)
            | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to clients.
    ///
    /// Client errors carry their own description; server errors collapse to a
    /// generic message so causes never leave the process.
    pub fn public_message(&self) -> String {
        match self {
            Error::Validation(msg)
            | Error::UnsupportedFormat(msg)
            | Error::PayloadTooLarge(msg)
            | Error::NotFound(msg) => msg.clone(),
            Error::ExternalService(_) => EXTERNAL_SERVICE_MESSAGE.to_string(),
            Error::Unexpected(_)
            | Error::Database(_)
            | Error::Io(_)
            | Error::Serialization(_)
            | Error::Internal(_) => INTERNAL_MESSAGE.to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Log internal errors with full context
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "Internal server error");
        }

        let body: ApiResponse<()> = ApiResponse::failure(status, self.public_message());
        (status, Json(body)).into_response()
    }
}
