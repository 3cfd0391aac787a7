//! Response envelope shared by every endpoint
//!
//! Every body has the shape `{ "code": ..., "msg": ..., "data": ... }`.
//! `code = 0` signals success; any other value mirrors the HTTP status.

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

/// Success message used by all envelopes with `code = 0`
pub const SUCCESS_MESSAGE: &str = "success";

/// JSON envelope wrapping every API payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub code: u16,
    pub msg: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Wrap a successful payload
    pub fn ok(data: T) -> Self {
        Self {
            code: 0,
            msg: SUCCESS_MESSAGE.to_string(),
            data: Some(data),
        }
    }

    /// Build a failure envelope whose code mirrors the HTTP status
    pub fn failure(status: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            code: status.as_u16(),
            msg: msg.into(),
            data: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == 0
    }
}
