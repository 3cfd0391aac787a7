//! Shared utilities, configuration, and error handling for Chatrelay
//!
//! This crate provides common functionality used across the Chatrelay application:
//! - Configuration management following 12-factor principles
//! - Error types and the `{ code, msg, data }` response envelope
//! - Request extractors (validated JSON, pagination)
//! - Database pool setup

pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod response;

pub use db::RepositoryError;
pub use error::{Error, Result};
pub use extractors::{ApiMultipart, ApiPath, ApiQuery, Pagination, ValidatedJson};
pub use response::ApiResponse;
