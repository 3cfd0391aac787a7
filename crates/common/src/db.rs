//! Shared database types for Chatrelay
//!
//! This module provides common database-related types used across domain repositories.

use crate::error::Error;
use sqlx::postgres::{PgPool, PgPoolOptions};
use thiserror::Error;

/// Maximum number of pooled connections
const MAX_CONNECTIONS: u32 = 10;

/// Database-specific error types
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    #[error("Database connection error: {0}")]
    Connection(#[from] sqlx::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<RepositoryError> for Error {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Error::NotFound("Record not found".to_string()),
            RepositoryError::Connection(e) => Error::Database(e),
            RepositoryError::InvalidData(msg) => Error::Internal(msg),
            RepositoryError::Unavailable(msg) => Error::Internal(msg),
        }
    }
}

/// Open the process-wide connection pool
pub async fn connect(database_url: &str) -> Result<PgPool, RepositoryError> {
    let pool = PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// Escape `%`, `_` and `\` so a user keyword matches literally inside `ILIKE`
pub fn like_pattern(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len() + 2);
    escaped.push('%');
    for c in keyword.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}
