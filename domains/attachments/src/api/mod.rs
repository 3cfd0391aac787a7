//! API layer for the Attachments domain
//!
//! Contains HTTP handlers, routes, and domain state definition.

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use middleware::AttachmentsState;
pub use routes::routes;
