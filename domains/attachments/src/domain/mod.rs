//! Domain layer for the Attachments domain

pub mod entities;
