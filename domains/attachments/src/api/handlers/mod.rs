//! HTTP handlers for the Attachments domain

pub mod uploads;
