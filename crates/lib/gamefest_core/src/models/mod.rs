//! Domain models.
//!
//! These are the shapes stored by the document and file stores and returned
//! by the HTTP API. JSON field names are camelCase to match the web client.

pub mod auth;
pub mod file;
pub mod score;
pub mod team;
