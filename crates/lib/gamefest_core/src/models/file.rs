//! Uploaded file metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata of a stored file. The bytes live in the file store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredFile {
    pub id: String,
    pub filename: String,
    pub content_type: String,
    pub length: i64,
    pub uploaded_at: DateTime<Utc>,
}

/// A file about to be stored.
#[derive(Debug, Clone)]
pub struct NewFile {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}
