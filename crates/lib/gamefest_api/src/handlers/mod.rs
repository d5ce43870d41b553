//! Request handlers.

pub mod admin;
pub mod auth;
pub mod fallback;
pub mod files;
pub mod health;
pub mod scores;
pub mod teams;

use gamefest_core::id::normalize_id;
use serde::Serialize;

use crate::error::{AppError, AppResult};

/// `{ "message": ... }` acknowledgement body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Canonical form of a path ID; 400 unless it is 24 hex characters.
pub(crate) fn require_id(id: &str) -> AppResult<String> {
    normalize_id(id).ok_or_else(|| AppError::BadRequest("Invalid ID format".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_id_returns_lowercase_form() {
        assert_eq!(require_id("6AD54B5FF0F2E94FAD973E59").unwrap(), "6ad54b5ff0f2e94fad973e59");
        assert!(matches!(require_id("6ad54b5f"), Err(AppError::BadRequest(ref m)) if m == "Invalid ID format"));
    }
}
