//! Authentication and authorization logic.
//!
//! Provides password hashing, the session token codec, admin roles and the
//! superuser bootstrap routine shared by the API and the server binary.

pub mod bootstrap;
pub mod password;
pub mod roles;
pub mod token;

use thiserror::Error;

use crate::store::StoreError;

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}
