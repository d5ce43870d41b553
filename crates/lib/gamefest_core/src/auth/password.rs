//! Admin password hashing.
//!
//! Hashes are stored as `$2b$` bcrypt strings so accounts created by other
//! tooling verify unchanged.

use bcrypt::{BcryptError, Version};

use super::AuthError;

/// Work factor for new hashes.
pub const PASSWORD_COST: u32 = 10;

pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let parts = bcrypt::hash_with_result(password, PASSWORD_COST).map_err(internal("hash"))?;
    Ok(parts.format_for_version(Version::TwoB))
}

/// A mismatch is `Ok(false)`; an unreadable hash is an internal error.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    bcrypt::verify(password, hash).map_err(internal("verify"))
}

fn internal(step: &'static str) -> impl Fn(BcryptError) -> AuthError {
    move |e| AuthError::Internal(format!("password {step}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_use_2b_prefix_and_cost() {
        let hash = hash_password("hunter22").unwrap();
        assert!(hash.starts_with("$2b$10$"), "{hash}");
        assert!(verify_password("hunter22", &hash).unwrap());
        assert!(!verify_password("hunter23", &hash).unwrap());
    }

    #[test]
    fn corrupt_hash_is_an_error() {
        let err = verify_password("hunter22", "not-a-bcrypt-hash").unwrap_err();
        assert!(matches!(err, AuthError::Internal(ref m) if m.starts_with("password verify")));
    }
}
