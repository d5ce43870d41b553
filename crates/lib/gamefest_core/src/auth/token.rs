//! Stateless session tokens.
//!
//! A token is `base64(claims_json) + "." + hex(hmac_sha256(secret, claims_json))`.
//! Tokens are never stored server-side, so they cannot be revoked before they
//! expire.

use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use rand::distr::Alphanumeric;
use rand::{Rng, rng};
use sha2::Sha256;
use tracing::{info, warn};

use super::AuthError;
use crate::models::auth::{Identity, TokenClaims};

type HmacSha256 = Hmac<Sha256>;

/// Session lifetime: 24 hours.
pub const TOKEN_LIFETIME_SECS: i64 = 24 * 60 * 60;

/// Why a token was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    /// Missing separator, bad encoding or non-JSON payload.
    Malformed,
    /// Signature does not match the payload under this secret.
    BadSignature,
    /// Signature is fine but the embedded expiry has passed.
    Expired,
}

/// Outcome of verifying a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenVerdict {
    Valid(TokenClaims),
    Invalid(InvalidReason),
}

/// Issue a token for `identity` expiring [`TOKEN_LIFETIME_SECS`] from now.
pub fn issue(identity: &Identity, secret: &[u8]) -> Result<String, AuthError> {
    issue_at(identity, secret, Utc::now())
}

/// Issue a token as if the current time were `now`.
pub fn issue_at(identity: &Identity, secret: &[u8], now: DateTime<Utc>) -> Result<String, AuthError> {
    let claims = TokenClaims {
        identity: identity.clone(),
        exp: (now + Duration::seconds(TOKEN_LIFETIME_SECS)).timestamp(),
    };
    let payload = serde_json::to_vec(&claims)
        .map_err(|e| AuthError::Internal(format!("token encode: {e}")))?;
    let signature = sign(&payload, secret)?;
    Ok(format!("{}.{}", STANDARD.encode(&payload), hex::encode(signature)))
}

/// Verify a token against `secret` and the current time.
pub fn verify(token: &str, secret: &[u8]) -> TokenVerdict {
    verify_at(token, secret, Utc::now())
}

/// Verify a token as if the current time were `now`.
pub fn verify_at(token: &str, secret: &[u8], now: DateTime<Utc>) -> TokenVerdict {
    let Some((encoded, signature_hex)) = token.split_once('.') else {
        return TokenVerdict::Invalid(InvalidReason::Malformed);
    };
    let Ok(payload) = STANDARD.decode(encoded) else {
        return TokenVerdict::Invalid(InvalidReason::Malformed);
    };
    let Ok(signature) = hex::decode(signature_hex) else {
        return TokenVerdict::Invalid(InvalidReason::Malformed);
    };

    let Ok(mut mac) = HmacSha256::new_from_slice(secret) else {
        return TokenVerdict::Invalid(InvalidReason::BadSignature);
    };
    mac.update(&payload);
    // Constant-time comparison.
    if mac.verify_slice(&signature).is_err() {
        return TokenVerdict::Invalid(InvalidReason::BadSignature);
    }

    let Ok(claims) = serde_json::from_slice::<TokenClaims>(&payload) else {
        return TokenVerdict::Invalid(InvalidReason::Malformed);
    };
    if now.timestamp() >= claims.exp {
        return TokenVerdict::Invalid(InvalidReason::Expired);
    }
    TokenVerdict::Valid(claims)
}

fn sign(payload: &[u8], secret: &[u8]) -> Result<Vec<u8>, AuthError> {
    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| AuthError::Internal(format!("hmac key: {e}")))?;
    mac.update(payload);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Resolve the signing secret: env var `TOKEN_SECRET` → persisted file.
pub fn resolve_token_secret() -> String {
    if let Ok(secret) = std::env::var("TOKEN_SECRET")
        && !secret.is_empty()
    {
        return secret;
    }
    let secret_path = token_secret_path();
    if let Ok(existing) = std::fs::read_to_string(&secret_path) {
        let trimmed = existing.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }
    let secret: String = rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect();
    match persist_secret(&secret_path, &secret) {
        Ok(()) => info!(path = %secret_path.display(), "generated new token secret"),
        Err(e) => warn!(
            path = %secret_path.display(),
            error = %e,
            "could not persist token secret; sessions will not survive a restart"
        ),
    }
    secret
}

fn persist_secret(path: &Path, secret: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, secret)
}

/// Path to the persisted token secret file.
fn token_secret_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("gamefest")
        .join("token-secret")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::roles::Role;

    const SECRET: &[u8] = b"test-secret";

    fn identity() -> Identity {
        Identity {
            sub: "65f0c0ffee0000000000abcd".into(),
            username: "organiser".into(),
            role: Role::Admin,
            is_active: true,
        }
    }

    #[test]
    fn round_trip_returns_identity() {
        let token = issue(&identity(), SECRET).unwrap();
        let TokenVerdict::Valid(claims) = verify(&token, SECRET) else {
            panic!("token should verify");
        };
        assert_eq!(claims.identity, identity());
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn token_has_base64_payload_and_hex_signature() {
        let token = issue(&identity(), SECRET).unwrap();
        let (payload, signature) = token.split_once('.').unwrap();
        assert!(STANDARD.decode(payload).is_ok());
        assert_eq!(signature.len(), 64);
        assert!(signature.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn wrong_secret_is_bad_signature() {
        let token = issue(&identity(), SECRET).unwrap();
        assert_eq!(
            verify(&token, b"other-secret"),
            TokenVerdict::Invalid(InvalidReason::BadSignature)
        );
    }

    #[test]
    fn truncated_token_is_invalid() {
        let token = issue(&identity(), SECRET).unwrap();
        for cut in [1, 10, token.len() / 2, token.len() - 1] {
            let verdict = verify(&token[..cut], SECRET);
            assert!(
                matches!(verdict, TokenVerdict::Invalid(_)),
                "cut at {cut} was accepted"
            );
        }
    }

    #[test]
    fn expired_token_is_rejected() {
        let issued = Utc::now() - Duration::seconds(TOKEN_LIFETIME_SECS + 1);
        let token = issue_at(&identity(), SECRET, issued).unwrap();
        assert_eq!(
            verify(&token, SECRET),
            TokenVerdict::Invalid(InvalidReason::Expired)
        );
    }

    #[test]
    fn expiry_boundary_is_exclusive() {
        let now = Utc::now();
        let token = issue_at(&identity(), SECRET, now).unwrap();
        let at_expiry = now + Duration::seconds(TOKEN_LIFETIME_SECS);
        assert_eq!(
            verify_at(&token, SECRET, at_expiry),
            TokenVerdict::Invalid(InvalidReason::Expired)
        );
        let just_before = at_expiry - Duration::seconds(1);
        assert!(matches!(
            verify_at(&token, SECRET, just_before),
            TokenVerdict::Valid(_)
        ));
    }

    #[test]
    fn malformed_inputs_never_panic() {
        for token in ["", ".", "no-separator", "!!!.abcd", "e30=.zz", "e30=."] {
            assert!(matches!(verify(token, SECRET), TokenVerdict::Invalid(_)));
        }
    }

    #[test]
    fn non_json_payload_with_valid_signature_is_malformed() {
        let payload = b"not json";
        let signature = sign(payload, SECRET).unwrap();
        let token = format!("{}.{}", STANDARD.encode(payload), hex::encode(signature));
        assert_eq!(
            verify(&token, SECRET),
            TokenVerdict::Invalid(InvalidReason::Malformed)
        );
    }

    #[test]
    fn tampered_payload_is_bad_signature() {
        let token = issue(&identity(), SECRET).unwrap();
        let (_, signature) = token.split_once('.').unwrap();
        let mut forged = identity();
        forged.role = Role::Superuser;
        let claims = TokenClaims {
            identity: forged,
            exp: Utc::now().timestamp() + 60,
        };
        let payload = serde_json::to_vec(&claims).unwrap();
        let token = format!("{}.{signature}", STANDARD.encode(payload));
        assert_eq!(
            verify(&token, SECRET),
            TokenVerdict::Invalid(InvalidReason::BadSignature)
        );
    }

    #[test]
    fn persist_secret_reports_unwritable_location() {
        let blocker = std::env::temp_dir().join(format!("gamefest-secret-blocker-{}", std::process::id()));
        std::fs::write(&blocker, "not a directory").unwrap();

        let result = persist_secret(&blocker.join("token-secret"), "abc");
        std::fs::remove_file(&blocker).unwrap();
        assert!(result.is_err());
    }

    #[test]
    fn persist_secret_creates_parent_directories() {
        let dir = std::env::temp_dir().join(format!("gamefest-secret-dir-{}", std::process::id()));
        let path = dir.join("nested").join("token-secret");

        persist_secret(&path, "abc").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "abc");
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
