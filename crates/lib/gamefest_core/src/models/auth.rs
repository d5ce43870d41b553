//! Authentication domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::roles::Role;

/// Admin dashboard account.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

/// Account about to be inserted.
#[derive(Debug, Clone)]
pub struct NewAdminUser {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub is_active: bool,
}

/// Partial update of an account. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct AdminUserUpdate {
    pub role: Option<Role>,
    pub is_active: Option<bool>,
    pub password_hash: Option<String>,
}

/// Identity facts carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Subject: the account ID.
    pub sub: String,
    pub username: String,
    pub role: Role,
    pub is_active: bool,
}

impl From<&AdminUser> for Identity {
    fn from(user: &AdminUser) -> Self {
        Self {
            sub: user.id.clone(),
            username: user.username.clone(),
            role: user.role,
            is_active: user.is_active,
        }
    }
}

/// Claims embedded in a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    #[serde(flatten)]
    pub identity: Identity,
    /// Expiry (unix seconds).
    pub exp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_user_never_serializes_password_hash() {
        let user = AdminUser {
            id: "65f0c0ffee0000000000abcd".into(),
            username: "root".into(),
            password_hash: "$2b$10$secret".into(),
            role: Role::Superuser,
            is_active: true,
            created_at: Utc::now(),
            last_login: None,
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["role"], "superuser");
        assert_eq!(json["isActive"], true);
    }

    #[test]
    fn claims_flatten_identity() {
        let claims = TokenClaims {
            identity: Identity {
                sub: "id-1".into(),
                username: "mod".into(),
                role: Role::EliteBoard,
                is_active: true,
            },
            exp: 42,
        };
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["sub"], "id-1");
        assert_eq!(json["role"], "elite_board");
        assert_eq!(json["exp"], 42);
    }
}
