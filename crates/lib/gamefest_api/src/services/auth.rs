//! Authentication service — login flow over the document store.

use gamefest_core::auth::password::verify_password;
use gamefest_core::auth::token;
use gamefest_core::models::auth::{AdminUser, Identity};
use gamefest_core::store::DocumentStore;
use gamefest_core::validation::validate_credentials;
use tracing::{info, warn};

use crate::error::{AppError, AppResult};

/// Authenticate with username + password, returning the account and a fresh
/// session token. Last login is stamped on success.
pub async fn login(
    store: &dyn DocumentStore,
    username: &str,
    password: &str,
    secret: &[u8],
) -> AppResult<(AdminUser, String)> {
    validate_credentials(username, password)?;

    // Same message for unknown user and wrong password.
    let user = match store.find_user_by_username(username.trim()).await? {
        Some(user) => user,
        None => {
            warn!(username = %username.trim(), "login for unknown user");
            return Err(AppError::Unauthorized("Invalid credentials".into()));
        }
    };

    if !verify_password(password, &user.password_hash)? {
        warn!(username = %user.username, "login with wrong password");
        return Err(AppError::Unauthorized("Invalid credentials".into()));
    }

    if !user.is_active {
        return Err(AppError::Forbidden("Account is deactivated".into()));
    }

    store.record_login(&user.id).await?;
    let token = token::issue(&Identity::from(&user), secret)?;
    info!(username = %user.username, role = %user.role, "admin logged in");

    let user = store.find_user(&user.id).await?.unwrap_or(user);
    Ok((user, token))
}

/// Current account for a verified session.
pub async fn current_user(store: &dyn DocumentStore, user_id: &str) -> AppResult<AdminUser> {
    store
        .find_user(user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Account no longer exists".into()))
}
