//! First-run superuser bootstrap.

use tracing::info;

use super::AuthError;
use super::password::hash_password;
use super::roles::Role;
use crate::models::auth::{AdminUser, NewAdminUser};
use crate::store::DocumentStore;
use crate::validation::validate_new_user;

/// Ensure a superuser named `username` exists.
///
/// Creates the account when missing and returns it. An existing account with
/// that username is returned untouched, whatever its role or password.
pub async fn ensure_superuser(
    store: &dyn DocumentStore,
    username: &str,
    password: &str,
) -> Result<AdminUser, AuthError> {
    if let Some(existing) = store.find_user_by_username(username.trim()).await? {
        info!(username = %existing.username, "bootstrap account already present");
        return Ok(existing);
    }

    let (username, role) = validate_new_user(username, password, Role::Superuser.as_str())
        .map_err(|e| {
            let details: Vec<String> = e.0.iter().map(|f| format!("{}: {}", f.field, f.message)).collect();
            AuthError::ValidationError(details.join("; "))
        })?;

    let user = store
        .insert_user(NewAdminUser {
            username,
            password_hash: hash_password(password)?,
            role,
            is_active: true,
        })
        .await?;
    info!(username = %user.username, "created bootstrap superuser");
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::verify_password;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn creates_superuser_once() {
        let store = MemoryStore::new();
        let first = ensure_superuser(&store, "root", "correct-horse").await.unwrap();
        assert_eq!(first.role, Role::Superuser);
        assert!(first.is_active);
        assert!(verify_password("correct-horse", &first.password_hash).unwrap());

        let second = ensure_superuser(&store, "ROOT", "different-pass").await.unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(store.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn rejects_weak_bootstrap_password() {
        let store = MemoryStore::new();
        let err = ensure_superuser(&store, "root", "short").await.unwrap_err();
        assert!(matches!(err, AuthError::ValidationError(_)));
    }
}
