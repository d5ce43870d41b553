//! Admin account management.

use gamefest_core::auth::password::hash_password;
use gamefest_core::models::auth::{AdminUser, AdminUserUpdate, NewAdminUser};
use gamefest_core::store::DocumentStore;
use gamefest_core::validation::{parse_role, validate_new_user, validate_password};
use serde::Deserialize;
use tracing::info;

use crate::error::{AppError, AppResult};

/// `POST /api/admin/users` body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    pub role: String,
    pub is_active: Option<bool>,
}

/// `PATCH /api/admin/users/{id}` body. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub role: Option<String>,
    pub is_active: Option<bool>,
    pub password: Option<String>,
}

pub async fn create_user(
    store: &dyn DocumentStore,
    actor: &str,
    request: &CreateUserRequest,
) -> AppResult<AdminUser> {
    let (username, role) = validate_new_user(&request.username, &request.password, &request.role)?;
    let user = store
        .insert_user(NewAdminUser {
            username,
            password_hash: hash_password(&request.password)?,
            role,
            is_active: request.is_active.unwrap_or(true),
        })
        .await?;
    info!(username = %user.username, role = %user.role, by = actor, "admin account created");
    Ok(user)
}

/// Apply an update. Accounts cannot demote or deactivate themselves.
pub async fn update_user(
    store: &dyn DocumentStore,
    actor_id: &str,
    target_id: &str,
    request: &UpdateUserRequest,
) -> AppResult<AdminUser> {
    let mut update = AdminUserUpdate::default();
    if let Some(role) = &request.role {
        update.role = Some(parse_role(role)?);
    }
    update.is_active = request.is_active;
    if let Some(password) = &request.password {
        validate_password(password)?;
        update.password_hash = Some(hash_password(password)?);
    }

    if update.role.is_none() && update.is_active.is_none() && update.password_hash.is_none() {
        return Err(AppError::BadRequest("No changes supplied".into()));
    }

    if actor_id == target_id && (update.role.is_some() || update.is_active == Some(false)) {
        return Err(AppError::BadRequest(
            "You cannot change your own role or deactivate your own account".into(),
        ));
    }

    let user = store
        .update_user(target_id, update)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    info!(username = %user.username, role = %user.role, active = user.is_active, "admin account updated");
    Ok(user)
}

/// Hard-delete an account. Self-deletion is refused.
pub async fn delete_user(store: &dyn DocumentStore, actor_id: &str, target_id: &str) -> AppResult<()> {
    if actor_id == target_id {
        return Err(AppError::BadRequest("You cannot delete your own account".into()));
    }
    if !store.delete_user(target_id).await? {
        return Err(AppError::NotFound("User not found".into()));
    }
    info!(user_id = target_id, by = actor_id, "admin account deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gamefest_core::auth::roles::Role;
    use gamefest_core::store::MemoryStore;

    fn create(username: &str, role: &str) -> CreateUserRequest {
        CreateUserRequest {
            username: username.into(),
            password: "board-password".into(),
            role: role.into(),
            is_active: None,
        }
    }

    #[tokio::test]
    async fn created_users_are_active_by_default() {
        let store = MemoryStore::new();
        let user = create_user(&store, "root", &create("lead", "elite_board")).await.unwrap();
        assert!(user.is_active);
        assert_eq!(user.role, Role::EliteBoard);
    }

    #[tokio::test]
    async fn duplicate_username_is_bad_request() {
        let store = MemoryStore::new();
        create_user(&store, "root", &create("lead", "admin")).await.unwrap();
        let err = create_user(&store, "root", &create("LEAD", "admin")).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref m) if m == "Username already exists"));
    }

    #[tokio::test]
    async fn cannot_deactivate_self_but_can_deactivate_others() {
        let store = MemoryStore::new();
        let me = create_user(&store, "root", &create("root", "superuser")).await.unwrap();
        let other = create_user(&store, "root", &create("desk", "admin")).await.unwrap();
        let deactivate = UpdateUserRequest {
            is_active: Some(false),
            ..Default::default()
        };

        let err = update_user(&store, &me.id, &me.id, &deactivate).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let updated = update_user(&store, &me.id, &other.id, &deactivate).await.unwrap();
        assert!(!updated.is_active);
    }

    #[tokio::test]
    async fn empty_update_is_rejected() {
        let store = MemoryStore::new();
        let user = create_user(&store, "root", &create("desk", "admin")).await.unwrap();
        let err = update_user(&store, "someone", &user.id, &UpdateUserRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref m) if m == "No changes supplied"));
    }

    #[tokio::test]
    async fn delete_refuses_self_and_reports_missing() {
        let store = MemoryStore::new();
        let me = create_user(&store, "root", &create("root", "superuser")).await.unwrap();

        let err = delete_user(&store, &me.id, &me.id).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let err = delete_user(&store, &me.id, "65f0c0ffee0000000000abcd").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
