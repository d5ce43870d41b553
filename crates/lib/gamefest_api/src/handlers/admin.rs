//! Admin dashboard handlers: teams, scores and accounts.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use gamefest_core::models::auth::AdminUser;
use gamefest_core::models::score::GameScore;
use gamefest_core::models::team::Team;
use serde::Serialize;
use tracing::info;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::extract::JsonBody;
use crate::handlers::{MessageResponse, require_id};
use crate::middleware::auth::AuthenticatedAdmin;
use crate::services::teams;
use crate::services::users::{self, CreateUserRequest, UpdateUserRequest};

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub message: String,
    pub user: AdminUser,
}

/// `GET /api/admin/teams` — newest first.
pub async fn list_teams_handler(State(state): State<AppState>) -> AppResult<Json<Vec<Team>>> {
    Ok(Json(state.documents.list_teams().await?))
}

/// `DELETE /api/admin/teams/{id}`
pub async fn delete_team_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let id = require_id(&id)?;
    teams::delete_team(state.documents.as_ref(), state.files.as_ref(), &id).await?;
    Ok(Json(MessageResponse::new("Team deleted successfully")))
}

/// `GET /api/admin/scores` — newest first.
pub async fn list_scores_handler(State(state): State<AppState>) -> AppResult<Json<Vec<GameScore>>> {
    Ok(Json(state.documents.list_scores().await?))
}

/// `DELETE /api/admin/scores/{id}`
pub async fn delete_score_handler(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthenticatedAdmin>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let id = require_id(&id)?;
    if !state.documents.delete_score(&id).await? {
        return Err(AppError::NotFound("Score not found".into()));
    }
    info!(score_id = %id, by = %admin.0.identity.username, "score deleted");
    Ok(Json(MessageResponse::new("Score deleted successfully")))
}

/// `GET /api/admin/users`
pub async fn list_users_handler(State(state): State<AppState>) -> AppResult<Json<Vec<AdminUser>>> {
    Ok(Json(state.documents.list_users().await?))
}

/// `POST /api/admin/users`
pub async fn create_user_handler(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthenticatedAdmin>,
    JsonBody(body): JsonBody<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let user = users::create_user(state.documents.as_ref(), &admin.0.identity.username, &body).await?;
    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            message: "User created successfully".into(),
            user,
        }),
    ))
}

/// `PATCH /api/admin/users/{id}`
pub async fn update_user_handler(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthenticatedAdmin>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    let id = require_id(&id)?;
    let user = users::update_user(state.documents.as_ref(), admin.user_id(), &id, &body).await?;
    Ok(Json(UserResponse {
        message: "User updated successfully".into(),
        user,
    }))
}

/// `DELETE /api/admin/users/{id}`
pub async fn delete_user_handler(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthenticatedAdmin>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let id = require_id(&id)?;
    users::delete_user(state.documents.as_ref(), admin.user_id(), &id).await?;
    Ok(Json(MessageResponse::new("User deleted successfully")))
}
