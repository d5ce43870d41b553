//! Admin session handlers.

use axum::extract::State;
use axum::{Extension, Json};
use axum_extra::extract::cookie::CookieJar;
use gamefest_core::models::auth::AdminUser;
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::AppResult;
use crate::extract::JsonBody;
use crate::handlers::MessageResponse;
use crate::middleware::auth::AuthenticatedAdmin;
use crate::services::{auth, cookies};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub user: AdminUser,
    /// Also set as the session cookie; returned for clients using bearer auth.
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: AdminUser,
}

/// `POST /api/admin/login` — verify credentials and set the session cookie.
pub async fn login_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    JsonBody(body): JsonBody<LoginRequest>,
) -> AppResult<(CookieJar, Json<LoginResponse>)> {
    let (user, token) = auth::login(
        state.documents.as_ref(),
        &body.username,
        &body.password,
        state.config.token_secret.as_bytes(),
    )
    .await?;
    let jar = jar.add(cookies::session_cookie(&token, state.config.cookie_secure));
    Ok((
        jar,
        Json(LoginResponse {
            message: "Login successful".into(),
            user,
            token,
        }),
    ))
}

/// `POST /api/admin/logout` — clear the session cookie.
pub async fn logout_handler(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    let jar = jar.add(cookies::clear_session_cookie(state.config.cookie_secure));
    (jar, Json(MessageResponse::new("Logged out successfully")))
}

/// `GET /api/admin/me` — the account behind the current session.
pub async fn me_handler(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthenticatedAdmin>,
) -> AppResult<Json<MeResponse>> {
    let user = auth::current_user(state.documents.as_ref(), admin.user_id()).await?;
    Ok(Json(MeResponse { user }))
}
