//! Access middleware — session token extraction, verification and role gate.

use axum::extract::{MatchedPath, Request, State};
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::extract::cookie::CookieJar;
use gamefest_core::auth::roles::is_allowed;
use gamefest_core::auth::token::{self, InvalidReason, TokenVerdict};
use gamefest_core::models::auth::TokenClaims;
use tracing::warn;

use crate::AppState;
use crate::error::AppError;
use crate::routes::{self, Access};
use crate::services::cookies::SESSION_COOKIE;

/// Verified claims of the caller, stored in request extensions.
#[derive(Debug, Clone)]
pub struct AuthenticatedAdmin(pub TokenClaims);

impl AuthenticatedAdmin {
    pub fn user_id(&self) -> &str {
        &self.0.identity.sub
    }
}

/// Session token from the `gamefest_session` cookie, or failing that from an
/// `Authorization: Bearer` header.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(SESSION_COOKIE)
        && !cookie.value().is_empty()
    {
        return Some(cookie.value().to_string());
    }
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// Verify the caller's session: 401 when missing or invalid, 403 when the
/// account is deactivated.
pub fn authenticate(headers: &HeaderMap, secret: &[u8]) -> Result<TokenClaims, AppError> {
    let token = extract_token(headers)
        .ok_or_else(|| AppError::Unauthorized("Access denied. No token provided".into()))?;

    let claims = match token::verify(&token, secret) {
        TokenVerdict::Valid(claims) => claims,
        TokenVerdict::Invalid(InvalidReason::Expired) => {
            return Err(AppError::Unauthorized(
                "Session expired, please log in again".into(),
            ));
        }
        TokenVerdict::Invalid(reason) => {
            warn!(?reason, "rejected session token");
            return Err(AppError::Unauthorized("Invalid token".into()));
        }
    };

    if !claims.identity.is_active {
        return Err(AppError::Forbidden("Account is deactivated".into()));
    }
    Ok(claims)
}

/// Axum route middleware: looks up the matched route in the route table and
/// enforces its access rule, injecting `AuthenticatedAdmin` on success.
pub async fn require_access(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let access = request
        .extensions()
        .get::<MatchedPath>()
        .map_or(Access::Public, |matched| {
            routes::access_for(request.method(), matched.as_str())
        });

    let allowlist = match access {
        Access::Public => return Ok(next.run(request).await),
        Access::Authenticated => None,
        Access::Roles(roles) => Some(roles),
    };

    let claims = authenticate(request.headers(), state.config.token_secret.as_bytes())?;

    if let Some(roles) = allowlist
        && !is_allowed(claims.identity.role, roles)
    {
        warn!(
            username = %claims.identity.username,
            role = %claims.identity.role,
            path = %request.uri().path(),
            "insufficient role"
        );
        return Err(AppError::Forbidden("Insufficient permissions".into()));
    }

    request.extensions_mut().insert(AuthenticatedAdmin(claims));
    Ok(next.run(request).await)
}
