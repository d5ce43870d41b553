//! Application error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use gamefest_core::auth::AuthError;
use gamefest_core::store::StoreError;
use gamefest_core::validation::{FieldError, ValidationErrors};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// JSON body of every error response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
    /// Internal error detail; only present in development.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorResponse {
    pub fn internal(detail: Option<String>) -> Self {
        Self {
            error: "internal_error".into(),
            message: "Internal server error".into(),
            errors: Vec::new(),
            detail,
        }
    }
}

/// Detail of a 500 response, stashed in the response extensions so the
/// development-only middleware can echo it.
#[derive(Debug, Clone)]
pub struct InternalErrorDetail(pub String);

/// Application-level errors with HTTP status mapping.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message, errors) = match self {
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                "Validation failed".to_string(),
                errors,
            ),
            AppError::BadRequest(m) => (StatusCode::BAD_REQUEST, "bad_request", m, Vec::new()),
            AppError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, "unauthorized", m, Vec::new()),
            AppError::Forbidden(m) => (StatusCode::FORBIDDEN, "forbidden", m, Vec::new()),
            AppError::NotFound(m) => (StatusCode::NOT_FOUND, "not_found", m, Vec::new()),
            AppError::Internal(detail) => {
                error!(%detail, "internal error");
                let mut response =
                    (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse::internal(None)))
                        .into_response();
                response
                    .extensions_mut()
                    .insert(InternalErrorDetail(detail));
                return response;
            }
        };
        let body = Json(ErrorResponse {
            error: error.to_string(),
            message,
            errors,
            detail: None,
        });
        (status, body).into_response()
    }
}

impl From<ValidationErrors> for AppError {
    fn from(e: ValidationErrors) -> Self {
        AppError::Validation(e.0)
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate(conflict) => AppError::BadRequest(conflict.to_string()),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::ValidationError(msg) => AppError::BadRequest(msg),
            AuthError::Store(e) => AppError::from(e),
            AuthError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gamefest_core::store::Conflict;

    #[test]
    fn duplicate_maps_to_bad_request() {
        let err = AppError::from(StoreError::Duplicate(Conflict::TeamName));
        assert!(matches!(err, AppError::BadRequest(ref m) if m == "Team name already exists"));
    }

    #[test]
    fn internal_hides_detail_but_keeps_extension() {
        let response = AppError::Internal("pool timed out".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let detail = response.extensions().get::<InternalErrorDetail>().unwrap();
        assert_eq!(detail.0, "pool timed out");
    }

    #[test]
    fn statuses_follow_taxonomy() {
        let cases = [
            (AppError::Validation(Vec::new()), StatusCode::BAD_REQUEST),
            (AppError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (AppError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (AppError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
