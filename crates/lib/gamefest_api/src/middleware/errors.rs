//! Error shaping middleware and the last-resort panic handler.

use std::any::Any;

use axum::Json;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::error;

use crate::AppState;
use crate::error::{ErrorResponse, InternalErrorDetail};

/// In development, rewrite 500 bodies to include the internal error detail.
pub async fn expose_error_detail(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    if !state.config.environment.is_development() {
        return response;
    }
    match response.extensions_mut().remove::<InternalErrorDetail>() {
        Some(InternalErrorDetail(detail)) => (
            response.status(),
            Json(ErrorResponse::internal(Some(detail))),
        )
            .into_response(),
        None => response,
    }
}

/// Convert a handler panic into a generic 500 instead of dropping the connection.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(detail, "handler panicked");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::internal(None)),
    )
        .into_response()
}
