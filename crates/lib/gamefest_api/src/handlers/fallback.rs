//! Unmatched-route handler.

use axum::Json;
use axum::http::{Method, StatusCode, Uri};
use serde::Serialize;

use crate::routes;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotFoundResponse {
    pub error: &'static str,
    pub message: &'static str,
    pub method: String,
    pub path: String,
    pub available_endpoints: Vec<String>,
}

/// 404 listing every endpoint of the route table.
pub async fn not_found(method: Method, uri: Uri) -> (StatusCode, Json<NotFoundResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(NotFoundResponse {
            error: "not_found",
            message: "Route not found",
            method: method.to_string(),
            path: uri.path().to_string(),
            available_endpoints: routes::endpoints(),
        }),
    )
}
