//! Liveness probe.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;
use tracing::warn;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub database: &'static str,
}

/// `GET /api/health` — 503 when the store does not answer.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (status, code, database) = match state.documents.ping().await {
        Ok(()) => ("ok", StatusCode::OK, "connected"),
        Err(e) => {
            warn!(error = %e, "health check could not reach the database");
            ("degraded", StatusCode::SERVICE_UNAVAILABLE, "disconnected")
        }
    };
    (
        code,
        Json(HealthResponse {
            status,
            version: gamefest_core::version(),
            database,
        }),
    )
}
