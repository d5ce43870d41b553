//! Payment-proof file handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use gamefest_core::models::file::StoredFile;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::handlers::require_id;

/// `GET /api/admin/files` — newest first.
pub async fn list_files_handler(State(state): State<AppState>) -> AppResult<Json<Vec<StoredFile>>> {
    Ok(Json(state.files.list_files().await?))
}

/// `GET /api/admin/files/{id}` — the raw bytes as an attachment.
pub async fn download_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = require_id(&id)?;
    let (meta, data) = state
        .files
        .get_file(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("File not found".into()))?;

    let disposition = format!("attachment; filename=\"{}\"", header_safe(&meta.filename));
    Ok((
        [(CONTENT_TYPE, header_safe(&meta.content_type)), (CONTENT_DISPOSITION, disposition)],
        data,
    )
        .into_response())
}

/// Keep printable ASCII minus quotes and backslashes so the value is a legal
/// header and cannot break out of the quoted filename.
fn header_safe(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii_graphic() || c == ' ' => c,
            _ => '_',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_safe_replaces_quotes_and_non_ascii() {
        assert_eq!(header_safe("re\"ceipt é.png"), "re_ceipt _.png");
        assert_eq!(header_safe("image/png"), "image/png");
    }
}
