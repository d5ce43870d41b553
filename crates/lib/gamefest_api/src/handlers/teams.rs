//! Public team registration handlers.

use std::collections::HashMap;

use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::extract::{FromRequest, Multipart, Path, Request, State};
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use gamefest_core::models::file::NewFile;
use gamefest_core::models::team::{Team, TeamStats};
use gamefest_core::validation::{TeamRegistration, ValidationErrors};
use serde::Serialize;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::extract::JsonBody;
use crate::services::teams::{self, PROOF_FIELD};

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub team: Team,
}

#[derive(Debug, Serialize)]
pub struct ExistsResponse {
    pub exists: bool,
}

/// `POST /api/teams` — register a team from a JSON body or a multipart form
/// carrying an optional `paymentProof` file.
pub async fn register_handler(
    State(state): State<AppState>,
    request: Request,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    let is_multipart = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("multipart/form-data"));

    let (registration, proof) = if is_multipart {
        let multipart = Multipart::from_request(request, &state)
            .await
            .map_err(|e| AppError::from(ValidationErrors::single("body", e.body_text())))?;
        read_form(multipart, state.config.max_upload_bytes).await?
    } else {
        let JsonBody(registration) = JsonBody::<TeamRegistration>::from_request(request, &state).await?;
        (registration, None)
    };

    let team = teams::register_team(
        state.documents.as_ref(),
        state.files.as_ref(),
        &registration,
        proof,
        state.config.max_upload_bytes,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Team registered successfully".into(),
            team,
        }),
    ))
}

async fn read_form(
    mut multipart: Multipart,
    max_upload_bytes: usize,
) -> AppResult<(TeamRegistration, Option<NewFile>)> {
    let mut fields = HashMap::new();
    let mut proof = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| form_error(e, max_upload_bytes))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == PROOF_FIELD {
            let filename = field.file_name().unwrap_or_default().to_string();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let data = field.bytes().await.map_err(|e| form_error(e, max_upload_bytes))?;
            // An empty file input still sends a part with no filename.
            if data.is_empty() && filename.is_empty() {
                continue;
            }
            proof = Some(NewFile {
                filename: if filename.is_empty() {
                    "payment-proof".into()
                } else {
                    filename
                },
                content_type,
                data: data.to_vec(),
            });
        } else {
            let text = field.text().await.map_err(|e| form_error(e, max_upload_bytes))?;
            fields.insert(name, text);
        }
    }

    Ok((teams::registration_from_fields(fields)?, proof))
}

fn form_error(e: MultipartError, max_upload_bytes: usize) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ValidationErrors::single(
            PROOF_FIELD,
            format!("File must be at most {} MB", max_upload_bytes / (1024 * 1024)),
        )
        .into()
    } else {
        ValidationErrors::single("body", e.body_text()).into()
    }
}

/// `GET /api/teams/check/{teamName}`
pub async fn check_handler(
    State(state): State<AppState>,
    Path(team_name): Path<String>,
) -> AppResult<Json<ExistsResponse>> {
    let exists = state.documents.team_name_exists(&team_name).await?;
    Ok(Json(ExistsResponse { exists }))
}

/// `GET /api/teams/stats`
pub async fn stats_handler(State(state): State<AppState>) -> AppResult<Json<TeamStats>> {
    Ok(Json(state.documents.team_stats().await?))
}
