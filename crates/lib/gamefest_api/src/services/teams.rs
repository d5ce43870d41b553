//! Team registration.

use std::collections::HashMap;

use gamefest_core::models::file::NewFile;
use gamefest_core::models::team::{FileRef, Team};
use gamefest_core::store::{DocumentStore, FileStore, StoreError};
use gamefest_core::validation::{CaptainInput, PlayerInput, TeamRegistration, ValidationErrors, validate_team};
use tracing::{info, warn};

use crate::error::{AppError, AppResult};

/// Content types accepted for payment proofs.
pub const ALLOWED_PROOF_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp", "application/pdf"];

/// Multipart field carrying the payment proof.
pub const PROOF_FIELD: &str = "paymentProof";

/// Build a registration from multipart text fields. `captain` and `players`
/// hold JSON text; flat `captainName`/`captainEmail`/`captainPhone` fields are
/// accepted when no `captain` object is sent.
pub fn registration_from_fields(
    mut fields: HashMap<String, String>,
) -> Result<TeamRegistration, ValidationErrors> {
    let captain = match fields.remove("captain") {
        Some(text) => serde_json::from_str::<CaptainInput>(&text)
            .map_err(|_| ValidationErrors::single("captain", "Captain must be a JSON object"))?,
        None => CaptainInput {
            name: fields.remove("captainName").unwrap_or_default(),
            email: fields.remove("captainEmail").unwrap_or_default(),
            phone: fields.remove("captainPhone").unwrap_or_default(),
        },
    };

    let players = match fields.remove("players") {
        Some(text) => serde_json::from_str::<Vec<PlayerInput>>(&text)
            .map_err(|_| ValidationErrors::single("players", "Players must be a JSON array"))?,
        None => Vec::new(),
    };

    Ok(TeamRegistration {
        team_name: fields.remove("teamName").unwrap_or_default(),
        game: fields.remove("game").unwrap_or_default(),
        captain,
        players,
    })
}

/// Check the size and type of a payment proof.
pub fn check_proof(file: &NewFile, max_bytes: usize) -> Result<(), ValidationErrors> {
    if file.data.is_empty() {
        return Err(ValidationErrors::single(PROOF_FIELD, "Uploaded file is empty"));
    }
    if file.data.len() > max_bytes {
        return Err(ValidationErrors::single(
            PROOF_FIELD,
            format!("File must be at most {} MB", max_bytes / (1024 * 1024)),
        ));
    }
    if !ALLOWED_PROOF_TYPES.contains(&file.content_type.as_str()) {
        return Err(ValidationErrors::single(
            PROOF_FIELD,
            "File must be a JPEG, PNG, WebP image or a PDF",
        ));
    }
    Ok(())
}

/// Validate, check uniqueness, store the proof, then insert the team.
///
/// Nothing is written until validation and the uniqueness check pass. If the
/// insert fails after the proof was stored, the file stays behind.
pub async fn register_team(
    documents: &dyn DocumentStore,
    files: &dyn FileStore,
    registration: &TeamRegistration,
    proof: Option<NewFile>,
    max_upload_bytes: usize,
) -> AppResult<Team> {
    let mut team = validate_team(registration)?;

    if documents.team_name_exists(&team.team_name).await? {
        return Err(AppError::BadRequest("Team name already exists".into()));
    }

    if let Some(file) = &proof {
        check_proof(file, max_upload_bytes)?;
    }

    let stored = match proof {
        Some(file) => Some(files.put_file(file).await?),
        None => None,
    };
    team.payment_proof = stored.as_ref().map(|f| FileRef {
        file_id: f.id.clone(),
        filename: f.filename.clone(),
        content_type: f.content_type.clone(),
    });

    match documents.insert_team(team).await {
        Ok(team) => {
            info!(team = %team.team_name, game = %team.game, id = %team.id, "team registered");
            Ok(team)
        }
        Err(e) => {
            if let Some(file) = &stored {
                warn!(file_id = %file.id, "team insert failed, payment proof left orphaned");
            }
            Err(match e {
                StoreError::Duplicate(_) => AppError::BadRequest("Team name already exists".into()),
                other => other.into(),
            })
        }
    }
}

/// Delete a team and its payment proof.
pub async fn delete_team(documents: &dyn DocumentStore, files: &dyn FileStore, id: &str) -> AppResult<Team> {
    let team = documents
        .delete_team(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Team not found".into()))?;
    // The team is already gone; a file-store failure only leaves the proof behind.
    if let Some(proof) = &team.payment_proof {
        match files.delete_file(&proof.file_id).await {
            Ok(true) => {}
            Ok(false) => {
                warn!(file_id = %proof.file_id, team = %team.team_name, "payment proof already missing");
            }
            Err(e) => {
                warn!(file_id = %proof.file_id, team = %team.team_name, error = %e, "could not delete payment proof");
            }
        }
    }
    info!(team = %team.team_name, id = %team.id, "team deleted");
    Ok(team)
}
