//! Mini-game score handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use gamefest_core::models::score::{GameScore, LEADERBOARD_LIMIT};
use gamefest_core::validation::{ScoreSubmission, is_valid_game_type, validate_score};
use tracing::debug;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::extract::JsonBody;

/// `POST /api/game-scores`
pub async fn submit_handler(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<ScoreSubmission>,
) -> AppResult<(StatusCode, Json<GameScore>)> {
    let score = validate_score(&body)?;
    let score = state.documents.insert_score(score).await?;
    debug!(player = %score.player_name, score = %score.score, game = %score.game_type, "score submitted");
    Ok((StatusCode::CREATED, Json(score)))
}

/// `GET /api/game-scores/leaderboard/{gameType}` — fastest first.
pub async fn leaderboard_handler(
    State(state): State<AppState>,
    Path(game_type): Path<String>,
) -> AppResult<Json<Vec<GameScore>>> {
    if !is_valid_game_type(&game_type) {
        return Err(AppError::BadRequest("Invalid game type".into()));
    }
    let scores = state.documents.leaderboard(&game_type, LEADERBOARD_LIMIT).await?;
    Ok(Json(scores))
}
