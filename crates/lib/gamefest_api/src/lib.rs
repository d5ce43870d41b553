//! # gamefest_api
//!
//! HTTP API library for Gamefest: team registration, the mini-game
//! leaderboard and the admin dashboard.

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use gamefest_core::store::{DocumentStore, FileStore, MemoryStore};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::handlers::{admin, auth, fallback, files, health, scores, teams};

/// Room for the multipart envelope and text fields on top of the file itself.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Teams, scores and admin accounts.
    pub documents: Arc<dyn DocumentStore>,
    /// Uploaded payment proofs.
    pub files: Arc<dyn FileStore>,
    /// API configuration.
    pub config: ApiConfig,
}

impl AppState {
    pub fn new(documents: Arc<dyn DocumentStore>, files: Arc<dyn FileStore>, config: ApiConfig) -> Self {
        Self {
            documents,
            files,
            config,
        }
    }

    /// State backed by a single in-memory store.
    pub fn in_memory(config: ApiConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::new(store.clone(), store, config)
    }
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes + FORM_OVERHEAD_BYTES;

    Router::new()
        .route(routes::HEALTH, get(health::health))
        .route(routes::ADMIN_LOGIN, post(auth::login_handler))
        .route(routes::ADMIN_LOGOUT, post(auth::logout_handler))
        .route(routes::ADMIN_ME, get(auth::me_handler))
        .route(routes::TEAMS, post(teams::register_handler))
        .route(routes::TEAMS_CHECK, get(teams::check_handler))
        .route(routes::TEAMS_STATS, get(teams::stats_handler))
        .route(routes::GAME_SCORES, post(scores::submit_handler))
        .route(routes::LEADERBOARD, get(scores::leaderboard_handler))
        .route(routes::ADMIN_TEAMS, get(admin::list_teams_handler))
        .route(routes::ADMIN_TEAM, delete(admin::delete_team_handler))
        .route(routes::ADMIN_SCORES, get(admin::list_scores_handler))
        .route(routes::ADMIN_SCORE, delete(admin::delete_score_handler))
        .route(
            routes::ADMIN_USERS,
            get(admin::list_users_handler).post(admin::create_user_handler),
        )
        .route(
            routes::ADMIN_USER,
            axum::routing::patch(admin::update_user_handler).delete(admin::delete_user_handler),
        )
        .route(routes::ADMIN_FILES, get(files::list_files_handler))
        .route(routes::ADMIN_FILE, get(files::download_handler))
        // Access rules come from the route table; only matched routes pass here.
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_access,
        ))
        .fallback(fallback::not_found)
        .method_not_allowed_fallback(fallback::not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::errors::expose_error_detail,
        ))
        .layer(axum::middleware::from_fn(
            middleware::preflight::short_circuit_options,
        ))
        .layer(CatchPanicLayer::custom(middleware::errors::panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}
