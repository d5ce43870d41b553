//! Storage adapters.
//!
//! Handlers talk to two traits: [`DocumentStore`] for teams, scores and admin
//! accounts, and [`FileStore`] for uploaded payment proofs. [`PgStore`]
//! backs both with PostgreSQL; [`MemoryStore`] keeps everything in process
//! for tests and local demos.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::auth::{AdminUser, AdminUserUpdate, NewAdminUser};
use crate::models::file::{NewFile, StoredFile};
use crate::models::score::{GameScore, NewScore};
use crate::models::team::{NewTeam, Team, TeamStats};

/// Unique constraint a write ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conflict {
    TeamName,
    Username,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Conflict::TeamName => f.write_str("Team name already exists"),
            Conflict::Username => f.write_str("Username already exists"),
        }
    }
}

/// Storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Duplicate(Conflict),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Document storage for teams, scores and admin accounts.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Cheap connectivity check.
    async fn ping(&self) -> StoreResult<()>;

    /// Whether a team with this name exists, ignoring case.
    async fn team_name_exists(&self, team_name: &str) -> StoreResult<bool>;
    /// Insert a team. Fails with [`Conflict::TeamName`] on a case-insensitive clash.
    async fn insert_team(&self, team: NewTeam) -> StoreResult<Team>;
    /// All teams, newest first.
    async fn list_teams(&self) -> StoreResult<Vec<Team>>;
    async fn find_team(&self, id: &str) -> StoreResult<Option<Team>>;
    /// Delete a team, returning it if it existed.
    async fn delete_team(&self, id: &str) -> StoreResult<Option<Team>>;
    async fn team_stats(&self) -> StoreResult<TeamStats>;

    async fn insert_score(&self, score: NewScore) -> StoreResult<GameScore>;
    /// All scores, newest first.
    async fn list_scores(&self) -> StoreResult<Vec<GameScore>>;
    /// Best `limit` scores for `game_type`, lowest time first.
    async fn leaderboard(&self, game_type: &str, limit: usize) -> StoreResult<Vec<GameScore>>;
    async fn delete_score(&self, id: &str) -> StoreResult<bool>;

    /// Look up an account by username, ignoring case.
    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<AdminUser>>;
    async fn find_user(&self, id: &str) -> StoreResult<Option<AdminUser>>;
    /// All accounts, oldest first.
    async fn list_users(&self) -> StoreResult<Vec<AdminUser>>;
    /// Insert an account. Fails with [`Conflict::Username`] on a case-insensitive clash.
    async fn insert_user(&self, user: NewAdminUser) -> StoreResult<AdminUser>;
    async fn update_user(&self, id: &str, update: AdminUserUpdate) -> StoreResult<Option<AdminUser>>;
    /// Stamp the account's last login with the current time.
    async fn record_login(&self, id: &str) -> StoreResult<()>;
    async fn delete_user(&self, id: &str) -> StoreResult<bool>;
}

/// Binary storage for uploaded files.
#[async_trait]
pub trait FileStore: Send + Sync {
    async fn put_file(&self, file: NewFile) -> StoreResult<StoredFile>;
    /// Metadata and bytes of a file.
    async fn get_file(&self, id: &str) -> StoreResult<Option<(StoredFile, Vec<u8>)>>;
    /// All files, newest first.
    async fn list_files(&self) -> StoreResult<Vec<StoredFile>>;
    async fn delete_file(&self, id: &str) -> StoreResult<bool>;
}
