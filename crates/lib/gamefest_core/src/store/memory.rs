//! In-process store used by tests and local demos.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{Conflict, DocumentStore, FileStore, StoreResult};
use crate::id::new_id;
use crate::models::auth::{AdminUser, AdminUserUpdate, NewAdminUser};
use crate::models::file::{NewFile, StoredFile};
use crate::models::score::{GameScore, NewScore, rank_scores};
use crate::models::team::{Game, NewTeam, Team, TeamStats, team_name_key};
use crate::store::StoreError;

#[derive(Debug, Default)]
struct State {
    teams: Vec<Team>,
    scores: Vec<GameScore>,
    users: Vec<AdminUser>,
    files: HashMap<String, (StoredFile, Vec<u8>)>,
}

/// Document and file store held entirely in memory.
///
/// Vectors keep insertion order, so "newest first" listings reverse them.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn team_name_exists(&self, team_name: &str) -> StoreResult<bool> {
        let key = team_name_key(team_name);
        let state = self.state.read().await;
        Ok(state.teams.iter().any(|t| team_name_key(&t.team_name) == key))
    }

    async fn insert_team(&self, team: NewTeam) -> StoreResult<Team> {
        let key = team_name_key(&team.team_name);
        let mut state = self.state.write().await;
        if state.teams.iter().any(|t| team_name_key(&t.team_name) == key) {
            return Err(StoreError::Duplicate(Conflict::TeamName));
        }
        let team = Team {
            id: new_id(),
            team_name: team.team_name,
            game: team.game,
            captain: team.captain,
            players: team.players,
            payment_proof: team.payment_proof,
            registered_at: Utc::now(),
        };
        state.teams.push(team.clone());
        Ok(team)
    }

    async fn list_teams(&self) -> StoreResult<Vec<Team>> {
        let state = self.state.read().await;
        Ok(state.teams.iter().rev().cloned().collect())
    }

    async fn find_team(&self, id: &str) -> StoreResult<Option<Team>> {
        let state = self.state.read().await;
        Ok(state.teams.iter().find(|t| t.id == id).cloned())
    }

    async fn delete_team(&self, id: &str) -> StoreResult<Option<Team>> {
        let mut state = self.state.write().await;
        let position = state.teams.iter().position(|t| t.id == id);
        Ok(position.map(|i| state.teams.remove(i)))
    }

    async fn team_stats(&self) -> StoreResult<TeamStats> {
        let state = self.state.read().await;
        let count = |game: Game| state.teams.iter().filter(|t| t.game == game).count() as i64;
        Ok(TeamStats {
            total: state.teams.len() as i64,
            valorant: count(Game::Valorant),
            cod: count(Game::Cod),
        })
    }

    async fn insert_score(&self, score: NewScore) -> StoreResult<GameScore> {
        let score = GameScore {
            id: new_id(),
            player_name: score.player_name,
            score: score.score,
            game_type: score.game_type,
            created_at: Utc::now(),
        };
        self.state.write().await.scores.push(score.clone());
        Ok(score)
    }

    async fn list_scores(&self) -> StoreResult<Vec<GameScore>> {
        let state = self.state.read().await;
        Ok(state.scores.iter().rev().cloned().collect())
    }

    async fn leaderboard(&self, game_type: &str, limit: usize) -> StoreResult<Vec<GameScore>> {
        let state = self.state.read().await;
        let mut scores: Vec<GameScore> = state
            .scores
            .iter()
            .filter(|s| s.game_type == game_type)
            .cloned()
            .collect();
        rank_scores(&mut scores);
        scores.truncate(limit);
        Ok(scores)
    }

    async fn delete_score(&self, id: &str) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        let before = state.scores.len();
        state.scores.retain(|s| s.id != id);
        Ok(state.scores.len() != before)
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<AdminUser>> {
        let state = self.state.read().await;
        Ok(state
            .users
            .iter()
            .find(|u| u.username.eq_ignore_ascii_case(username))
            .cloned())
    }

    async fn find_user(&self, id: &str) -> StoreResult<Option<AdminUser>> {
        let state = self.state.read().await;
        Ok(state.users.iter().find(|u| u.id == id).cloned())
    }

    async fn list_users(&self) -> StoreResult<Vec<AdminUser>> {
        Ok(self.state.read().await.users.clone())
    }

    async fn insert_user(&self, user: NewAdminUser) -> StoreResult<AdminUser> {
        let mut state = self.state.write().await;
        if state
            .users
            .iter()
            .any(|u| u.username.eq_ignore_ascii_case(&user.username))
        {
            return Err(StoreError::Duplicate(Conflict::Username));
        }
        let user = AdminUser {
            id: new_id(),
            username: user.username,
            password_hash: user.password_hash,
            role: user.role,
            is_active: user.is_active,
            created_at: Utc::now(),
            last_login: None,
        };
        state.users.push(user.clone());
        Ok(user)
    }

    async fn update_user(&self, id: &str, update: AdminUserUpdate) -> StoreResult<Option<AdminUser>> {
        let mut state = self.state.write().await;
        let Some(user) = state.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        if let Some(role) = update.role {
            user.role = role;
        }
        if let Some(is_active) = update.is_active {
            user.is_active = is_active;
        }
        if let Some(hash) = update.password_hash {
            user.password_hash = hash;
        }
        Ok(Some(user.clone()))
    }

    async fn record_login(&self, id: &str) -> StoreResult<()> {
        let mut state = self.state.write().await;
        if let Some(user) = state.users.iter_mut().find(|u| u.id == id) {
            user.last_login = Some(Utc::now());
        }
        Ok(())
    }

    async fn delete_user(&self, id: &str) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        let before = state.users.len();
        state.users.retain(|u| u.id != id);
        Ok(state.users.len() != before)
    }
}

#[async_trait]
impl FileStore for MemoryStore {
    async fn put_file(&self, file: NewFile) -> StoreResult<StoredFile> {
        let stored = StoredFile {
            id: new_id(),
            filename: file.filename,
            content_type: file.content_type,
            length: file.data.len() as i64,
            uploaded_at: Utc::now(),
        };
        self.state
            .write()
            .await
            .files
            .insert(stored.id.clone(), (stored.clone(), file.data));
        Ok(stored)
    }

    async fn get_file(&self, id: &str) -> StoreResult<Option<(StoredFile, Vec<u8>)>> {
        Ok(self.state.read().await.files.get(id).cloned())
    }

    async fn list_files(&self) -> StoreResult<Vec<StoredFile>> {
        let state = self.state.read().await;
        let mut files: Vec<StoredFile> = state.files.values().map(|(meta, _)| meta.clone()).collect();
        files.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at).then(b.id.cmp(&a.id)));
        Ok(files)
    }

    async fn delete_file(&self, id: &str) -> StoreResult<bool> {
        Ok(self.state.write().await.files.remove(id).is_some())
    }
}
