//! PostgreSQL-backed store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;

use super::{Conflict, DocumentStore, FileStore, StoreError, StoreResult};
use crate::auth::roles::Role;
use crate::id::new_id;
use crate::models::auth::{AdminUser, AdminUserUpdate, NewAdminUser};
use crate::models::file::{NewFile, StoredFile};
use crate::models::score::{GameScore, NewScore, score_value};
use crate::models::team::{Captain, FileRef, Game, NewTeam, Player, Team, TeamStats, team_name_key};

const TEAM_COLUMNS: &str = "id, team_name, game, captain_name, captain_email, captain_phone, \
     players, payment_proof_id, payment_proof_filename, payment_proof_content_type, registered_at";

const SCORE_COLUMNS: &str = "id, player_name, score, game_type, created_at";

const USER_COLUMNS: &str =
    "id, username, password_hash, role, is_active, created_at, last_login";

const FILE_COLUMNS: &str = "id, filename, content_type, length, uploaded_at";

/// Document and file store over a PostgreSQL pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct TeamRow {
    id: String,
    team_name: String,
    game: String,
    captain_name: String,
    captain_email: String,
    captain_phone: String,
    players: Json<Vec<Player>>,
    payment_proof_id: Option<String>,
    payment_proof_filename: Option<String>,
    payment_proof_content_type: Option<String>,
    registered_at: DateTime<Utc>,
}

impl TryFrom<TeamRow> for Team {
    type Error = StoreError;

    fn try_from(row: TeamRow) -> Result<Self, Self::Error> {
        let game = Game::parse(&row.game)
            .ok_or_else(|| StoreError::Corrupt(format!("team {}: unknown game {}", row.id, row.game)))?;
        let payment_proof = match (
            row.payment_proof_id,
            row.payment_proof_filename,
            row.payment_proof_content_type,
        ) {
            (Some(file_id), Some(filename), Some(content_type)) => Some(FileRef {
                file_id,
                filename,
                content_type,
            }),
            _ => None,
        };
        Ok(Team {
            id: row.id,
            team_name: row.team_name,
            game,
            captain: Captain {
                name: row.captain_name,
                email: row.captain_email,
                phone: row.captain_phone,
            },
            players: row.players.0,
            payment_proof,
            registered_at: row.registered_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ScoreRow {
    id: String,
    player_name: String,
    score: String,
    game_type: String,
    created_at: DateTime<Utc>,
}

impl From<ScoreRow> for GameScore {
    fn from(row: ScoreRow) -> Self {
        GameScore {
            id: row.id,
            player_name: row.player_name,
            score: row.score,
            game_type: row.game_type,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: String,
    username: String,
    password_hash: String,
    role: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    last_login: Option<DateTime<Utc>>,
}

impl TryFrom<UserRow> for AdminUser {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = Role::parse(&row.role)
            .ok_or_else(|| StoreError::Corrupt(format!("user {}: unknown role {}", row.id, row.role)))?;
        Ok(AdminUser {
            id: row.id,
            username: row.username,
            password_hash: row.password_hash,
            role,
            is_active: row.is_active,
            created_at: row.created_at,
            last_login: row.last_login,
        })
    }
}

#[derive(sqlx::FromRow)]
struct FileRow {
    id: String,
    filename: String,
    content_type: String,
    length: i64,
    uploaded_at: DateTime<Utc>,
}

impl From<FileRow> for StoredFile {
    fn from(row: FileRow) -> Self {
        StoredFile {
            id: row.id,
            filename: row.filename,
            content_type: row.content_type,
            length: row.length,
            uploaded_at: row.uploaded_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct FileDataRow {
    #[sqlx(flatten)]
    meta: FileRow,
    data: Vec<u8>,
}

/// Map a unique-index violation to [`StoreError::Duplicate`].
fn unique_or(e: sqlx::Error, conflict: Conflict) -> StoreError {
    if let sqlx::Error::Database(db) = &e
        && db.is_unique_violation()
    {
        return StoreError::Duplicate(conflict);
    }
    StoreError::Database(e)
}

fn collect_users(rows: Vec<UserRow>) -> StoreResult<Vec<AdminUser>> {
    rows.into_iter().map(AdminUser::try_from).collect()
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn team_name_exists(&self, team_name: &str) -> StoreResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM teams WHERE lower(team_name) = $1)",
        )
        .bind(team_name_key(team_name))
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn insert_team(&self, team: NewTeam) -> StoreResult<Team> {
        let (proof_id, proof_name, proof_type) = match team.payment_proof {
            Some(p) => (Some(p.file_id), Some(p.filename), Some(p.content_type)),
            None => (None, None, None),
        };
        let sql = format!(
            "INSERT INTO teams (id, team_name, game, captain_name, captain_email, captain_phone, \
             players, payment_proof_id, payment_proof_filename, payment_proof_content_type) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING {TEAM_COLUMNS}"
        );
        let row = sqlx::query_as::<_, TeamRow>(&sql)
            .bind(new_id())
            .bind(&team.team_name)
            .bind(team.game.as_str())
            .bind(&team.captain.name)
            .bind(&team.captain.email)
            .bind(&team.captain.phone)
            .bind(Json(&team.players))
            .bind(proof_id)
            .bind(proof_name)
            .bind(proof_type)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| unique_or(e, Conflict::TeamName))?;
        Team::try_from(row)
    }

    async fn list_teams(&self) -> StoreResult<Vec<Team>> {
        let sql = format!("SELECT {TEAM_COLUMNS} FROM teams ORDER BY registered_at DESC, id DESC");
        let rows = sqlx::query_as::<_, TeamRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(Team::try_from).collect()
    }

    async fn find_team(&self, id: &str) -> StoreResult<Option<Team>> {
        let sql = format!("SELECT {TEAM_COLUMNS} FROM teams WHERE id = $1");
        let row = sqlx::query_as::<_, TeamRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Team::try_from).transpose()
    }

    async fn delete_team(&self, id: &str) -> StoreResult<Option<Team>> {
        let sql = format!("DELETE FROM teams WHERE id = $1 RETURNING {TEAM_COLUMNS}");
        let row = sqlx::query_as::<_, TeamRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Team::try_from).transpose()
    }

    async fn team_stats(&self) -> StoreResult<TeamStats> {
        let (total, valorant, cod) = sqlx::query_as::<_, (i64, i64, i64)>(
            "SELECT COUNT(*), \
                    COUNT(*) FILTER (WHERE game = 'valorant'), \
                    COUNT(*) FILTER (WHERE game = 'cod') \
             FROM teams",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(TeamStats {
            total,
            valorant,
            cod,
        })
    }

    async fn insert_score(&self, score: NewScore) -> StoreResult<GameScore> {
        let sql = format!(
            "INSERT INTO game_scores (id, player_name, score, score_value, game_type) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {SCORE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, ScoreRow>(&sql)
            .bind(new_id())
            .bind(&score.player_name)
            .bind(&score.score)
            .bind(score_value(&score.score))
            .bind(&score.game_type)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.into())
    }

    async fn list_scores(&self) -> StoreResult<Vec<GameScore>> {
        let sql = format!("SELECT {SCORE_COLUMNS} FROM game_scores ORDER BY created_at DESC, id DESC");
        let rows = sqlx::query_as::<_, ScoreRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(GameScore::from).collect())
    }

    async fn leaderboard(&self, game_type: &str, limit: usize) -> StoreResult<Vec<GameScore>> {
        let sql = format!(
            "SELECT {SCORE_COLUMNS} FROM game_scores WHERE game_type = $1 \
             ORDER BY score_value ASC NULLS LAST, created_at ASC LIMIT $2"
        );
        let rows = sqlx::query_as::<_, ScoreRow>(&sql)
            .bind(game_type)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(GameScore::from).collect())
    }

    async fn delete_score(&self, id: &str) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM game_scores WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<AdminUser>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM admin_users WHERE lower(username) = lower($1)");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        row.map(AdminUser::try_from).transpose()
    }

    async fn find_user(&self, id: &str) -> StoreResult<Option<AdminUser>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM admin_users WHERE id = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(AdminUser::try_from).transpose()
    }

    async fn list_users(&self) -> StoreResult<Vec<AdminUser>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM admin_users ORDER BY created_at ASC, id ASC");
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        collect_users(rows)
    }

    async fn insert_user(&self, user: NewAdminUser) -> StoreResult<AdminUser> {
        let sql = format!(
            "INSERT INTO admin_users (id, username, password_hash, role, is_active) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {USER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(new_id())
            .bind(&user.username)
            .bind(&user.password_hash)
            .bind(user.role.as_str())
            .bind(user.is_active)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| unique_or(e, Conflict::Username))?;
        AdminUser::try_from(row)
    }

    async fn update_user(&self, id: &str, update: AdminUserUpdate) -> StoreResult<Option<AdminUser>> {
        let sql = format!(
            "UPDATE admin_users SET \
                role = COALESCE($2, role), \
                is_active = COALESCE($3, is_active), \
                password_hash = COALESCE($4, password_hash) \
             WHERE id = $1 RETURNING {USER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .bind(update.role.map(|r| r.as_str()))
            .bind(update.is_active)
            .bind(update.password_hash)
            .fetch_optional(&self.pool)
            .await?;
        row.map(AdminUser::try_from).transpose()
    }

    async fn record_login(&self, id: &str) -> StoreResult<()> {
        sqlx::query("UPDATE admin_users SET last_login = now() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_user(&self, id: &str) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM admin_users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl FileStore for PgStore {
    async fn put_file(&self, file: NewFile) -> StoreResult<StoredFile> {
        let sql = format!(
            "INSERT INTO uploaded_files (id, filename, content_type, length, data) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {FILE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, FileRow>(&sql)
            .bind(new_id())
            .bind(&file.filename)
            .bind(&file.content_type)
            .bind(file.data.len() as i64)
            .bind(&file.data)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.into())
    }

    async fn get_file(&self, id: &str) -> StoreResult<Option<(StoredFile, Vec<u8>)>> {
        let sql = format!("SELECT {FILE_COLUMNS}, data FROM uploaded_files WHERE id = $1");
        let row = sqlx::query_as::<_, FileDataRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| (r.meta.into(), r.data)))
    }

    async fn list_files(&self) -> StoreResult<Vec<StoredFile>> {
        let sql = format!("SELECT {FILE_COLUMNS} FROM uploaded_files ORDER BY uploaded_at DESC, id DESC");
        let rows = sqlx::query_as::<_, FileRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(StoredFile::from).collect())
    }

    async fn delete_file(&self, id: &str) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM uploaded_files WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
