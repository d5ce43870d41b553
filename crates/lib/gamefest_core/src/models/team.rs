//! Team registration models.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Every team registers exactly this many players.
pub const PLAYERS_PER_TEAM: usize = 5;

/// Tournament game a team registers for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Game {
    Valorant,
    Cod,
}

impl Game {
    pub const ALL: [Game; 2] = [Game::Valorant, Game::Cod];

    pub fn as_str(&self) -> &'static str {
        match self {
            Game::Valorant => "valorant",
            Game::Cod => "cod",
        }
    }

    /// Parse a game tag. Matching is exact; the client always sends lowercase.
    pub fn parse(value: &str) -> Option<Game> {
        Self::ALL.into_iter().find(|g| g.as_str() == value)
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Team captain contact details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Captain {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// One of the five player slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub name: String,
    pub gaming_id: String,
    /// Riot ID; required for every player of a Valorant team.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valorant_id: Option<String>,
}

/// Reference to an uploaded payment-proof file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRef {
    pub file_id: String,
    pub filename: String,
    pub content_type: String,
}

/// A registered team.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: String,
    pub team_name: String,
    pub game: Game,
    pub captain: Captain,
    pub players: Vec<Player>,
    pub payment_proof: Option<FileRef>,
    pub registered_at: DateTime<Utc>,
}

/// A validated registration ready to be inserted.
#[derive(Debug, Clone)]
pub struct NewTeam {
    pub team_name: String,
    pub game: Game,
    pub captain: Captain,
    pub players: Vec<Player>,
    pub payment_proof: Option<FileRef>,
}

/// Registration counts per game.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamStats {
    pub total: i64,
    pub valorant: i64,
    pub cod: i64,
}

/// Key used for case-insensitive team name uniqueness.
pub fn team_name_key(name: &str) -> String {
    name.trim().to_lowercase()
}
