//! Input validation for registrations, scores and admin accounts.
//!
//! Validators take loosely-typed input (everything defaults to empty) and
//! either return a normalized domain value or the full list of field errors,
//! so the client can highlight every problem at once.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::roles::Role;
use crate::models::score::{NewScore, REACTION_GAME, score_value};
use crate::models::team::{Captain, Game, NewTeam, PLAYERS_PER_TEAM, Player};

const TEAM_NAME_MIN: usize = 3;
const TEAM_NAME_MAX: usize = 20;
const PERSON_NAME_MAX: usize = 50;
const PLAYER_NAME_MAX: usize = 30;
const GAME_TYPE_MAX: usize = 30;
const USERNAME_MIN: usize = 3;
const USERNAME_MAX: usize = 30;
const PASSWORD_MIN: usize = 8;

/// A single failed check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Dotted path of the offending field, e.g. `players.2.gamingId`.
    pub field: String,
    pub message: String,
}

/// All failed checks for one input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Validation failed")]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        Self(vec![FieldError {
            field: field.to_string(),
            message: message.into(),
        }])
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|e| e.field.as_str())
    }
}

#[derive(Default)]
struct Collector(Vec<FieldError>);

impl Collector {
    fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    fn length(&mut self, field: &str, label: &str, value: &str, min: usize, max: usize) {
        let len = value.chars().count();
        if len == 0 && min > 0 {
            self.push(field, format!("{label} is required"));
        } else if len < min {
            self.push(field, format!("{label} must be at least {min} characters"));
        } else if len > max {
            self.push(field, format!("{label} must be at most {max} characters"));
        }
    }

    fn finish<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.0.is_empty() {
            Ok(value)
        } else {
            Err(ValidationErrors(self.0))
        }
    }
}

/// Captain fields as submitted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CaptainInput {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Player slot as submitted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlayerInput {
    pub name: String,
    pub gaming_id: String,
    pub valorant_id: Option<String>,
}

/// Team registration as submitted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TeamRegistration {
    pub team_name: String,
    pub game: String,
    pub captain: CaptainInput,
    pub players: Vec<PlayerInput>,
}

/// Validate a registration. The returned team has no payment proof attached.
pub fn validate_team(input: &TeamRegistration) -> Result<NewTeam, ValidationErrors> {
    let mut errors = Collector::default();

    let team_name = input.team_name.trim().to_string();
    errors.length("teamName", "Team name", &team_name, TEAM_NAME_MIN, TEAM_NAME_MAX);

    let game = Game::parse(input.game.trim());
    if game.is_none() {
        errors.push("game", "Game must be either valorant or cod");
    }

    let captain = Captain {
        name: input.captain.name.trim().to_string(),
        email: input.captain.email.trim().to_lowercase(),
        phone: normalize_phone(&input.captain.phone),
    };
    errors.length("captain.name", "Captain name", &captain.name, 2, PERSON_NAME_MAX);
    if !is_valid_email(&captain.email) {
        errors.push("captain.email", "A valid email address is required");
    }
    if !is_valid_phone(&captain.phone) {
        errors.push("captain.phone", "Phone number must have 10 to 15 digits");
    }

    if input.players.len() != PLAYERS_PER_TEAM {
        errors.push("players", format!("Exactly {PLAYERS_PER_TEAM} players are required"));
    }
    let players: Vec<Player> = input
        .players
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let player = Player {
                name: p.name.trim().to_string(),
                gaming_id: p.gaming_id.trim().to_string(),
                valorant_id: p
                    .valorant_id
                    .as_deref()
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(str::to_string),
            };
            errors.length(&format!("players.{i}.name"), "Player name", &player.name, 1, PERSON_NAME_MAX);
            errors.length(
                &format!("players.{i}.gamingId"),
                "Gaming ID",
                &player.gaming_id,
                1,
                PERSON_NAME_MAX,
            );
            player
        })
        .collect();

    if game == Some(Game::Valorant) && players.iter().any(|p| p.valorant_id.is_none()) {
        errors.push(
            "game",
            "Valorant ID is required for all players when registering for Valorant",
        );
    }

    let Some(game) = game else {
        return Err(ValidationErrors(errors.0));
    };
    errors.finish(NewTeam {
        team_name,
        game,
        captain,
        players,
        payment_proof: None,
    })
}

/// Score submission as sent by the mini-game.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScoreSubmission {
    pub player_name: String,
    pub score: String,
    pub game_type: Option<String>,
}

/// Validate a score submission. A missing game type means the reaction game.
pub fn validate_score(input: &ScoreSubmission) -> Result<NewScore, ValidationErrors> {
    let mut errors = Collector::default();

    let player_name = input.player_name.trim().to_string();
    errors.length("playerName", "Player name", &player_name, 1, PLAYER_NAME_MAX);

    let score = input.score.trim().to_string();
    if score.is_empty() {
        errors.push("score", "Score is required");
    } else if score_value(&score).is_none() {
        errors.push("score", "Score must be a time such as 0.812s");
    }

    let game_type = input
        .game_type
        .as_deref()
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .unwrap_or(REACTION_GAME)
        .to_string();
    if !is_valid_game_type(&game_type) {
        errors.push(
            "gameType",
            "Game type may only contain lowercase letters, digits, '-' and '_'",
        );
    }

    errors.finish(NewScore {
        player_name,
        score,
        game_type,
    })
}

/// Whether `value` is an acceptable leaderboard tag.
pub fn is_valid_game_type(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= GAME_TYPE_MAX
        && value
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'_')
}

/// Login form: both fields must be present.
pub fn validate_credentials(username: &str, password: &str) -> Result<(), ValidationErrors> {
    let mut errors = Collector::default();
    if username.trim().is_empty() {
        errors.push("username", "Username is required");
    }
    if password.is_empty() {
        errors.push("password", "Password is required");
    }
    errors.finish(())
}

/// Validate a new admin account, returning the trimmed username and role.
pub fn validate_new_user(
    username: &str,
    password: &str,
    role: &str,
) -> Result<(String, Role), ValidationErrors> {
    let mut errors = Collector::default();

    let username = username.trim().to_string();
    errors.length("username", "Username", &username, USERNAME_MIN, USERNAME_MAX);
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        errors.push(
            "username",
            "Username may only contain letters, digits, '_', '.' and '-'",
        );
    }

    check_password(&mut errors, password);

    let parsed = Role::parse(role.trim());
    if parsed.is_none() {
        errors.push("role", role_message());
    }

    match parsed {
        Some(role) => errors.finish((username, role)),
        None => Err(ValidationErrors(errors.0)),
    }
}

/// Validate a replacement password.
pub fn validate_password(password: &str) -> Result<(), ValidationErrors> {
    let mut errors = Collector::default();
    check_password(&mut errors, password);
    errors.finish(())
}

/// Parse a role sent by the client.
pub fn parse_role(role: &str) -> Result<Role, ValidationErrors> {
    Role::parse(role.trim()).ok_or_else(|| ValidationErrors::single("role", role_message()))
}

fn check_password(errors: &mut Collector, password: &str) {
    if password.chars().count() < PASSWORD_MIN {
        errors.push(
            "password",
            format!("Password must be at least {PASSWORD_MIN} characters"),
        );
    }
}

fn role_message() -> String {
    let roles: Vec<&str> = Role::ALL.iter().map(Role::as_str).collect();
    format!("Role must be one of {}", roles.join(", "))
}

fn normalize_phone(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect()
}

fn is_valid_phone(phone: &str) -> bool {
    let digits = phone.strip_prefix('+').unwrap_or(phone);
    (10..=15).contains(&digits.len()) && digits.bytes().all(|b| b.is_ascii_digit())
}

fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain.split('.').count() >= 2
        && domain.split('.').all(|part| !part.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn players(valorant: bool) -> Vec<PlayerInput> {
        (1..=5)
            .map(|i| PlayerInput {
                name: format!("Player {i}"),
                gaming_id: format!("gid{i}"),
                valorant_id: valorant.then(|| format!("riot{i}#EUW")),
            })
            .collect()
    }

    fn registration(game: &str, valorant_ids: bool) -> TeamRegistration {
        TeamRegistration {
            team_name: "  Alpha ".into(),
            game: game.into(),
            captain: CaptainInput {
                name: "Asha".into(),
                email: "Asha@Uni.edu".into(),
                phone: "+91 98765-43210".into(),
            },
            players: players(valorant_ids),
        }
    }

    #[test]
    fn valid_cod_team_is_normalized() {
        let team = validate_team(&registration("cod", false)).unwrap();
        assert_eq!(team.team_name, "Alpha");
        assert_eq!(team.game, Game::Cod);
        assert_eq!(team.captain.email, "asha@uni.edu");
        assert_eq!(team.captain.phone, "+919876543210");
        assert_eq!(team.players.len(), 5);
        assert!(team.payment_proof.is_none());
    }

    #[test]
    fn valorant_team_requires_every_valorant_id() {
        assert!(validate_team(&registration("valorant", true)).is_ok());

        let mut input = registration("valorant", true);
        input.players[3].valorant_id = Some("   ".into());
        let err = validate_team(&input).unwrap_err();
        assert_eq!(err.fields().collect::<Vec<_>>(), ["game"]);
    }

    #[test]
    fn cod_team_does_not_need_valorant_ids() {
        let team = validate_team(&registration("cod", false)).unwrap();
        assert!(team.players.iter().all(|p| p.valorant_id.is_none()));
    }

    #[test]
    fn team_name_length_is_bounded() {
        let mut input = registration("cod", false);
        input.team_name = "Al".into();
        let err = validate_team(&input).unwrap_err();
        assert_eq!(err.0[0].field, "teamName");

        input.team_name = "x".repeat(21);
        let err = validate_team(&input).unwrap_err();
        assert!(err.0[0].message.contains("at most 20"));
    }

    #[test]
    fn wrong_player_count_and_blank_slots_are_reported() {
        let mut input = registration("cod", false);
        input.players.truncate(4);
        input.players[1].gaming_id.clear();
        let err = validate_team(&input).unwrap_err();
        let fields: Vec<&str> = err.fields().collect();
        assert!(fields.contains(&"players"));
        assert!(fields.contains(&"players.1.gamingId"));
    }

    #[test]
    fn unknown_game_and_bad_contact_collect_all_errors() {
        let mut input = registration("chess", false);
        input.captain.email = "not-an-email".into();
        input.captain.phone = "123".into();
        let err = validate_team(&input).unwrap_err();
        let fields: Vec<&str> = err.fields().collect();
        assert_eq!(fields, ["game", "captain.email", "captain.phone"]);
    }

    #[test]
    fn empty_registration_fails_without_panicking() {
        let err = validate_team(&TeamRegistration::default()).unwrap_err();
        assert!(err.0.len() >= 4);
    }

    #[test]
    fn score_defaults_to_reaction_game() {
        let score = validate_score(&ScoreSubmission {
            player_name: " Kiran ".into(),
            score: "0.812s".into(),
            game_type: None,
        })
        .unwrap();
        assert_eq!(score.player_name, "Kiran");
        assert_eq!(score.game_type, REACTION_GAME);
    }

    #[test]
    fn score_must_be_a_time() {
        let err = validate_score(&ScoreSubmission {
            player_name: "Kiran".into(),
            score: "quick".into(),
            game_type: Some("Reaction Game".into()),
        })
        .unwrap_err();
        assert_eq!(err.fields().collect::<Vec<_>>(), ["score", "gameType"]);
    }

    #[test]
    fn new_user_checks_every_field() {
        let err = validate_new_user("a!", "short", "owner").unwrap_err();
        let fields: Vec<&str> = err.fields().collect();
        assert!(fields.contains(&"username"));
        assert!(fields.contains(&"password"));
        assert!(fields.contains(&"role"));

        let (username, role) = validate_new_user(" board.lead ", "longenough", "elite_board").unwrap();
        assert_eq!(username, "board.lead");
        assert_eq!(role, Role::EliteBoard);
    }

    #[test]
    fn credentials_must_be_present() {
        assert!(validate_credentials("root", "pw").is_ok());
        let err = validate_credentials(" ", "").unwrap_err();
        assert_eq!(err.fields().collect::<Vec<_>>(), ["username", "password"]);
    }
}
