//! Mini-game score models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Game type tag used by the reaction-time mini-game.
pub const REACTION_GAME: &str = "reaction";

/// Maximum number of entries returned by a leaderboard query.
pub const LEADERBOARD_LIMIT: usize = 20;

/// A submitted score.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameScore {
    pub id: String,
    pub player_name: String,
    /// Formatted elapsed time, e.g. `"0.812s"`. Lower is better.
    pub score: String,
    pub game_type: String,
    pub created_at: DateTime<Utc>,
}

/// A validated score submission.
#[derive(Debug, Clone)]
pub struct NewScore {
    pub player_name: String,
    pub score: String,
    pub game_type: String,
}

/// Numeric value of a formatted score, in seconds.
///
/// Accepts a bare number, a number with an `s` suffix, or a number with an
/// `ms` suffix. Returns `None` for anything else, including negative values.
pub fn score_value(score: &str) -> Option<f64> {
    let trimmed = score.trim();
    let (number, scale) = if let Some(ms) = trimmed.strip_suffix("ms") {
        (ms, 1000.0)
    } else if let Some(s) = trimmed.strip_suffix('s') {
        (s, 1.0)
    } else {
        (trimmed, 1.0)
    };
    let value = number.trim().parse::<f64>().ok()? / scale;
    (value.is_finite() && value >= 0.0).then_some(value)
}

/// Order scores best-first: ascending numeric value, unparseable values last,
/// ties broken by submission time.
pub fn rank_scores(scores: &mut [GameScore]) {
    scores.sort_by(|a, b| {
        let va = score_value(&a.score);
        let vb = score_value(&b.score);
        match (va, vb) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        }
        .then(a.created_at.cmp(&b.created_at))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(id: &str, value: &str) -> GameScore {
        GameScore {
            id: id.into(),
            player_name: format!("player-{id}"),
            score: value.into(),
            game_type: REACTION_GAME.into(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn parses_seconds_and_milliseconds() {
        assert_eq!(score_value("0.800s"), Some(0.8));
        assert_eq!(score_value("1.2"), Some(1.2));
        assert_eq!(score_value("950ms"), Some(0.95));
        assert_eq!(score_value(" 0.5 s "), Some(0.5));
    }

    #[test]
    fn rejects_garbage_and_negative() {
        assert_eq!(score_value("fast"), None);
        assert_eq!(score_value(""), None);
        assert_eq!(score_value("-1s"), None);
        assert_eq!(score_value("NaNs"), None);
    }

    #[test]
    fn ranks_numerically_not_lexically() {
        let mut scores = vec![
            score("a", "10.000s"),
            score("b", "1.200s"),
            score("c", "junk"),
            score("d", "0.800s"),
            score("e", "9.500s"),
        ];
        rank_scores(&mut scores);
        let order: Vec<&str> = scores.iter().map(|s| s.score.as_str()).collect();
        assert_eq!(order, ["0.800s", "1.200s", "9.500s", "10.000s", "junk"]);
    }
}
