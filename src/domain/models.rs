use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A sport with its own ladder and scoring rules
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sport {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub scoring: ScoringConfig,
}

/// Per-sport scoring configuration. All fields are optional; absent fields
/// fall back to the defaults in `LadderSettings`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub max_challenge_range: Option<u32>,
    pub total_sets: Option<i32>,
    pub win_by: Option<i32>,
    pub notify_on_challenge: bool,
}

/// One participant's standing in one sport's ladder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub id: i64,
    pub sport_id: i64,
    pub display_name: String,
    pub rating: f64,
    pub matches_played: i32,
}

impl PlayerProfile {
    /// A novice has no settled matches yet and gets a widened challenge window.
    pub fn is_novice(&self) -> bool {
        self.matches_played == 0
    }
}

/// A profile paired with its dense rank. Recomputed on every ladder read,
/// never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct RankedProfile {
    pub profile: PlayerProfile,
    pub rank: u32,
}

/// A standing request by a lower-ranked player to play a higher-ranked one
#[derive(Debug, Clone)]
pub struct Challenge {
    pub id: i64,
    pub sport_id: i64,
    pub challenger_id: i64,
    pub opponent_id: i64,
    pub status: ChallengeStatus,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChallengeStatus {
    Pending,
    Accepted,
    Declined,
    Completed,
}

impl ChallengeStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ChallengeStatus::Pending => "pending",
            ChallengeStatus::Accepted => "accepted",
            ChallengeStatus::Declined => "declined",
            ChallengeStatus::Completed => "completed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(ChallengeStatus::Pending),
            "accepted" => Some(ChallengeStatus::Accepted),
            "declined" => Some(ChallengeStatus::Declined),
            "completed" => Some(ChallengeStatus::Completed),
            _ => None,
        }
    }

    /// Open challenges block a duplicate between the same pair.
    pub fn is_open(&self) -> bool {
        matches!(self, ChallengeStatus::Pending | ChallengeStatus::Accepted)
    }
}

/// A settled match. Append-only; `pre_*_rating` columns record what each side
/// held before settlement so the log can be audited and replayed.
#[derive(Debug, Clone)]
pub struct MatchRecord {
    pub id: i64,
    pub sport_id: i64,
    pub challenge_id: Option<i64>,
    pub challenger_id: i64,
    pub opponent_id: i64,
    pub challenger_score: i32,
    pub opponent_score: i32,
    pub pre_challenger_rating: f64,
    pub pre_opponent_rating: f64,
    pub played_at: NaiveDateTime,
}

impl MatchRecord {
    pub fn winner_id(&self) -> i64 {
        if self.challenger_score > self.opponent_score {
            self.challenger_id
        } else {
            self.opponent_id
        }
    }

    pub fn loser_id(&self) -> i64 {
        if self.challenger_score > self.opponent_score {
            self.opponent_id
        } else {
            self.challenger_id
        }
    }
}
