use serde::{Deserialize, Serialize};

use crate::domain::{Challenge, MatchRecord, PlayerProfile, RankedProfile, Sport};
use crate::rating::{self, RatingStatus};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SportSummary {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub max_challenge_range: Option<u32>,
    pub total_sets: Option<i32>,
    pub win_by: Option<i32>,
    pub notify_on_challenge: bool,
}

impl SportSummary {
    pub fn from_sport(sport: Sport) -> Self {
        Self {
            id: sport.id,
            name: sport.name,
            slug: sport.slug,
            max_challenge_range: sport.scoring.max_challenge_range,
            total_sets: sport.scoring.total_sets,
            win_by: sport.scoring.win_by,
            notify_on_challenge: sport.scoring.notify_on_challenge,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LadderEntry {
    pub rank: u32,
    pub profile_id: i64,
    pub display_name: String,
    pub rating: f64,
    pub matches_played: i32,
    pub status: String,
}

impl LadderEntry {
    pub fn from_ranked(entry: RankedProfile, provisional_matches: i32) -> Self {
        let status = RatingStatus::from_matches_played(
            entry.profile.matches_played,
            provisional_matches,
        );
        Self {
            rank: entry.rank,
            profile_id: entry.profile.id,
            display_name: entry.profile.display_name,
            rating: entry.profile.rating,
            matches_played: entry.profile.matches_played,
            status: status.as_str().to_string(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LadderResponse {
    pub sport: String,
    pub entries: Vec<LadderEntry>,
    pub total: usize,
}

/// An eligible opponent, with the challenger's odds against them
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeTarget {
    pub rank: u32,
    pub profile_id: i64,
    pub display_name: String,
    pub rating: f64,
    pub matches_played: i32,
    pub status: String,
    pub win_probability: f64,
}

impl ChallengeTarget {
    pub fn from_ranked(
        entry: RankedProfile,
        challenger_rating: f64,
        provisional_matches: i32,
    ) -> Self {
        let status = RatingStatus::from_matches_played(
            entry.profile.matches_played,
            provisional_matches,
        );
        let win_probability = rating::expected_score(challenger_rating, entry.profile.rating);
        Self {
            rank: entry.rank,
            profile_id: entry.profile.id,
            display_name: entry.profile.display_name,
            rating: entry.profile.rating,
            matches_played: entry.profile.matches_played,
            status: status.as_str().to_string(),
            win_probability,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeableResponse {
    pub profile_id: i64,
    pub entries: Vec<ChallengeTarget>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileCreated {
    pub profile_id: i64,
    pub sport_id: i64,
    pub display_name: String,
    pub rating: f64,
    pub matches_played: i32,
    pub status: String,
}

impl ProfileCreated {
    pub fn from_profile(profile: PlayerProfile, provisional_matches: i32) -> Self {
        let status =
            RatingStatus::from_matches_played(profile.matches_played, provisional_matches);
        Self {
            profile_id: profile.id,
            sport_id: profile.sport_id,
            display_name: profile.display_name,
            rating: profile.rating,
            matches_played: profile.matches_played,
            status: status.as_str().to_string(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSummary {
    pub match_id: i64,
    pub challenger_id: i64,
    pub opponent_id: i64,
    pub challenger_score: i32,
    pub opponent_score: i32,
    pub played_at: String,
}

impl MatchSummary {
    pub fn from_record(record: &MatchRecord) -> Self {
        Self {
            match_id: record.id,
            challenger_id: record.challenger_id,
            opponent_id: record.opponent_id,
            challenger_score: record.challenger_score,
            opponent_score: record.opponent_score,
            played_at: record.played_at.to_string(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeSummary {
    pub challenge_id: i64,
    pub sport_id: i64,
    pub challenger_id: i64,
    pub opponent_id: i64,
    pub status: String,
    pub created_at: String,
}

impl ChallengeSummary {
    pub fn from_challenge(challenge: &Challenge) -> Self {
        Self {
            challenge_id: challenge.id,
            sport_id: challenge.sport_id,
            challenger_id: challenge.challenger_id,
            opponent_id: challenge.opponent_id,
            status: challenge.status.as_str().to_string(),
            created_at: challenge.created_at.to_string(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDetail {
    pub profile_id: i64,
    pub sport_id: i64,
    pub display_name: String,
    pub rating: f64,
    pub rank: Option<u32>,
    pub matches_played: i32,
    pub status: String,
    pub recent_matches: Vec<MatchSummary>,
    pub open_challenges: Vec<ChallengeSummary>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchReportResponse {
    pub match_id: i64,
    pub winner_id: i64,
    pub challenger_rating: f64,
    pub opponent_rating: f64,
    pub challenger_delta: f64,
    pub opponent_delta: f64,
}

// --- Request bodies ---

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProfileRequest {
    pub display_name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChallengeRequest {
    pub challenger_id: i64,
    pub opponent_id: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RespondChallengeRequest {
    pub action: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMatchRequest {
    pub challenge_id: Option<i64>,
    pub challenger_id: i64,
    pub opponent_id: i64,
    pub challenger_score: i32,
    pub opponent_score: i32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubscriptionRequest {
    pub profile_id: i64,
    pub endpoint: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSubscriptionRequest {
    pub endpoint: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateScoringRequest {
    pub max_challenge_range: Option<u32>,
    pub total_sets: Option<i32>,
    pub win_by: Option<i32>,
    #[serde(default)]
    pub notify_on_challenge: bool,
}
