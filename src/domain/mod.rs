pub mod models;

pub use models::{
    Challenge, ChallengeStatus, MatchRecord, PlayerProfile, RankedProfile, ScoringConfig, Sport,
};
