use serde::{Deserialize, Serialize};

pub type RatingValue = f64;

/// How much weight a profile's rating carries, based on settled matches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RatingStatus {
    Novice,      // no settled matches yet
    Provisional, // below the provisional threshold
    Established,
}

impl RatingStatus {
    pub fn from_matches_played(matches: i32, provisional_matches: i32) -> Self {
        if matches == 0 {
            RatingStatus::Novice
        } else if matches < provisional_matches {
            RatingStatus::Provisional
        } else {
            RatingStatus::Established
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            RatingStatus::Novice => "novice",
            RatingStatus::Provisional => "provisional",
            RatingStatus::Established => "established",
        }
    }
}

/// Both sides' ratings after a settled match
#[derive(Debug, Clone, Copy)]
pub struct SettledRatings {
    pub winner: RatingValue,
    pub loser: RatingValue,
}
