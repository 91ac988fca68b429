pub mod elo;
pub mod types;

pub use elo::{expected_score, rate_match};
pub use types::{RatingStatus, RatingValue, SettledRatings};
