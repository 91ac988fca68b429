use anyhow::{bail, Result};
use chrono::Utc;
use log::info;

use crate::config::settings::AppConfig;
use crate::database::{self, DbConn};
use crate::domain::{Challenge, ChallengeStatus, MatchRecord, PlayerProfile, ScoringConfig};
use crate::rating;

/// A reported result, already resolved to profiles by the caller
#[derive(Debug, Clone)]
pub struct MatchReport {
    pub challenge_id: Option<i64>,
    pub challenger_score: i32,
    pub opponent_score: i32,
}

/// Everything a settled match changed
#[derive(Debug)]
pub struct SettlementOutcome {
    pub match_record: MatchRecord,
    pub challenger: PlayerProfile,
    pub opponent: PlayerProfile,
    pub winner_id: i64,
}

/// Checks a reported score line against the sport's scoring rules. Returns a
/// human-readable reason when the report is not settleable.
pub fn validate_scores(
    scoring: &ScoringConfig,
    challenger_score: i32,
    opponent_score: i32,
) -> std::result::Result<(), String> {
    if challenger_score < 0 || opponent_score < 0 {
        return Err("Scores cannot be negative".to_string());
    }
    if challenger_score == opponent_score {
        return Err("Drawn results cannot be settled on a ladder".to_string());
    }
    if let Some(total_sets) = scoring.total_sets {
        if challenger_score + opponent_score > total_sets {
            return Err(format!(
                "Score line exceeds the configured {} sets",
                total_sets
            ));
        }
    }
    if let Some(win_by) = scoring.win_by {
        if (challenger_score - opponent_score).abs() < win_by {
            return Err(format!("Winner must lead by at least {}", win_by));
        }
    }
    Ok(())
}

/// Applies a validated match report: records the match, moves both ratings,
/// bumps both match counts, and completes the linked challenge. This is the
/// only code path that mutates ratings. Notification dispatch happens outside,
/// after the transaction commits.
pub struct SettlementService {
    config: AppConfig,
}

impl SettlementService {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn settle(
        &self,
        conn: &mut DbConn,
        challenger: &PlayerProfile,
        opponent: &PlayerProfile,
        report: &MatchReport,
    ) -> Result<SettlementOutcome> {
        conn.execute_batch("BEGIN IMMEDIATE")?;
        match self.apply(conn, challenger, opponent, report) {
            Ok(outcome) => {
                conn.execute_batch("COMMIT")?;
                info!(
                    "Settled match {} in sport {}: {} beat {}",
                    outcome.match_record.id,
                    outcome.match_record.sport_id,
                    outcome.winner_id,
                    outcome.match_record.loser_id()
                );
                Ok(outcome)
            }
            Err(e) => {
                let _ = conn.execute_batch("ROLLBACK");
                Err(e)
            }
        }
    }

    fn apply(
        &self,
        conn: &mut DbConn,
        challenger: &PlayerProfile,
        opponent: &PlayerProfile,
        report: &MatchReport,
    ) -> Result<SettlementOutcome> {
        let challenger_won = report.challenger_score > report.opponent_score;

        let match_record = database::matches::insert_match(
            conn,
            challenger.sport_id,
            report.challenge_id,
            challenger.id,
            opponent.id,
            report.challenger_score,
            report.opponent_score,
            challenger.rating,
            opponent.rating,
            Utc::now().naive_utc(),
        )?;

        let (new_challenger_rating, new_opponent_rating) =
            self.settled_ratings(challenger, opponent, challenger_won);

        let challenger =
            database::profiles::apply_settlement(conn, challenger.id, new_challenger_rating)?;
        let opponent = database::profiles::apply_settlement(conn, opponent.id, new_opponent_rating)?;

        if let Some(challenge_id) = report.challenge_id {
            self.complete_challenge(conn, challenge_id)?;
        }

        let winner_id = if challenger_won {
            challenger.id
        } else {
            opponent.id
        };

        Ok(SettlementOutcome {
            match_record,
            challenger,
            opponent,
            winner_id,
        })
    }

    fn settled_ratings(
        &self,
        challenger: &PlayerProfile,
        opponent: &PlayerProfile,
        challenger_won: bool,
    ) -> (f64, f64) {
        let (winner, loser) = if challenger_won {
            (challenger, opponent)
        } else {
            (opponent, challenger)
        };

        let settled = rating::rate_match(
            winner.rating,
            loser.rating,
            winner.matches_played,
            loser.matches_played,
            &self.config.rating,
        );

        if challenger_won {
            (settled.winner, settled.loser)
        } else {
            (settled.loser, settled.winner)
        }
    }

    fn complete_challenge(&self, conn: &mut DbConn, challenge_id: i64) -> Result<Challenge> {
        let challenge = database::challenges::find_by_id(conn, challenge_id)?;
        match challenge {
            Some(c) if c.status.is_open() => {
                database::challenges::update_status(conn, c.id, ChallengeStatus::Completed)
            }
            Some(c) => bail!("Challenge {} is already {}", c.id, c.status.as_str()),
            None => bail!("Challenge {} not found during settlement", challenge_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{create_memory_pool, get_connection};

    fn seeded_conn() -> (crate::database::DbPool, DbConn) {
        let pool = create_memory_pool().unwrap();
        let mut conn = get_connection(&pool).unwrap();
        database::setup::init_database(&mut conn).unwrap();
        (pool, conn)
    }

    fn seed_profiles(conn: &mut DbConn) -> (PlayerProfile, PlayerProfile) {
        let sport = database::sports::upsert_sport(conn, "Squash", "squash").unwrap();
        let a = database::profiles::insert_profile(conn, sport.id, "Asha", 1000.0).unwrap();
        let b = database::profiles::insert_profile(conn, sport.id, "Bogdan", 1000.0).unwrap();
        (a, b)
    }

    #[test]
    fn settling_moves_ratings_and_counts_the_match() {
        let (_pool, mut conn) = seeded_conn();
        let (challenger, opponent) = seed_profiles(&mut conn);
        let service = SettlementService::new(AppConfig::new());

        let report = MatchReport {
            challenge_id: None,
            challenger_score: 3,
            opponent_score: 1,
        };
        let outcome = service
            .settle(&mut conn, &challenger, &opponent, &report)
            .unwrap();

        assert_eq!(outcome.winner_id, challenger.id);
        assert!(outcome.challenger.rating > 1000.0);
        assert!(outcome.opponent.rating < 1000.0);
        assert_eq!(outcome.challenger.matches_played, 1);
        assert_eq!(outcome.opponent.matches_played, 1);
        assert_eq!(outcome.match_record.pre_challenger_rating, 1000.0);
        assert_eq!(outcome.match_record.pre_opponent_rating, 1000.0);
    }

    #[test]
    fn losing_challenger_drops_rating() {
        let (_pool, mut conn) = seeded_conn();
        let (challenger, opponent) = seed_profiles(&mut conn);
        let service = SettlementService::new(AppConfig::new());

        let report = MatchReport {
            challenge_id: None,
            challenger_score: 0,
            opponent_score: 3,
        };
        let outcome = service
            .settle(&mut conn, &challenger, &opponent, &report)
            .unwrap();

        assert_eq!(outcome.winner_id, opponent.id);
        assert!(outcome.challenger.rating < 1000.0);
        assert!(outcome.opponent.rating > 1000.0);
    }

    #[test]
    fn settling_a_challenge_completes_it() {
        let (_pool, mut conn) = seeded_conn();
        let (challenger, opponent) = seed_profiles(&mut conn);
        let challenge = database::challenges::insert_challenge(
            &mut conn,
            challenger.sport_id,
            challenger.id,
            opponent.id,
        )
        .unwrap();
        let service = SettlementService::new(AppConfig::new());

        let report = MatchReport {
            challenge_id: Some(challenge.id),
            challenger_score: 3,
            opponent_score: 2,
        };
        service
            .settle(&mut conn, &challenger, &opponent, &report)
            .unwrap();

        let stored = database::challenges::find_by_id(&mut conn, challenge.id)
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, ChallengeStatus::Completed);
    }

    #[test]
    fn settlement_against_a_closed_challenge_rolls_back() {
        let (_pool, mut conn) = seeded_conn();
        let (challenger, opponent) = seed_profiles(&mut conn);
        let challenge = database::challenges::insert_challenge(
            &mut conn,
            challenger.sport_id,
            challenger.id,
            opponent.id,
        )
        .unwrap();
        database::challenges::update_status(&mut conn, challenge.id, ChallengeStatus::Declined)
            .unwrap();
        let service = SettlementService::new(AppConfig::new());

        let report = MatchReport {
            challenge_id: Some(challenge.id),
            challenger_score: 3,
            opponent_score: 2,
        };
        let result = service.settle(&mut conn, &challenger, &opponent, &report);
        assert!(result.is_err());

        // Nothing from the aborted settlement may stick.
        let unchanged = database::profiles::find_by_id(&mut conn, challenger.id)
            .unwrap()
            .unwrap();
        assert_eq!(unchanged.rating, 1000.0);
        assert_eq!(unchanged.matches_played, 0);
        assert!(database::matches::list_recent_for_profile(&mut conn, challenger.id, 10)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn validate_scores_rejects_draws_and_bad_margins() {
        let scoring = ScoringConfig {
            total_sets: Some(5),
            win_by: Some(2),
            ..ScoringConfig::default()
        };

        assert!(validate_scores(&scoring, 3, 1).is_ok());
        assert!(validate_scores(&scoring, 2, 2).is_err());
        assert!(validate_scores(&scoring, 3, 2).is_err()); // margin below win_by
        assert!(validate_scores(&scoring, 4, 2).is_err()); // more sets than configured
        assert!(validate_scores(&scoring, -1, 2).is_err());
    }

    #[test]
    fn validate_scores_without_config_only_rejects_draws() {
        let scoring = ScoringConfig::default();
        assert!(validate_scores(&scoring, 11, 9).is_ok());
        assert!(validate_scores(&scoring, 7, 7).is_err());
    }
}
