use anyhow::Result;
use log::info;
use std::collections::HashMap;

use crate::config::settings::AppConfig;
use crate::database::{self, DbConn};
use crate::rating;

/// Rebuilds every profile's rating and match count by replaying the match log
/// in settlement order. Run after changing rating settings, or to repair
/// drift; an unchanged log always reproduces the same standings.
pub struct ProcessingService {
    config: AppConfig,
}

impl ProcessingService {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn run(&self) -> Result<()> {
        let db_path =
            std::env::var("DATABASE_PATH").unwrap_or_else(|_| "club_ladder.db".to_string());

        info!("=== Starting full rating recompute ===");
        info!("Target DB: {}", db_path);

        let pool = database::create_pool(&db_path)?;
        let mut conn = database::get_connection(&pool)?;
        self.rebuild(&mut conn)?;

        info!("=== Recompute complete ===");
        Ok(())
    }

    pub fn rebuild(&self, conn: &mut DbConn) -> Result<()> {
        conn.execute_batch("BEGIN IMMEDIATE")?;
        match self.replay_log(conn) {
            Ok(()) => {
                conn.execute_batch("COMMIT")?;
                Ok(())
            }
            Err(e) => {
                let _ = conn.execute_batch("ROLLBACK");
                Err(e)
            }
        }
    }

    fn replay_log(&self, conn: &mut DbConn) -> Result<()> {
        let reset = database::profiles::reset_all(conn, self.config.rating.starter_rating)?;
        info!("  → Reset {} profiles to starter rating", reset);

        let matches = database::matches::list_all_ordered(conn)?;
        info!("  → Replaying {} matches", matches.len());

        let standings = self.replay_matches(&matches);

        for (profile_id, standing) in &standings {
            database::profiles::set_standing(
                conn,
                *profile_id,
                standing.rating,
                standing.matches_played,
            )?;
        }
        info!("  → Wrote standings for {} profiles", standings.len());

        Ok(())
    }

    fn replay_matches(
        &self,
        matches: &[crate::domain::MatchRecord],
    ) -> HashMap<i64, Standing> {
        let mut standings: HashMap<i64, Standing> = HashMap::new();
        let starter = self.config.rating.starter_rating;

        for record in matches {
            let winner_id = record.winner_id();
            let loser_id = record.loser_id();

            let winner = standings.get(&winner_id).copied().unwrap_or(Standing {
                rating: starter,
                matches_played: 0,
            });
            let loser = standings.get(&loser_id).copied().unwrap_or(Standing {
                rating: starter,
                matches_played: 0,
            });

            let settled = rating::rate_match(
                winner.rating,
                loser.rating,
                winner.matches_played,
                loser.matches_played,
                &self.config.rating,
            );

            standings.insert(
                winner_id,
                Standing {
                    rating: settled.winner,
                    matches_played: winner.matches_played + 1,
                },
            );
            standings.insert(
                loser_id,
                Standing {
                    rating: settled.loser,
                    matches_played: loser.matches_played + 1,
                },
            );
        }

        standings
    }
}

#[derive(Debug, Clone, Copy)]
struct Standing {
    rating: f64,
    matches_played: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{create_memory_pool, get_connection};
    use crate::services::settlement::{MatchReport, SettlementService};

    #[test]
    fn rebuild_reproduces_incremental_settlement() {
        let pool = create_memory_pool().unwrap();
        let mut conn = get_connection(&pool).unwrap();
        database::setup::init_database(&mut conn).unwrap();

        let config = AppConfig::new();
        let sport = database::sports::upsert_sport(&mut conn, "Padel", "padel").unwrap();
        let a = database::profiles::insert_profile(&mut conn, sport.id, "Ana", 1000.0).unwrap();
        let b = database::profiles::insert_profile(&mut conn, sport.id, "Ben", 1000.0).unwrap();
        let c = database::profiles::insert_profile(&mut conn, sport.id, "Cem", 1000.0).unwrap();

        let settlement = SettlementService::new(config.clone());
        let report = |cs, os| MatchReport {
            challenge_id: None,
            challenger_score: cs,
            opponent_score: os,
        };

        // a beats b, then c beats a, re-reading profiles between matches.
        settlement.settle(&mut conn, &a, &b, &report(3, 1)).unwrap();
        let a_now = database::profiles::find_by_id(&mut conn, a.id).unwrap().unwrap();
        let c_now = database::profiles::find_by_id(&mut conn, c.id).unwrap().unwrap();
        settlement
            .settle(&mut conn, &c_now, &a_now, &report(3, 2))
            .unwrap();

        let expected: Vec<(i64, f64, i32)> = [a.id, b.id, c.id]
            .iter()
            .map(|id| {
                let p = database::profiles::find_by_id(&mut conn, *id).unwrap().unwrap();
                (p.id, p.rating, p.matches_played)
            })
            .collect();

        ProcessingService::new(config).rebuild(&mut conn).unwrap();

        for (id, rating, matches_played) in expected {
            let p = database::profiles::find_by_id(&mut conn, id).unwrap().unwrap();
            assert!((p.rating - rating).abs() < 1e-9);
            assert_eq!(p.matches_played, matches_played);
        }
    }

    #[test]
    fn rebuild_resets_profiles_without_matches() {
        let pool = create_memory_pool().unwrap();
        let mut conn = get_connection(&pool).unwrap();
        database::setup::init_database(&mut conn).unwrap();

        let config = AppConfig::new();
        let sport = database::sports::upsert_sport(&mut conn, "Tennis", "tennis").unwrap();
        let lone =
            database::profiles::insert_profile(&mut conn, sport.id, "Lone", 1000.0).unwrap();
        database::profiles::set_standing(&mut conn, lone.id, 1234.0, 9).unwrap();

        ProcessingService::new(config.clone()).rebuild(&mut conn).unwrap();

        let p = database::profiles::find_by_id(&mut conn, lone.id).unwrap().unwrap();
        assert_eq!(p.rating, config.rating.starter_rating);
        assert_eq!(p.matches_played, 0);
    }
}
