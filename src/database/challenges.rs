use anyhow::{anyhow, Context, Result};
use chrono::NaiveDateTime;
use rusqlite::{params, OptionalExtension};

use crate::domain::{Challenge, ChallengeStatus};

use super::connection::DbConn;

const CHALLENGE_COLUMNS: &str = "id, sport_id, challenger_id, opponent_id, status, created_at";

pub fn insert_challenge(
    conn: &mut DbConn,
    sport_id: i64,
    challenger_id: i64,
    opponent_id: i64,
) -> Result<Challenge> {
    let sql = format!(
        "INSERT INTO challenges (sport_id, challenger_id, opponent_id) VALUES (?1, ?2, ?3) RETURNING {CHALLENGE_COLUMNS}"
    );

    let row = conn
        .query_row(
            &sql,
            params![sport_id, challenger_id, opponent_id],
            parse_challenge_row,
        )
        .context("Failed to insert challenge")?;

    into_challenge(row)
}

pub fn find_by_id(conn: &mut DbConn, id: i64) -> Result<Option<Challenge>> {
    let sql = format!("SELECT {CHALLENGE_COLUMNS} FROM challenges WHERE id = ?1");

    let row = conn
        .query_row(&sql, params![id], parse_challenge_row)
        .optional()
        .context("Failed to query challenge by id")?;

    row.map(into_challenge).transpose()
}

/// An open (pending or accepted) challenge between the pair, in either
/// direction. Blocks duplicates.
pub fn find_open_between(
    conn: &mut DbConn,
    first_id: i64,
    second_id: i64,
) -> Result<Option<Challenge>> {
    let sql = format!(
        "SELECT {CHALLENGE_COLUMNS} FROM challenges WHERE status IN ('pending', 'accepted') AND ((challenger_id = ?1 AND opponent_id = ?2) OR (challenger_id = ?2 AND opponent_id = ?1)) LIMIT 1"
    );

    let row = conn
        .query_row(&sql, params![first_id, second_id], parse_challenge_row)
        .optional()
        .context("Failed to query open challenge between profiles")?;

    row.map(into_challenge).transpose()
}

pub fn list_open_for_profile(conn: &mut DbConn, profile_id: i64) -> Result<Vec<Challenge>> {
    let sql = format!(
        "SELECT {CHALLENGE_COLUMNS} FROM challenges WHERE status IN ('pending', 'accepted') AND (challenger_id = ?1 OR opponent_id = ?1) ORDER BY created_at DESC"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![profile_id], parse_challenge_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    rows.into_iter().map(into_challenge).collect()
}

pub fn update_status(conn: &mut DbConn, id: i64, status: ChallengeStatus) -> Result<Challenge> {
    let sql = format!(
        "UPDATE challenges SET status = ?1 WHERE id = ?2 RETURNING {CHALLENGE_COLUMNS}"
    );

    let row = conn
        .query_row(&sql, params![status.as_str(), id], parse_challenge_row)
        .context("Failed to update challenge status")?;

    into_challenge(row)
}

// Status lands as TEXT; keep the raw row and convert once, so a corrupt
// status value surfaces as an error instead of a silent default.
struct ChallengeRow {
    id: i64,
    sport_id: i64,
    challenger_id: i64,
    opponent_id: i64,
    status: String,
    created_at: NaiveDateTime,
}

fn parse_challenge_row(row: &rusqlite::Row) -> rusqlite::Result<ChallengeRow> {
    Ok(ChallengeRow {
        id: row.get(0)?,
        sport_id: row.get(1)?,
        challenger_id: row.get(2)?,
        opponent_id: row.get(3)?,
        status: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn into_challenge(row: ChallengeRow) -> Result<Challenge> {
    let status = ChallengeStatus::parse(&row.status)
        .ok_or_else(|| anyhow!("Unknown challenge status: {}", row.status))?;

    Ok(Challenge {
        id: row.id,
        sport_id: row.sport_id,
        challenger_id: row.challenger_id,
        opponent_id: row.opponent_id,
        status,
        created_at: row.created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{self, create_memory_pool, get_connection};

    fn seeded_pair() -> (crate::database::DbPool, DbConn, i64, i64, i64) {
        let pool = create_memory_pool().unwrap();
        let mut conn = get_connection(&pool).unwrap();
        database::setup::init_database(&mut conn).unwrap();
        let sport = database::sports::upsert_sport(&mut conn, "Tennis", "tennis").unwrap();
        let a = database::profiles::insert_profile(&mut conn, sport.id, "A", 1000.0).unwrap();
        let b = database::profiles::insert_profile(&mut conn, sport.id, "B", 1000.0).unwrap();
        (pool, conn, sport.id, a.id, b.id)
    }

    #[test]
    fn new_challenges_start_pending() {
        let (_pool, mut conn, sport_id, a, b) = seeded_pair();
        let challenge = insert_challenge(&mut conn, sport_id, a, b).unwrap();
        assert_eq!(challenge.status, ChallengeStatus::Pending);
    }

    #[test]
    fn open_challenge_lookup_matches_either_direction() {
        let (_pool, mut conn, sport_id, a, b) = seeded_pair();
        insert_challenge(&mut conn, sport_id, a, b).unwrap();

        assert!(find_open_between(&mut conn, a, b).unwrap().is_some());
        assert!(find_open_between(&mut conn, b, a).unwrap().is_some());
    }

    #[test]
    fn closed_challenges_do_not_block_new_ones() {
        let (_pool, mut conn, sport_id, a, b) = seeded_pair();
        let challenge = insert_challenge(&mut conn, sport_id, a, b).unwrap();
        update_status(&mut conn, challenge.id, ChallengeStatus::Declined).unwrap();

        assert!(find_open_between(&mut conn, a, b).unwrap().is_none());
    }
}
