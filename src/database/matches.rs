use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rusqlite::params;

use crate::domain::MatchRecord;

use super::connection::DbConn;

const MATCH_COLUMNS: &str = "id, sport_id, challenge_id, challenger_id, opponent_id, challenger_score, opponent_score, pre_challenger_rating, pre_opponent_rating, played_at";

#[allow(clippy::too_many_arguments)]
pub fn insert_match(
    conn: &mut DbConn,
    sport_id: i64,
    challenge_id: Option<i64>,
    challenger_id: i64,
    opponent_id: i64,
    challenger_score: i32,
    opponent_score: i32,
    pre_challenger_rating: f64,
    pre_opponent_rating: f64,
    played_at: NaiveDateTime,
) -> Result<MatchRecord> {
    let sql = format!(
        "INSERT INTO matches (sport_id, challenge_id, challenger_id, opponent_id, challenger_score, opponent_score, pre_challenger_rating, pre_opponent_rating, played_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9) RETURNING {MATCH_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![
            sport_id,
            challenge_id,
            challenger_id,
            opponent_id,
            challenger_score,
            opponent_score,
            pre_challenger_rating,
            pre_opponent_rating,
            played_at
        ],
        parse_match_row,
    )
    .context("Failed to insert match")
}

/// Opponents the profile has faced since `since`, for the rematch cooldown.
pub fn recent_opponent_ids(
    conn: &mut DbConn,
    profile_id: i64,
    since: NaiveDateTime,
) -> Result<Vec<i64>> {
    let sql = "
        SELECT DISTINCT CASE WHEN challenger_id = ?1 THEN opponent_id ELSE challenger_id END
        FROM matches
        WHERE (challenger_id = ?1 OR opponent_id = ?1) AND played_at >= ?2
    ";

    let mut stmt = crate::errors::with_db_context(conn.prepare(sql), "prepare cooldown query")?;
    let rows = stmt
        .query_map(params![profile_id, since], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<i64>>>()?;

    Ok(rows)
}

pub fn list_recent_for_profile(
    conn: &mut DbConn,
    profile_id: i64,
    limit: usize,
) -> Result<Vec<MatchRecord>> {
    let sql = format!(
        "SELECT {MATCH_COLUMNS} FROM matches WHERE challenger_id = ?1 OR opponent_id = ?1 ORDER BY played_at DESC, id DESC LIMIT ?2"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![profile_id, limit as i64], parse_match_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

/// The whole match log in settlement order, for the full recompute replay.
pub fn list_all_ordered(conn: &mut DbConn) -> Result<Vec<MatchRecord>> {
    let sql = format!("SELECT {MATCH_COLUMNS} FROM matches ORDER BY played_at ASC, id ASC");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], parse_match_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

fn parse_match_row(row: &rusqlite::Row) -> rusqlite::Result<MatchRecord> {
    Ok(MatchRecord {
        id: row.get(0)?,
        sport_id: row.get(1)?,
        challenge_id: row.get(2)?,
        challenger_id: row.get(3)?,
        opponent_id: row.get(4)?,
        challenger_score: row.get(5)?,
        opponent_score: row.get(6)?,
        pre_challenger_rating: row.get(7)?,
        pre_opponent_rating: row.get(8)?,
        played_at: row.get(9)?,
    })
}
