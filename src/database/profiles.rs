use anyhow::{Context, Result};
use rusqlite::{params, OptionalExtension};

use crate::domain::PlayerProfile;

use super::connection::DbConn;

const PROFILE_COLUMNS: &str = "id, sport_id, display_name, rating, matches_played";

pub fn insert_profile(
    conn: &mut DbConn,
    sport_id: i64,
    display_name: &str,
    starter_rating: f64,
) -> Result<PlayerProfile> {
    let sql = format!(
        "INSERT INTO profiles (sport_id, display_name, rating) VALUES (?1, ?2, ?3) RETURNING {PROFILE_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![sport_id, display_name, starter_rating],
        parse_profile_row,
    )
    .context("Failed to insert new profile")
}

pub fn find_by_id(conn: &mut DbConn, id: i64) -> Result<Option<PlayerProfile>> {
    let sql = format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = ?1");

    conn.query_row(&sql, params![id], parse_profile_row)
        .optional()
        .context("Failed to query profile by id")
}

/// The ladder read: every profile of the sport, best rating first. Ties break
/// by id so the order is stable, which the rank calculator's sort-order
/// precondition relies on.
pub fn list_by_sport_ranked(conn: &mut DbConn, sport_id: i64) -> Result<Vec<PlayerProfile>> {
    let sql =
        format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE sport_id = ?1 ORDER BY rating DESC, id ASC");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![sport_id], parse_profile_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

/// Writes a settled rating and counts the match. The only mutation path for
/// `rating` and `matches_played`.
pub fn apply_settlement(conn: &mut DbConn, id: i64, rating: f64) -> Result<PlayerProfile> {
    let sql = format!(
        "UPDATE profiles SET rating = ?1, matches_played = matches_played + 1 WHERE id = ?2 RETURNING {PROFILE_COLUMNS}"
    );

    conn.query_row(&sql, params![rating, id], parse_profile_row)
        .context("Failed to apply settlement to profile")
}

/// Replay write-back: overwrites the whole standing at once.
pub fn set_standing(
    conn: &mut DbConn,
    id: i64,
    rating: f64,
    matches_played: i32,
) -> Result<PlayerProfile> {
    let sql = format!(
        "UPDATE profiles SET rating = ?1, matches_played = ?2 WHERE id = ?3 RETURNING {PROFILE_COLUMNS}"
    );

    conn.query_row(&sql, params![rating, matches_played, id], parse_profile_row)
        .context("Failed to set profile standing")
}

/// Puts every profile back to the starter rating with no matches counted.
/// Used by the full recompute before replaying the match log.
pub fn reset_all(conn: &mut DbConn, starter_rating: f64) -> Result<usize> {
    conn.execute(
        "UPDATE profiles SET rating = ?1, matches_played = 0",
        params![starter_rating],
    )
    .context("Failed to reset profiles")
}

fn parse_profile_row(row: &rusqlite::Row) -> rusqlite::Result<PlayerProfile> {
    Ok(PlayerProfile {
        id: row.get(0)?,
        sport_id: row.get(1)?,
        display_name: row.get(2)?,
        rating: row.get(3)?,
        matches_played: row.get(4)?,
    })
}
