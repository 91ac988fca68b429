use anyhow::{Context, Result};
use rusqlite::{params, OptionalExtension};

use crate::domain::{ScoringConfig, Sport};

use super::connection::DbConn;

const SPORT_COLUMNS: &str =
    "id, name, slug, max_challenge_range, total_sets, win_by, notify_on_challenge";

pub fn upsert_sport(conn: &mut DbConn, name: &str, slug: &str) -> Result<Sport> {
    if let Some(existing) = find_by_slug(conn, slug)? {
        return Ok(existing);
    }

    let sql = format!("INSERT INTO sports (name, slug) VALUES (?1, ?2) RETURNING {SPORT_COLUMNS}");

    conn.query_row(&sql, params![name, slug], parse_sport_row)
        .context("Failed to insert new sport")
}

pub fn find_by_slug(conn: &mut DbConn, slug: &str) -> Result<Option<Sport>> {
    let sql = format!("SELECT {SPORT_COLUMNS} FROM sports WHERE slug = ?1");

    conn.query_row(&sql, params![slug], parse_sport_row)
        .optional()
        .context("Failed to query sport by slug")
}

pub fn find_by_id(conn: &mut DbConn, id: i64) -> Result<Option<Sport>> {
    let sql = format!("SELECT {SPORT_COLUMNS} FROM sports WHERE id = ?1");

    conn.query_row(&sql, params![id], parse_sport_row)
        .optional()
        .context("Failed to query sport by id")
}

pub fn list_all(conn: &mut DbConn) -> Result<Vec<Sport>> {
    let sql = format!("SELECT {SPORT_COLUMNS} FROM sports ORDER BY name");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], parse_sport_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn update_scoring(conn: &mut DbConn, id: i64, scoring: &ScoringConfig) -> Result<Sport> {
    let sql = format!(
        "UPDATE sports SET max_challenge_range = ?1, total_sets = ?2, win_by = ?3, notify_on_challenge = ?4 WHERE id = ?5 RETURNING {SPORT_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![
            scoring.max_challenge_range,
            scoring.total_sets,
            scoring.win_by,
            scoring.notify_on_challenge,
            id
        ],
        parse_sport_row,
    )
    .context("Failed to update sport scoring config")
}

fn parse_sport_row(row: &rusqlite::Row) -> rusqlite::Result<Sport> {
    Ok(Sport {
        id: row.get(0)?,
        name: row.get(1)?,
        slug: row.get(2)?,
        scoring: ScoringConfig {
            max_challenge_range: row.get(3)?,
            total_sets: row.get(4)?,
            win_by: row.get(5)?,
            notify_on_challenge: row.get(6)?,
        },
    })
}
