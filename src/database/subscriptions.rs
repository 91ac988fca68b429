use anyhow::{Context, Result};
use rusqlite::params;

use super::connection::DbConn;
use super::models::SubscriptionRow;

pub fn upsert_subscription(
    conn: &mut DbConn,
    profile_id: i64,
    endpoint: &str,
) -> Result<SubscriptionRow> {
    let sql = "INSERT INTO push_subscriptions (profile_id, endpoint) VALUES (?1, ?2) ON CONFLICT(endpoint) DO UPDATE SET profile_id = ?1 RETURNING id, profile_id, endpoint, created_at";

    conn.query_row(sql, params![profile_id, endpoint], parse_subscription_row)
        .context("Failed to upsert push subscription")
}

pub fn endpoints_for_profile(conn: &mut DbConn, profile_id: i64) -> Result<Vec<String>> {
    let sql = "SELECT endpoint FROM push_subscriptions WHERE profile_id = ?1";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![profile_id], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<String>>>()?;

    Ok(rows)
}

pub fn delete_endpoint(conn: &mut DbConn, endpoint: &str) -> Result<usize> {
    conn.execute(
        "DELETE FROM push_subscriptions WHERE endpoint = ?1",
        params![endpoint],
    )
    .context("Failed to delete push subscription")
}

fn parse_subscription_row(row: &rusqlite::Row) -> rusqlite::Result<SubscriptionRow> {
    Ok(SubscriptionRow {
        id: row.get(0)?,
        profile_id: row.get(1)?,
        endpoint: row.get(2)?,
        created_at: row.get(3)?,
    })
}
