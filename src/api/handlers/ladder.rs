use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::{Duration, Utc};
use std::collections::HashSet;
use std::sync::Arc;

use crate::api::models::{ChallengeTarget, ChallengeableResponse, LadderEntry, LadderResponse};
use crate::config::settings::LadderSettings;
use crate::database::{self, DbConn};
use crate::domain::{PlayerProfile, RankedProfile, Sport};
use crate::ladder;

use super::AppState;

pub async fn get_ladder(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> impl IntoResponse {
    let mut conn = match state.pool.get() {
        Ok(conn) => conn,
        Err(_) => return (StatusCode::INTERNAL_SERVER_ERROR, "DB Connection Error").into_response(),
    };

    let sport = match database::sports::find_by_slug(&mut conn, &slug) {
        Ok(Some(sport)) => sport,
        Ok(None) => return (StatusCode::NOT_FOUND, format!("Unknown sport: {}", slug)).into_response(),
        Err(e) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, format!("Query Error: {}", e))
                .into_response()
        }
    };

    let players = match database::profiles::list_by_sport_ranked(&mut conn, sport.id) {
        Ok(players) => players,
        Err(e) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, format!("Query Error: {}", e))
                .into_response()
        }
    };

    let provisional_matches = state.config.rating.provisional_matches;
    let entries: Vec<LadderEntry> = ladder::calculate_ranks(&players)
        .into_iter()
        .map(|r| LadderEntry::from_ranked(r, provisional_matches))
        .collect();

    Json(LadderResponse {
        sport: sport.slug,
        total: entries.len(),
        entries,
    })
    .into_response()
}

pub async fn get_challengeable(
    State(state): State<Arc<AppState>>,
    Path((slug, profile_id)): Path<(String, i64)>,
) -> impl IntoResponse {
    let mut conn = match state.pool.get() {
        Ok(conn) => conn,
        Err(_) => return (StatusCode::INTERNAL_SERVER_ERROR, "DB Connection Error").into_response(),
    };

    let sport = match database::sports::find_by_slug(&mut conn, &slug) {
        Ok(Some(sport)) => sport,
        Ok(None) => return (StatusCode::NOT_FOUND, format!("Unknown sport: {}", slug)).into_response(),
        Err(e) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, format!("Query Error: {}", e))
                .into_response()
        }
    };

    let profile = match database::profiles::find_by_id(&mut conn, profile_id) {
        Ok(Some(profile)) => profile,
        Ok(None) => return (StatusCode::NOT_FOUND, "Profile not found").into_response(),
        Err(e) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, format!("Query Error: {}", e))
                .into_response()
        }
    };

    let eligible =
        match compute_challengeable(&mut conn, &sport, &profile, &state.config.ladder) {
            Ok(eligible) => eligible,
            Err(e) => {
                return (StatusCode::INTERNAL_SERVER_ERROR, format!("Query Error: {}", e))
                    .into_response()
            }
        };

    let provisional_matches = state.config.rating.provisional_matches;
    let entries: Vec<ChallengeTarget> = eligible
        .into_iter()
        .map(|r| ChallengeTarget::from_ranked(r, profile.rating, provisional_matches))
        .collect();

    Json(ChallengeableResponse {
        profile_id: profile.id,
        entries,
    })
    .into_response()
}

/// The single code path deciding who a profile may challenge: the ladder
/// snapshot, the sport's scoring config, and the cooldown-window opponents go
/// through the eligibility engine. Challenge creation validates against the
/// same result this endpoint reports.
pub fn compute_challengeable(
    conn: &mut DbConn,
    sport: &Sport,
    profile: &PlayerProfile,
    settings: &LadderSettings,
) -> anyhow::Result<Vec<RankedProfile>> {
    let players = database::profiles::list_by_sport_ranked(conn, sport.id)?;

    let cutoff = Utc::now().naive_utc() - Duration::days(settings.rematch_cooldown_days);
    let recent: HashSet<i64> = database::matches::recent_opponent_ids(conn, profile.id, cutoff)?
        .into_iter()
        .collect();

    Ok(ladder::challengeable_players(
        &players,
        profile,
        Some(&sport.scoring),
        &recent,
        settings,
    ))
}
