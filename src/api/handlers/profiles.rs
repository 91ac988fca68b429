use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use std::sync::Arc;

use crate::api::models::{
    ChallengeSummary, CreateProfileRequest, MatchSummary, ProfileCreated, ProfileDetail,
};
use crate::database;
use crate::ladder;
use crate::rating::RatingStatus;

use super::AppState;

const RECENT_MATCHES_SHOWN: usize = 10;

pub async fn create_profile(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Json(body): Json<CreateProfileRequest>,
) -> impl IntoResponse {
    let display_name = body.display_name.trim();
    if display_name.is_empty() {
        return (StatusCode::UNPROCESSABLE_ENTITY, "Display name is required").into_response();
    }

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

    let profile = match database::profiles::insert_profile(
        &mut conn,
        sport.id,
        display_name,
        state.config.rating.starter_rating,
    ) {
        Ok(profile) => profile,
        Err(e) => {
            // The (sport, name) pair is unique; a second registration is a conflict.
            return (StatusCode::CONFLICT, format!("Could not create profile: {}", e))
                .into_response();
        }
    };

    let created =
        ProfileCreated::from_profile(profile, state.config.rating.provisional_matches);
    (StatusCode::CREATED, Json(created)).into_response()
}

pub async fn get_profile_detail(
    State(state): State<Arc<AppState>>,
    Path(profile_id): Path<i64>,
) -> impl IntoResponse {
    let mut conn = match state.pool.get() {
        Ok(conn) => conn,
        Err(_) => return (StatusCode::INTERNAL_SERVER_ERROR, "DB Connection Error").into_response(),
    };

    let profile = match database::profiles::find_by_id(&mut conn, profile_id) {
        Ok(Some(profile)) => profile,
        Ok(None) => return StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, format!("Query Error: {}", e))
                .into_response()
        }
    };

    let players = match database::profiles::list_by_sport_ranked(&mut conn, profile.sport_id) {
        Ok(players) => players,
        Err(e) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, format!("Query Error: {}", e))
                .into_response()
        }
    };
    let rank = ladder::calculate_ranks(&players)
        .into_iter()
        .find(|r| r.profile.id == profile.id)
        .map(|r| r.rank);

    let recent = match database::matches::list_recent_for_profile(
        &mut conn,
        profile.id,
        RECENT_MATCHES_SHOWN,
    ) {
        Ok(recent) => recent,
        Err(e) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, format!("Query Error: {}", e))
                .into_response()
        }
    };

    let open = match database::challenges::list_open_for_profile(&mut conn, profile.id) {
        Ok(open) => open,
        Err(e) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, format!("Query Error: {}", e))
                .into_response()
        }
    };

    let status = RatingStatus::from_matches_played(
        profile.matches_played,
        state.config.rating.provisional_matches,
    );

    Json(ProfileDetail {
        profile_id: profile.id,
        sport_id: profile.sport_id,
        display_name: profile.display_name,
        rating: profile.rating,
        rank,
        matches_played: profile.matches_played,
        status: status.as_str().to_string(),
        recent_matches: recent.iter().map(MatchSummary::from_record).collect(),
        open_challenges: open.iter().map(ChallengeSummary::from_challenge).collect(),
    })
    .into_response()
}
