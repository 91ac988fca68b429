use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use std::sync::Arc;

use crate::api::models::{ChallengeSummary, CreateChallengeRequest, RespondChallengeRequest};
use crate::database;
use crate::domain::ChallengeStatus;

use super::ladder::compute_challengeable;
use super::AppState;

pub async fn create_challenge(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateChallengeRequest>,
) -> impl IntoResponse {
    let mut conn = match state.pool.get() {
        Ok(conn) => conn,
        Err(_) => return (StatusCode::INTERNAL_SERVER_ERROR, "DB Connection Error").into_response(),
    };

    let challenger = match database::profiles::find_by_id(&mut conn, body.challenger_id) {
        Ok(Some(profile)) => profile,
        Ok(None) => return (StatusCode::NOT_FOUND, "Challenger profile not found").into_response(),
        Err(e) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, format!("Query Error: {}", e))
                .into_response()
        }
    };

    let opponent = match database::profiles::find_by_id(&mut conn, body.opponent_id) {
        Ok(Some(profile)) => profile,
        Ok(None) => return (StatusCode::NOT_FOUND, "Opponent profile not found").into_response(),
        Err(e) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, format!("Query Error: {}", e))
                .into_response()
        }
    };

    if challenger.sport_id != opponent.sport_id {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            "Profiles belong to different sports",
        )
            .into_response();
    }

    let sport = match database::sports::find_by_id(&mut conn, challenger.sport_id) {
        Ok(Some(sport)) => sport,
        Ok(None) => return (StatusCode::NOT_FOUND, "Sport not found").into_response(),
        Err(e) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, format!("Query Error: {}", e))
                .into_response()
        }
    };

    // A challenge is only valid against an opponent the challengeable
    // endpoint would list right now.
    let eligible =
        match compute_challengeable(&mut conn, &sport, &challenger, &state.config.ladder) {
            Ok(eligible) => eligible,
            Err(e) => {
                return (StatusCode::INTERNAL_SERVER_ERROR, format!("Query Error: {}", e))
                    .into_response()
            }
        };
    if !eligible.iter().any(|r| r.profile.id == opponent.id) {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            "Opponent is not currently challengeable",
        )
            .into_response();
    }

    match database::challenges::find_open_between(&mut conn, challenger.id, opponent.id) {
        Ok(Some(_)) => {
            return (
                StatusCode::CONFLICT,
                "An open challenge already exists between these players",
            )
                .into_response()
        }
        Ok(None) => {}
        Err(e) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, format!("Query Error: {}", e))
                .into_response()
        }
    }

    let challenge = match database::challenges::insert_challenge(
        &mut conn,
        sport.id,
        challenger.id,
        opponent.id,
    ) {
        Ok(challenge) => challenge,
        Err(e) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, format!("Insert Error: {}", e))
                .into_response()
        }
    };

    if sport.scoring.notify_on_challenge {
        let endpoints = database::subscriptions::endpoints_for_profile(&mut conn, opponent.id)
            .unwrap_or_default();
        let notifier = state.notifier.clone();
        let opponent = opponent.clone();
        let challenger = challenger.clone();
        tokio::spawn(async move {
            notifier
                .challenge_created(&opponent, &challenger, &endpoints)
                .await;
        });
    }

    (
        StatusCode::CREATED,
        Json(ChallengeSummary::from_challenge(&challenge)),
    )
        .into_response()
}

pub async fn respond_challenge(
    State(state): State<Arc<AppState>>,
    Path(challenge_id): Path<i64>,
    Json(body): Json<RespondChallengeRequest>,
) -> impl IntoResponse {
    let new_status = match body.action.as_str() {
        "accept" => ChallengeStatus::Accepted,
        "decline" => ChallengeStatus::Declined,
        other => {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("Unknown action: {}", other),
            )
                .into_response()
        }
    };

    let mut conn = match state.pool.get() {
        Ok(conn) => conn,
        Err(_) => return (StatusCode::INTERNAL_SERVER_ERROR, "DB Connection Error").into_response(),
    };

    let challenge = match database::challenges::find_by_id(&mut conn, challenge_id) {
        Ok(Some(challenge)) => challenge,
        Ok(None) => return StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, format!("Query Error: {}", e))
                .into_response()
        }
    };

    if challenge.status != ChallengeStatus::Pending {
        return (
            StatusCode::CONFLICT,
            format!("Challenge is already {}", challenge.status.as_str()),
        )
            .into_response();
    }

    match database::challenges::update_status(&mut conn, challenge.id, new_status) {
        Ok(updated) => Json(ChallengeSummary::from_challenge(&updated)).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, format!("Update Error: {}", e))
            .into_response(),
    }
}
