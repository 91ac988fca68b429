use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use std::sync::Arc;

use crate::api::models::{MatchReportResponse, ReportMatchRequest};
use crate::database;
use crate::services::settlement::{validate_scores, MatchReport, SettlementService};

use super::AppState;

pub async fn report_match(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ReportMatchRequest>,
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

    if challenger.id == opponent.id {
        return (StatusCode::UNPROCESSABLE_ENTITY, "A player cannot play themselves")
            .into_response();
    }
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

    if let Err(reason) =
        validate_scores(&sport.scoring, body.challenger_score, body.opponent_score)
    {
        return (StatusCode::UNPROCESSABLE_ENTITY, reason).into_response();
    }

    if let Some(challenge_id) = body.challenge_id {
        match database::challenges::find_by_id(&mut conn, challenge_id) {
            Ok(Some(challenge)) => {
                let pair_matches = (challenge.challenger_id == challenger.id
                    && challenge.opponent_id == opponent.id)
                    || (challenge.challenger_id == opponent.id
                        && challenge.opponent_id == challenger.id);
                if !pair_matches {
                    return (
                        StatusCode::UNPROCESSABLE_ENTITY,
                        "Challenge does not involve these players",
                    )
                        .into_response();
                }
                if !challenge.status.is_open() {
                    return (
                        StatusCode::CONFLICT,
                        format!("Challenge is already {}", challenge.status.as_str()),
                    )
                        .into_response();
                }
            }
            Ok(None) => return (StatusCode::NOT_FOUND, "Challenge not found").into_response(),
            Err(e) => {
                return (StatusCode::INTERNAL_SERVER_ERROR, format!("Query Error: {}", e))
                    .into_response()
            }
        }
    }

    let report = MatchReport {
        challenge_id: body.challenge_id,
        challenger_score: body.challenger_score,
        opponent_score: body.opponent_score,
    };
    let service = SettlementService::new(state.config.clone());
    let outcome = match service.settle(&mut conn, &challenger, &opponent, &report) {
        Ok(outcome) => outcome,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Settlement Error: {}", e),
            )
                .into_response()
        }
    };

    notify_participants(&state, &mut conn, &outcome);

    Json(MatchReportResponse {
        match_id: outcome.match_record.id,
        winner_id: outcome.winner_id,
        challenger_rating: outcome.challenger.rating,
        opponent_rating: outcome.opponent.rating,
        challenger_delta: outcome.challenger.rating - outcome.match_record.pre_challenger_rating,
        opponent_delta: outcome.opponent.rating - outcome.match_record.pre_opponent_rating,
    })
    .into_response()
}

fn notify_participants(
    state: &Arc<AppState>,
    conn: &mut crate::database::DbConn,
    outcome: &crate::services::settlement::SettlementOutcome,
) {
    let pairs = [
        (outcome.challenger.clone(), outcome.opponent.clone()),
        (outcome.opponent.clone(), outcome.challenger.clone()),
    ];

    for (recipient, other) in pairs {
        let endpoints = database::subscriptions::endpoints_for_profile(conn, recipient.id)
            .unwrap_or_default();
        if endpoints.is_empty() {
            continue;
        }
        let won = recipient.id == outcome.winner_id;
        let notifier = state.notifier.clone();
        tokio::spawn(async move {
            notifier
                .match_settled(&recipient, &other, won, &endpoints)
                .await;
        });
    }
}
