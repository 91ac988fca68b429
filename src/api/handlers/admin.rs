use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use std::sync::Arc;

use crate::api::models::{SportSummary, UpdateScoringRequest};
use crate::database;
use crate::domain::ScoringConfig;
use crate::services::ProcessingService;

use super::AppState;

fn authorize(headers: &HeaderMap) -> Result<(), axum::response::Response> {
    let expected = match std::env::var("ADMIN_TOKEN") {
        Ok(token) if !token.is_empty() => format!("Bearer {}", token),
        _ => {
            return Err(
                (StatusCode::SERVICE_UNAVAILABLE, "Admin token not configured").into_response(),
            )
        }
    };

    let auth_header = headers.get("Authorization").and_then(|h| h.to_str().ok());
    if auth_header != Some(expected.as_str()) {
        return Err(StatusCode::UNAUTHORIZED.into_response());
    }
    Ok(())
}

pub async fn admin_recalculate(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if let Err(denied) = authorize(&headers) {
        return denied;
    }

    tokio::spawn(async move {
        log::info!("Admin triggered rating recompute");
        let service = ProcessingService::new(state.config.clone());
        if let Err(e) = service.run() {
            log::error!("Recompute failed: {:?}", e);
            return;
        }
        log::info!("Admin triggered recompute completed successfully");
    });

    (StatusCode::ACCEPTED, "Recompute triggered").into_response()
}

pub async fn admin_update_scoring(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    headers: HeaderMap,
    Json(body): Json<UpdateScoringRequest>,
) -> impl IntoResponse {
    if let Err(denied) = authorize(&headers) {
        return denied;
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

    let scoring = ScoringConfig {
        max_challenge_range: body.max_challenge_range,
        total_sets: body.total_sets,
        win_by: body.win_by,
        notify_on_challenge: body.notify_on_challenge,
    };

    match database::sports::update_scoring(&mut conn, sport.id, &scoring) {
        Ok(updated) => Json(SportSummary::from_sport(updated)).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, format!("Update Error: {}", e))
            .into_response(),
    }
}
