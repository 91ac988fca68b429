use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use std::sync::Arc;

use crate::api::models::SportSummary;
use crate::database;

use super::AppState;

pub async fn list_sports(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut conn = match state.pool.get() {
        Ok(conn) => conn,
        Err(_) => return (StatusCode::INTERNAL_SERVER_ERROR, "DB Connection Error").into_response(),
    };

    let sports = match database::sports::list_all(&mut conn) {
        Ok(sports) => sports,
        Err(e) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, format!("Query Error: {}", e))
                .into_response()
        }
    };

    let summaries: Vec<SportSummary> = sports.into_iter().map(SportSummary::from_sport).collect();

    Json(summaries).into_response()
}
