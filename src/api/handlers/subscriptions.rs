use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use std::sync::Arc;

use crate::api::models::{CreateSubscriptionRequest, DeleteSubscriptionRequest};
use crate::database;

use super::AppState;

pub async fn register_subscription(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateSubscriptionRequest>,
) -> impl IntoResponse {
    if body.endpoint.trim().is_empty() {
        return (StatusCode::UNPROCESSABLE_ENTITY, "Endpoint is required").into_response();
    }

    let mut conn = match state.pool.get() {
        Ok(conn) => conn,
        Err(_) => return (StatusCode::INTERNAL_SERVER_ERROR, "DB Connection Error").into_response(),
    };

    match database::profiles::find_by_id(&mut conn, body.profile_id) {
        Ok(Some(_)) => {}
        Ok(None) => return (StatusCode::NOT_FOUND, "Profile not found").into_response(),
        Err(e) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, format!("Query Error: {}", e))
                .into_response()
        }
    }

    match database::subscriptions::upsert_subscription(&mut conn, body.profile_id, &body.endpoint)
    {
        Ok(_) => StatusCode::CREATED.into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, format!("Insert Error: {}", e))
            .into_response(),
    }
}

pub async fn unregister_subscription(
    State(state): State<Arc<AppState>>,
    Json(body): Json<DeleteSubscriptionRequest>,
) -> impl IntoResponse {
    let mut conn = match state.pool.get() {
        Ok(conn) => conn,
        Err(_) => return (StatusCode::INTERNAL_SERVER_ERROR, "DB Connection Error").into_response(),
    };

    match database::subscriptions::delete_endpoint(&mut conn, &body.endpoint) {
        Ok(0) => StatusCode::NOT_FOUND.into_response(),
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, format!("Delete Error: {}", e))
            .into_response(),
    }
}
