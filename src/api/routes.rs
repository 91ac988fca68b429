use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::api::handlers::{
    admin::{admin_recalculate, admin_update_scoring},
    challenges::{create_challenge, respond_challenge},
    ladder::{get_challengeable, get_ladder},
    matches::report_match,
    profiles::{create_profile, get_profile_detail},
    sports::list_sports,
    subscriptions::{register_subscription, unregister_subscription},
    AppState,
};

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/sports", get(list_sports))
        .route("/api/sports/:slug/ladder", get(get_ladder))
        .route("/api/sports/:slug/profiles", post(create_profile))
        .route(
            "/api/sports/:slug/profiles/:id/challengeable",
            get(get_challengeable),
        )
        .route("/api/profiles/:id", get(get_profile_detail))
        .route("/api/challenges", post(create_challenge))
        .route("/api/challenges/:id/respond", post(respond_challenge))
        .route("/api/matches", post(report_match))
        .route(
            "/api/subscriptions",
            post(register_subscription).delete(unregister_subscription),
        )
        .route("/api/admin/recalculate", post(admin_recalculate))
        .route("/api/admin/sports/:slug/scoring", put(admin_update_scoring))
        .with_state(state)
}
