use chrono::NaiveDateTime;

/// Stored push subscription row
#[derive(Debug, Clone)]
pub struct SubscriptionRow {
    pub id: i64,
    pub profile_id: i64,
    pub endpoint: String,
    pub created_at: Option<NaiveDateTime>,
}
