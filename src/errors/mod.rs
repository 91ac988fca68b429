use anyhow::Context as _;

/// Add context to database errors
pub fn db_context(operation: &str) -> String {
    format!("Database operation failed: {}", operation)
}

/// Add context to notification delivery errors
pub fn notify_context(event: &str, profile_id: i64) -> String {
    format!(
        "Failed to deliver {} notification for profile {}",
        event, profile_id
    )
}

/// Wrap result with database context
pub fn with_db_context<T, E>(result: Result<T, E>, operation: &str) -> anyhow::Result<T>
where
    E: std::error::Error + Send + Sync + 'static,
{
    result.context(db_context(operation))
}
