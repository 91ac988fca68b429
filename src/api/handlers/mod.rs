use crate::config::settings::AppConfig;
use crate::database::DbPool;
use crate::notify::Notifier;

pub mod admin;
pub mod challenges;
pub mod ladder;
pub mod matches;
pub mod profiles;
pub mod sports;
pub mod subscriptions;

pub struct AppState {
    pub pool: DbPool,
    pub config: AppConfig,
    pub notifier: Notifier,
}
