pub mod challenges;
pub mod connection;
pub mod matches;
pub mod models;
pub mod profiles;
pub mod setup;
pub mod sports;
pub mod subscriptions;

pub use connection::{create_memory_pool, create_pool, get_connection, DbConn, DbPool};
pub use models::*;
