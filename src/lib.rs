pub mod api;
pub mod cli;
pub mod config;
pub mod database;
pub mod domain;
pub mod errors;
pub mod ladder;
pub mod notify;
pub mod rating;
pub mod services;

use anyhow::Result;
use clap::Parser;
use cli::Cli;

use crate::cli::Command;
use crate::config::settings::AppConfig;
use crate::services::processing::ProcessingService;
use crate::services::server::ServerService;

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_serve(port: u16) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::new();
        let service = ServerService::new(port, config);
        service.run().await
    })
}

pub fn handle_init(sports: &[String]) -> Result<()> {
    let db_path = std::env::var("DATABASE_PATH").unwrap_or_else(|_| "club_ladder.db".to_string());

    let pool = database::create_pool(&db_path)?;
    let mut conn = database::get_connection(&pool)?;
    database::setup::init_database(&mut conn)?;

    for name in sports {
        let sport = database::sports::upsert_sport(&mut conn, name, &slugify(name))?;
        log::info!("Sport ready: {} ({})", sport.name, sport.slug);
    }

    Ok(())
}

pub fn handle_process() -> Result<()> {
    let config = AppConfig::new();
    let service = ProcessingService::new(config);
    service.run()
}

fn slugify(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}
