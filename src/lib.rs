//! fieldops library root.
//! Exposes the CLI parser, the high-level run() function and the internal
//! modules (used directly by the integration tests).

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod models;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::commands;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => commands::init::handle(cli),
        Commands::Config { .. } => commands::config::handle(&cli.command, cfg),
        Commands::Db { .. } => commands::db::handle(&cli.command, cfg),
        Commands::Log { .. } => commands::log::handle(&cli.command, cfg),
        Commands::Backup { .. } => commands::backup::handle(&cli.command, cfg),
        Commands::Employee { .. } => commands::employee::handle(&cli.command, cfg),
        Commands::Vehicle { .. } => commands::vehicle::handle(&cli.command, cfg),
        Commands::Inspection { .. } => commands::inspection::handle(&cli.command, cfg),
        Commands::Timesheet { .. } => commands::timesheet::handle(&cli.command, cfg),
        Commands::Rate { .. } => commands::rate::handle(&cli.command, cfg),
        Commands::Havs { .. } => commands::havs::handle(&cli.command, cfg),
        Commands::Compliance { .. } => commands::compliance::handle(&cli.command, cfg),
        Commands::Dashboard { .. } => commands::dashboard::handle(&cli.command, cfg),
        Commands::Export { .. } => commands::export::handle(&cli.command, cfg),
        Commands::User { .. } => commands::user::handle(&cli.command, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    // 1️⃣ parse CLI
    let cli = Cli::parse();

    // 2️⃣ load config once (defaults when there is no file yet)
    let mut cfg = Config::load()?;

    // 3️⃣ command-line DB override
    if let Some(custom_db) = &cli.db {
        cfg.database = Config::resolve_db_path(custom_db)
            .to_string_lossy()
            .to_string();
    }

    // 4️⃣ dispatch
    dispatch(&cli, &cfg)
}
