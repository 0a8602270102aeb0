//! rtimeclock library root.
//! Exposes the session lifecycle engine, the CLI parser and the high-level
//! run() used by the binary.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod models;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;
use utils::time::{Clock, FixedClock, SystemClock};

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config, clock: &dyn Clock) -> AppResult<()> {
    use crate::cli::commands as c;

    match &cli.command {
        Commands::Init => c::init::handle(cli, clock),
        Commands::Config { .. } => c::config::handle(&cli.command, cfg),
        Commands::Db { .. } => c::db::handle(&cli.command, cfg),
        Commands::Log { .. } => c::log::handle(&cli.command, cfg),
        Commands::ClockIn { .. } | Commands::ClockOut { .. } => {
            c::clock::handle(&cli.command, cfg, clock)
        }
        Commands::Add { .. } => c::add::handle(&cli.command, cfg, clock),
        Commands::Edit { .. } => c::edit::handle(&cli.command, cfg, clock),
        Commands::Del { .. } => c::del::handle(&cli.command, cfg, clock),
        Commands::Autoclose { .. } => c::autoclose::handle(&cli.command, cfg, clock),
        Commands::Pay { .. } => c::pay::handle(&cli.command, cfg, clock),
        Commands::List { .. } => c::list::handle(&cli.command, cfg, clock),
        Commands::Summary { .. } => c::summary::handle(&cli.command, cfg, clock),
        Commands::Rate { .. } => c::rate::handle(&cli.command, cfg, clock),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    let mut cfg = Config::load()?;
    if let Some(custom_db) = &cli.db {
        cfg.database = utils::path::expand_tilde(custom_db)
            .to_string_lossy()
            .to_string();
    }
    if let Some(tenant) = cli.tenant {
        cfg.tenant_id = tenant;
    }

    let clock: Box<dyn Clock> = match &cli.now {
        Some(at) => Box::new(FixedClock::at(at)?),
        None => Box::new(SystemClock),
    };

    dispatch(&cli, &cfg, clock.as_ref())
}
