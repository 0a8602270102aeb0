use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::log::LogLogic;
use crate::errors::AppResult;

use super::open_store;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Log { print: true, op } = cmd {
        let pool = open_store(cfg)?;
        LogLogic::print_log(&pool, op.as_deref())?;
    }

    Ok(())
}
