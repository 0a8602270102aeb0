use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::SweepLogic;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use crate::utils::time::Clock;

use super::{open_store, rate_directory};

pub fn handle(cmd: &Commands, cfg: &Config, clock: &dyn Clock) -> AppResult<()> {
    if let Commands::Autoclose { max_hours } = cmd {
        let hours = max_hours.unwrap_or(cfg.autoclose_max_hours);

        let mut pool = open_store(cfg)?;
        let rates = rate_directory(cfg)?;
        let closed = SweepLogic::autoclose_stale(&mut pool, clock, &rates, cfg.tenant_id, hours)?;

        if closed == 0 {
            info(format!("No session open for more than {}h.", hours));
        } else {
            success(format!("{} stale session(s) auto-closed.", closed));
        }
    }

    Ok(())
}
