use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::PayoutLogic;
use crate::errors::AppResult;
use crate::ui::messages::success;
use crate::utils::date::resolve_window;
use crate::utils::time::{Clock, to_db};

use super::open_store;

pub fn handle(cmd: &Commands, cfg: &Config, clock: &dyn Clock) -> AppResult<()> {
    if let Commands::Pay { workers, period } = cmd {
        let window = resolve_window(period.as_deref(), clock.now())?;

        let mut pool = open_store(cfg)?;
        let paid = PayoutLogic::mark_paid_bulk(&mut pool, clock, cfg.tenant_id, workers, window)?;

        success(format!(
            "{} session(s) marked PAID between {} and {}.",
            paid,
            to_db(&window.start),
            to_db(&window.end)
        ));
    }

    Ok(())
}
