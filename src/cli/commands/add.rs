use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::EditorLogic;
use crate::errors::AppResult;
use crate::models::ManualSession;
use crate::ui::messages::success;
use crate::utils::time::{Clock, parse_datetime, parse_optional_datetime};

use super::{describe, open_store, parse_amount, parse_status, rate_directory};

pub fn handle(cmd: &Commands, cfg: &Config, clock: &dyn Clock) -> AppResult<()> {
    if let Commands::Add {
        worker,
        clock_in,
        clock_out,
        status,
        rate,
        shift,
        notes,
        by,
    } = cmd
    {
        let mut req = ManualSession::new(cfg.tenant_id, worker, by, parse_datetime(clock_in)?);
        req.clock_out = parse_optional_datetime(clock_out.as_ref())?;
        req.status = status.as_deref().map(parse_status).transpose()?;
        req.hourly_rate = rate.as_deref().map(parse_amount).transpose()?;
        req.shift_id = shift.clone();
        req.notes = notes.clone();
        req.source = Some(cfg.manual_source.clone());

        let mut pool = open_store(cfg)?;
        let rates = rate_directory(cfg)?;
        let s = EditorLogic::create_manual(&mut pool, clock, &rates, req)?;

        success(format!("Session created: {}", describe(&s)));
    }

    Ok(())
}
