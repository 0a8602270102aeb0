use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::EditorLogic;
use crate::errors::AppResult;
use crate::models::{ClockOutChange, SessionEdit};
use crate::ui::messages::success;
use crate::utils::time::{Clock, parse_datetime, parse_optional_datetime};

use super::{describe, open_store, parse_amount, parse_status, rate_directory};

pub fn handle(cmd: &Commands, cfg: &Config, clock: &dyn Clock) -> AppResult<()> {
    if let Commands::Edit {
        id,
        clock_in,
        clock_out,
        clear_out,
        status,
        rate,
        shift,
        notes,
        reason,
        by,
    } = cmd
    {
        let mut edit = SessionEdit::by(by);
        edit.edit_reason = reason.clone();
        edit.clock_in = parse_optional_datetime(clock_in.as_ref())?;
        edit.clock_out = match clock_out {
            Some(raw) => ClockOutChange::Set(parse_datetime(raw)?),
            None if *clear_out => ClockOutChange::Clear,
            None => ClockOutChange::Keep,
        };
        edit.status = status.as_deref().map(parse_status).transpose()?;
        edit.hourly_rate = rate.as_deref().map(parse_amount).transpose()?;
        edit.shift_id = shift.clone();
        edit.notes = notes.clone();

        let mut pool = open_store(cfg)?;
        let rates = rate_directory(cfg)?;
        let s = EditorLogic::edit(&mut pool, clock, &rates, cfg.tenant_id, id, edit)?;

        success(format!("Session updated: {}", describe(&s)));
    }

    Ok(())
}
