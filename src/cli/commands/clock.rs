use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::{ClockLogic, Punch};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{success, warning};
use crate::utils::formatting::{mins2readable, money};
use crate::utils::time::Clock;

use super::{open_store, rate_directory};

pub fn handle(cmd: &Commands, cfg: &Config, clock: &dyn Clock) -> AppResult<()> {
    match cmd {
        Commands::ClockIn {
            worker,
            shift,
            ip,
            source,
        } => {
            let mut pool = open_store(cfg)?;
            let punch = Punch {
                shift_id: shift.clone(),
                ip: ip.clone(),
                source: Some(source.clone().unwrap_or_else(|| cfg.default_source.clone())),
            };

            let s = ClockLogic::clock_in(&mut pool, clock, cfg.tenant_id, worker, punch)?;
            success(format!(
                "{} clocked in at {} (session {})",
                worker, s.clock_in, s.id
            ));
        }

        Commands::ClockOut { worker, ip, source } => {
            let mut pool = open_store(cfg)?;
            let rates = rate_directory(cfg)?;
            let punch = Punch {
                shift_id: None,
                ip: ip.clone(),
                source: Some(source.clone().unwrap_or_else(|| cfg.default_source.clone())),
            };

            match ClockLogic::clock_out(&mut pool, clock, &rates, cfg.tenant_id, worker, punch) {
                Ok(s) => success(format!(
                    "{} clocked out at {}: {} worked, gross {}",
                    worker,
                    s.clock_out.map(|t| t.to_string()).unwrap_or_default(),
                    mins2readable(s.duration_minutes.unwrap_or(0), false),
                    money(s.gross_pay)
                )),
                // Nothing to close is a soft miss, not a failure.
                Err(AppError::NotFound(_)) => {
                    warning(format!("No open session for {}; nothing to do.", worker))
                }
                Err(e) => return Err(e),
            }
        }

        _ => {}
    }

    Ok(())
}
