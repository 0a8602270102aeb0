use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::ReportLogic;
use crate::errors::AppResult;
use crate::ui::messages::{header, info};
use crate::utils::date::resolve_window;
use crate::utils::time::{Clock, to_db};

use super::{open_store, parse_filter, print_sessions};

pub fn handle(cmd: &Commands, cfg: &Config, clock: &dyn Clock) -> AppResult<()> {
    if let Commands::List {
        worker,
        period,
        status,
        open,
    } = cmd
    {
        let pool = open_store(cfg)?;

        if *open {
            let w = worker.as_deref().unwrap_or_default();
            match ReportLogic::open_session(&pool, cfg.tenant_id, w)? {
                Some(s) => print_sessions(std::slice::from_ref(&s)),
                None => info(format!("{} has no open session.", w)),
            }
            return Ok(());
        }

        let window = resolve_window(period.as_deref(), clock.now())?;
        let filter = parse_filter(status)?;

        let sessions = match worker {
            Some(w) => ReportLogic::sessions_for_worker(&pool, cfg.tenant_id, w, &window, filter)?,
            None => ReportLogic::sessions_in_window(&pool, cfg.tenant_id, &window, filter)?,
        };

        if sessions.is_empty() {
            info("No sessions in the selected period.");
            return Ok(());
        }

        header(format!(
            "Sessions {} → {} ({})",
            to_db(&window.start),
            to_db(&window.end),
            status.to_lowercase()
        ));
        print_sessions(&sessions);
    }

    Ok(())
}
