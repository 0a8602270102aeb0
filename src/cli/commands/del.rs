use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::EditorLogic;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};
use crate::utils::time::Clock;

use super::open_store;
use std::io::{self, Write};

/// Ask a yes/no confirmation from the user
fn ask_confirmation(prompt: &str) -> bool {
    warning(prompt);
    print!("Confirm [y/N]: ");
    let _ = io::stdout().flush();

    let mut s = String::new();
    if io::stdin().read_line(&mut s).is_ok() {
        matches!(s.trim().to_lowercase().as_str(), "y" | "yes")
    } else {
        false
    }
}

pub fn handle(cmd: &Commands, cfg: &Config, clock: &dyn Clock) -> AppResult<()> {
    if let Commands::Del {
        id,
        reason,
        by,
        force,
    } = cmd
    {
        if !*force
            && !ask_confirmation(&format!(
                "Delete session {}? This action is irreversible.",
                id
            ))
        {
            info("Operation cancelled.");
            return Ok(());
        }

        let mut pool = open_store(cfg)?;
        let s = EditorLogic::delete(&mut pool, clock, cfg.tenant_id, id, by, reason.as_deref())?;
        success(format!("Session {} of {} has been deleted.", s.id, s.worker_id));
    }

    Ok(())
}
