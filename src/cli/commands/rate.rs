use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::log::ttlog;
use crate::db::rates::{get_rate, set_rate};
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use crate::utils::time::Clock;

use super::{open_store, parse_amount};

pub fn handle(cmd: &Commands, cfg: &Config, clock: &dyn Clock) -> AppResult<()> {
    if let Commands::Rate { worker, set } = cmd {
        let mut pool = open_store(cfg)?;

        match set {
            Some(raw) => {
                let rate = parse_amount(raw)?;
                let now = clock.now();

                let tx = pool.begin()?;
                set_rate(&tx, cfg.tenant_id, worker, rate, now)?;
                ttlog(&tx, now, "rate", worker, &format!("hourly rate set to {:.2}", rate))?;
                tx.commit()?;

                success(format!("Hourly rate for {} set to {:.2}", worker, rate));
            }
            None => match get_rate(&pool.conn, cfg.tenant_id, worker)? {
                Some(rate) => println!("{}: {:.2}", worker, rate),
                None => info(format!("No hourly rate on file for {}.", worker)),
            },
        }
    }

    Ok(())
}
