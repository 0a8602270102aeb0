pub mod add;
pub mod autoclose;
pub mod clock;
pub mod config;
pub mod db;
pub mod del;
pub mod edit;
pub mod init;
pub mod list;
pub mod log;
pub mod pay;
pub mod rate;
pub mod summary;

use crate::config::Config;
use crate::core::SqliteRateDirectory;
use crate::db::init_db;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::{SessionStatus, StatusFilter, TimeSession};
use crate::utils::formatting::{money, status_color};
use crate::utils::table::Table;
use crate::utils::time::to_db;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Open the configured store, bringing its schema up to date.
pub(crate) fn open_store(cfg: &Config) -> AppResult<DbPool> {
    let pool = DbPool::new(&cfg.database)?;
    init_db(&pool.conn)?;
    Ok(pool)
}

pub(crate) fn rate_directory(cfg: &Config) -> AppResult<SqliteRateDirectory> {
    SqliteRateDirectory::open(&cfg.database)
}

pub(crate) fn parse_status(code: &str) -> AppResult<SessionStatus> {
    SessionStatus::from_code(code).ok_or_else(|| AppError::InvalidStatus(code.to_string()))
}

pub(crate) fn parse_filter(code: &str) -> AppResult<StatusFilter> {
    StatusFilter::from_code(code).ok_or_else(|| AppError::InvalidStatus(code.to_string()))
}

pub(crate) fn parse_amount(raw: &str) -> AppResult<Decimal> {
    let d = Decimal::from_str(raw.trim()).map_err(|_| AppError::InvalidAmount(raw.to_string()))?;
    if d.is_sign_negative() {
        return Err(AppError::InvalidAmount(raw.to_string()));
    }
    Ok(d)
}

pub(crate) fn print_sessions(sessions: &[TimeSession]) {
    let mut table = Table::new(&[
        "ID", "WORKER", "CLOCK IN", "CLOCK OUT", "STATUS", "MIN", "RATE", "GROSS",
    ]);
    for s in sessions {
        table.add_row(vec![
            s.id.clone(),
            s.worker_id.clone(),
            to_db(&s.clock_in),
            s.clock_out.as_ref().map(to_db).unwrap_or_else(|| "--".into()),
            s.status.to_db_str().to_string(),
            s.duration_minutes
                .map(|m| m.to_string())
                .unwrap_or_else(|| "--".into()),
            money(s.hourly_rate),
            money(s.gross_pay),
        ]);
    }
    print!("{}", table.render());
}

/// One-line description of a session for success messages.
pub(crate) fn describe(s: &TimeSession) -> String {
    format!(
        "{} [{} → {}] {}{}\x1b[0m gross {}",
        s.id,
        to_db(&s.clock_in),
        s.clock_out.as_ref().map(to_db).unwrap_or_else(|| "open".into()),
        status_color(s.status),
        s.status,
        money(s.gross_pay)
    )
}
