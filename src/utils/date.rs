//! Period parsing: turns `YYYY`, `YYYY-MM`, `YYYY-MM-DD` or `FROM:TO`
//! into a half-open `[start, end)` window on UTC timestamps.

use crate::errors::{AppError, AppResult};
use crate::models::TimeWindow;
use chrono::{Datelike, NaiveDate, NaiveDateTime};

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// First day covered by `p` and the first day after it.
fn period_bounds(p: &str) -> Option<(NaiveDate, NaiveDate)> {
    let p = p.trim();

    // YYYY-MM-DD
    if let Some(d) = parse_date(p) {
        return Some((d, d.succ_opt()?));
    }

    // YYYY-MM
    if let Ok(first) = NaiveDate::parse_from_str(&format!("{}-01", p), "%Y-%m-%d") {
        return Some((first, first_of_next_month(first)?));
    }

    // YYYY
    if p.len() == 4
        && let Ok(year) = p.parse::<i32>()
    {
        return Some((
            NaiveDate::from_ymd_opt(year, 1, 1)?,
            NaiveDate::from_ymd_opt(year + 1, 1, 1)?,
        ));
    }

    None
}

fn first_of_next_month(d: NaiveDate) -> Option<NaiveDate> {
    if d.month() == 12 {
        NaiveDate::from_ymd_opt(d.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(d.year(), d.month() + 1, 1)
    }
}

fn midnight(d: NaiveDate) -> AppResult<NaiveDateTime> {
    d.and_hms_opt(0, 0, 0)
        .ok_or_else(|| AppError::InvalidDate(d.to_string()))
}

/// Resolve a period expression into a window.
pub fn window_from_period(p: &str) -> AppResult<TimeWindow> {
    let (start, end) = if let Some((from, to)) = p.split_once(':') {
        let (s, _) = period_bounds(from).ok_or_else(|| AppError::InvalidDate(from.to_string()))?;
        let (_, e) = period_bounds(to).ok_or_else(|| AppError::InvalidDate(to.to_string()))?;
        (s, e)
    } else {
        period_bounds(p).ok_or_else(|| AppError::InvalidDate(p.to_string()))?
    };

    TimeWindow::new(midnight(start)?, midnight(end)?)
}

/// Window for the month containing `now`, used when no period is given.
pub fn month_window(now: NaiveDateTime) -> AppResult<TimeWindow> {
    let first = NaiveDate::from_ymd_opt(now.year(), now.month(), 1)
        .ok_or_else(|| AppError::InvalidDate(now.to_string()))?;
    let next = first_of_next_month(first).ok_or_else(|| AppError::InvalidDate(first.to_string()))?;
    TimeWindow::new(midnight(first)?, midnight(next)?)
}

/// `None` → the month containing `now`.
pub fn resolve_window(period: Option<&str>, now: NaiveDateTime) -> AppResult<TimeWindow> {
    match period {
        Some(p) => window_from_period(p),
        None => month_window(now),
    }
}
