//! Formatting utilities used for CLI outputs.

use crate::models::SessionStatus;
use rust_decimal::Decimal;

pub fn mins2readable(mins: i64, short: bool) -> String {
    let abs_m = mins.abs();
    let hours = abs_m / 60;
    let minutes = abs_m % 60;
    let sign = if mins < 0 { "-" } else { "" };

    if short {
        format!("{}{:02}:{:02}", sign, hours, minutes)
    } else {
        format!("{}{:02}h {:02}m", sign, hours, minutes)
    }
}

/// Two-decimal money rendering; `--` when no snapshot exists yet.
pub fn money(value: Option<Decimal>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => "--".to_string(),
    }
}

/// ANSI colour used when printing a status cell.
pub fn status_color(status: SessionStatus) -> &'static str {
    match status {
        SessionStatus::Open => "\x1b[33m",
        SessionStatus::Closed => "\x1b[36m",
        SessionStatus::Approved => "\x1b[34m",
        SessionStatus::Paid => "\x1b[32m",
    }
}
