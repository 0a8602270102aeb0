//! Payroll Snapshotter: duration and gross pay frozen at close time.

use chrono::NaiveDateTime;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::TimeSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayrollSnapshot {
    pub duration_minutes: i64,
    pub hourly_rate: Option<Decimal>,
    pub gross_pay: Option<Decimal>,
}

/// Whole minutes worked, floored, never negative.
pub fn duration_minutes(clock_in: NaiveDateTime, clock_out: NaiveDateTime) -> i64 {
    (clock_out - clock_in).num_seconds().div_euclid(60).max(0)
}

/// `minutes / 60 × rate`, rounded to cents (half away from zero).
/// Always carries exactly two decimal places.
pub fn gross_pay(minutes: i64, hourly_rate: Decimal) -> Decimal {
    let mut gross = (Decimal::from(minutes) * hourly_rate / Decimal::from(60))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    gross.rescale(2);
    gross
}

pub fn compute(
    clock_in: NaiveDateTime,
    clock_out: NaiveDateTime,
    hourly_rate: Option<Decimal>,
) -> PayrollSnapshot {
    let minutes = duration_minutes(clock_in, clock_out);
    PayrollSnapshot {
        duration_minutes: minutes,
        hourly_rate,
        gross_pay: hourly_rate.map(|r| gross_pay(minutes, r)),
    }
}

impl PayrollSnapshot {
    pub fn apply_to(&self, s: &mut TimeSession) {
        s.duration_minutes = Some(self.duration_minutes);
        s.hourly_rate = self.hourly_rate;
        s.gross_pay = self.gross_pay;
    }
}

/// Drop duration and gross; the frozen rate stays for a later re-close.
pub fn clear(s: &mut TimeSession) {
    s.duration_minutes = None;
    s.gross_pay = None;
}
