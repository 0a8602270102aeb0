use super::status::SessionStatus;
use crate::errors::{AppError, AppResult};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;

/// Half-open `[start, end)` window applied to `clock_in`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeWindow {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> AppResult<Self> {
        if end <= start {
            return Err(AppError::Validation(format!(
                "window end {} must be after start {}",
                end, start
            )));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, t: NaiveDateTime) -> bool {
        self.start <= t && t < self.end
    }
}

/// Listing filter; `Unpaid` means CLOSED or APPROVED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(SessionStatus),
    Unpaid,
}

impl StatusFilter {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "all" => Some(StatusFilter::All),
            "unpaid" => Some(StatusFilter::Unpaid),
            other => SessionStatus::from_code(other).map(StatusFilter::Only),
        }
    }

    /// Statuses admitted by this filter.
    pub fn statuses(&self) -> Vec<SessionStatus> {
        match self {
            StatusFilter::All => SessionStatus::ALL.to_vec(),
            StatusFilter::Only(s) => vec![*s],
            StatusFilter::Unpaid => vec![SessionStatus::Closed, SessionStatus::Approved],
        }
    }
}

/// Per-worker read-side projection over a window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkerSummary {
    pub worker_id: String,
    pub total_minutes: i64,
    pub total_gross: Decimal,
    pub unpaid_gross: Decimal,
    pub entries: i64,
    pub last_clock_in: Option<NaiveDateTime>,
}

impl WorkerSummary {
    pub fn hours(&self) -> Decimal {
        (Decimal::from(self.total_minutes) / Decimal::from(60)).round_dp(2)
    }
}

/// Tenant-level KPI cards.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PayrollKpis {
    pub total_minutes: i64,
    pub gross_total: Decimal,
    pub unpaid_total: Decimal,
    /// Tenant-wide, not window-scoped.
    pub open_count: i64,
}
