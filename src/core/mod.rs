pub mod clock;
pub mod config;
pub mod directory;
pub mod editor;
pub mod log;
pub mod overlap;
pub mod payout;
pub mod payroll;
pub mod report;
pub mod sweep;

pub use clock::{ClockLogic, Punch};
pub use directory::{RateDirectory, SqliteRateDirectory, StaticRates};
pub use editor::EditorLogic;
pub use payout::PayoutLogic;
pub use report::ReportLogic;
pub use sweep::SweepLogic;

use crate::errors::{AppError, AppResult};
use crate::models::{SessionStatus, TimeSession, can_transition};

/// Reject a status move the lifecycle does not allow. Staying put is fine.
pub(crate) fn ensure_step(session_id: &str, from: SessionStatus, to: SessionStatus) -> AppResult<()> {
    if from == to || can_transition(from, to) {
        return Ok(());
    }
    Err(AppError::conflict(
        format!("session {} cannot move from {} to {}", session_id, from, to),
        Some(session_id),
    ))
}

pub(crate) fn ensure_transition(s: &TimeSession, to: SessionStatus) -> AppResult<()> {
    ensure_step(&s.id, s.status, to)
}
