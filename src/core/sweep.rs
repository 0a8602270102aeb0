//! Autoclose Sweeper: force-closes sessions left OPEN for too long.

use crate::core::directory::{RateDirectory, close_time_rate};
use crate::core::{ensure_transition, payroll};
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::{stale_open, update_session};
use crate::errors::{AppError, AppResult};
use crate::models::{SessionStatus, TimeSession};
use crate::utils::time::Clock;
use chrono::Duration;
use tracing::{debug, warn};

pub const STALE_NOTE: &str = " | auto-closed (stale)";
pub const SWEEP_SOURCE: &str = "autoclose";

pub struct SweepLogic;

impl SweepLogic {
    /// Close every OPEN session of the tenant that started more than
    /// `max_hours` ago. The snapshot uses the worker's rate at sweep time.
    /// Returns how many sessions were closed.
    pub fn autoclose_stale(
        pool: &mut DbPool,
        clock: &dyn Clock,
        rates: &dyn RateDirectory,
        tenant_id: i64,
        max_hours: i64,
    ) -> AppResult<usize> {
        if max_hours < 0 {
            return Err(AppError::Validation(format!(
                "max_hours must be >= 0, got {}",
                max_hours
            )));
        }

        let now = clock.now();
        let cutoff = Duration::try_hours(max_hours)
            .and_then(|d| now.checked_sub_signed(d))
            .ok_or_else(|| {
                AppError::Validation(format!("max_hours {} is out of range", max_hours))
            })?;
        let stale = stale_open(&pool.conn, tenant_id, cutoff)?;
        if stale.is_empty() {
            return Ok(0);
        }

        // Rates are looked up before the write lock is taken.
        let mut planned: Vec<TimeSession> = Vec::with_capacity(stale.len());
        for mut s in stale {
            ensure_transition(&s, SessionStatus::Closed)?;
            let rate = match close_time_rate(rates, tenant_id, &s.worker_id) {
                Ok(r) => r,
                Err(e) => {
                    warn!(tenant_id, session_id = %s.id, error = %e, "autoclose: rate lookup failed, skipping");
                    continue;
                }
            };

            s.clock_out = Some(now);
            s.clock_out_source = Some(SWEEP_SOURCE.to_string());
            s.status = SessionStatus::Closed;
            payroll::compute(s.clock_in, now, Some(rate)).apply_to(&mut s);
            s.append_note(STALE_NOTE);
            planned.push(s);
        }

        let tx = pool.begin()?;
        let mut closed = 0;
        for s in &planned {
            match update_session(&tx, s, SessionStatus::Open) {
                Ok(n) => closed += n,
                Err(AppError::Validation(msg)) => {
                    warn!(tenant_id, session_id = %s.id, %msg, "autoclose: row rejected, skipping");
                }
                Err(e) => return Err(e),
            }
            debug!(tenant_id, session_id = %s.id, "autoclose candidate processed");
        }

        if closed > 0 {
            ttlog(
                &tx,
                now,
                "autoclose",
                &format!("tenant:{}", tenant_id),
                &format!("closed {} stale OPEN sessions (max_hours={})", closed, max_hours),
            )?;
        }
        tx.commit()?;

        if closed > 0 {
            warn!(tenant_id, closed, "autoclosed stale OPEN sessions");
        }
        Ok(closed)
    }
}
