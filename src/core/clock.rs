//! Clock Service: worker-facing clock-in / clock-out.

use crate::core::directory::{RateDirectory, close_time_rate};
use crate::core::{ensure_transition, payroll};
use crate::db::pool::DbPool;
use crate::db::queries::{find_open, insert_session, update_session};
use crate::errors::{AppError, AppResult};
use crate::models::{SessionStatus, TimeSession};
use crate::utils::time::Clock;
use tracing::{info, warn};

const DEFAULT_SOURCE: &str = "web";

/// Insert attempts before giving up on a worker whose open session keeps
/// appearing and vanishing under us.
const MAX_INSERT_ATTEMPTS: usize = 3;

/// Request metadata recorded on the session for provenance.
#[derive(Debug, Clone, Default)]
pub struct Punch {
    pub shift_id: Option<String>,
    pub ip: Option<String>,
    pub source: Option<String>,
}

impl Punch {
    pub fn from_source(source: &str) -> Self {
        Self {
            source: Some(source.to_string()),
            ..Default::default()
        }
    }
}

pub struct ClockLogic;

impl ClockLogic {
    /// Open a session for the worker, or hand back the one already open.
    ///
    /// Two racing callers both miss the open session, both insert, and the
    /// partial unique index lets exactly one through. The loser re-reads and
    /// returns the winner's row.
    pub fn clock_in(
        pool: &mut DbPool,
        clock: &dyn Clock,
        tenant_id: i64,
        worker_id: &str,
        punch: Punch,
    ) -> AppResult<TimeSession> {
        for _ in 0..MAX_INSERT_ATTEMPTS {
            if let Some(open) = find_open(&pool.conn, tenant_id, worker_id)? {
                info!(tenant_id, worker_id, session_id = %open.id, "clock_in idempotent hit");
                return Ok(open);
            }

            let mut s = TimeSession::open(tenant_id, worker_id, clock.now());
            s.shift_id = punch.shift_id.clone();
            s.clock_in_ip = punch.ip.clone();
            s.clock_in_source = Some(
                punch
                    .source
                    .clone()
                    .unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
            );

            match insert_session(&pool.conn, &s) {
                Ok(()) => {
                    info!(tenant_id, worker_id, session_id = %s.id, "clock_in");
                    return Ok(s);
                }
                Err(AppError::RaceCondition { .. }) => {
                    info!(tenant_id, worker_id, "clock_in lost insert race, re-reading");
                    continue;
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::Other(format!(
            "clock_in for worker {} did not settle after {} attempts",
            worker_id, MAX_INSERT_ATTEMPTS
        )))
    }

    /// Close the worker's open session and freeze its payroll snapshot.
    ///
    /// `NotFound` when nothing is open: callers treat it as a soft no-op.
    pub fn clock_out(
        pool: &mut DbPool,
        clock: &dyn Clock,
        rates: &dyn RateDirectory,
        tenant_id: i64,
        worker_id: &str,
        punch: Punch,
    ) -> AppResult<TimeSession> {
        let Some(mut s) = find_open(&pool.conn, tenant_id, worker_id)? else {
            warn!(tenant_id, worker_id, "clock_out with no OPEN session");
            return Err(AppError::NotFound(format!(
                "no open session for worker {}",
                worker_id
            )));
        };

        let now = clock.now();
        if now <= s.clock_in {
            return Err(AppError::Validation(format!(
                "clock-out {} must be after clock-in {}",
                now, s.clock_in
            )));
        }

        ensure_transition(&s, SessionStatus::Closed)?;
        let rate = close_time_rate(rates, tenant_id, worker_id)?;

        s.clock_out = Some(now);
        s.clock_out_ip = punch.ip;
        s.clock_out_source = Some(punch.source.unwrap_or_else(|| DEFAULT_SOURCE.to_string()));
        s.status = SessionStatus::Closed;
        payroll::compute(s.clock_in, now, Some(rate)).apply_to(&mut s);

        if update_session(&pool.conn, &s, SessionStatus::Open)? == 0 {
            warn!(tenant_id, worker_id, session_id = %s.id, "session closed concurrently");
            return Err(AppError::NotFound(format!(
                "session {} is no longer open",
                s.id
            )));
        }

        info!(
            tenant_id,
            worker_id,
            session_id = %s.id,
            minutes = ?s.duration_minutes,
            gross = %payroll_display(&s),
            "clock_out"
        );
        Ok(s)
    }
}

fn payroll_display(s: &TimeSession) -> String {
    s.gross_pay.map(|g| g.to_string()).unwrap_or_default()
}
