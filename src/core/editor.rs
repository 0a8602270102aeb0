//! Audit-Logged Editor: privileged creation, retroactive edits and deletion.
//!
//! Every path re-checks the clock-service invariants inside one IMMEDIATE
//! transaction and appends its audit row before committing.

use crate::core::directory::{RateDirectory, close_time_rate};
use crate::core::overlap::find_conflict;
use crate::core::{ensure_step, payroll};
use crate::db::log::{AuditRecord, SessionState, audit};
use crate::db::pool::DbPool;
use crate::db::queries::{
    delete_session, find_by_id, find_open, insert_session, overlap_candidates, update_session,
};
use crate::errors::{AppError, AppResult};
use crate::models::{ClockOutChange, ManualSession, SessionEdit, SessionStatus, TimeSession};
use crate::utils::time::Clock;
use chrono::NaiveDateTime;
use rusqlite::Connection;
use tracing::{info, warn};

pub const MANUAL_SOURCE: &str = "admin_manual";

pub struct EditorLogic;

fn check_bounds(clock_in: NaiveDateTime, clock_out: Option<NaiveDateTime>) -> AppResult<()> {
    match clock_out {
        Some(out) if out <= clock_in => Err(AppError::Validation(format!(
            "clock_out {} must be after clock_in {}",
            out, clock_in
        ))),
        _ => Ok(()),
    }
}

/// OPEN ⇔ no clock_out.
fn check_status_shape(status: SessionStatus, clock_out: Option<NaiveDateTime>) -> AppResult<()> {
    match (status, clock_out) {
        (SessionStatus::Open, Some(_)) => Err(AppError::Validation(
            "an OPEN session cannot carry a clock_out".into(),
        )),
        (s, None) if !s.is_open() => Err(AppError::Validation(format!(
            "status {} requires a clock_out",
            s
        ))),
        _ => Ok(()),
    }
}

fn reject_overlap(
    conn: &Connection,
    s: &TimeSession,
    exclude_id: Option<&str>,
) -> AppResult<()> {
    let Some(out) = s.clock_out else {
        return Ok(());
    };

    let candidates =
        overlap_candidates(conn, s.tenant_id, &s.worker_id, s.clock_in, out, exclude_id)?;
    if let Some(c) = find_conflict(&candidates, s.clock_in, Some(out), exclude_id) {
        return Err(AppError::conflict(
            format!(
                "session overlaps {} [{} → {}]",
                c.id,
                c.clock_in,
                c.clock_out
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| "open".into())
            ),
            Some(&c.id),
        ));
    }
    Ok(())
}

/// A write lost to the open-session index: name the session that holds it.
fn open_session_conflict(conn: &Connection, tenant_id: i64, worker_id: &str, e: AppError) -> AppError {
    match e {
        AppError::RaceCondition { .. } => match find_open(conn, tenant_id, worker_id) {
            Ok(holder) => AppError::conflict(
                format!("worker {} already has an OPEN session", worker_id),
                holder.as_ref().map(|h| h.id.as_str()),
            ),
            Err(read_err) => {
                warn!(tenant_id, worker_id, error = %read_err, "could not read the OPEN session holder");
                read_err
            }
        },
        other => other,
    }
}

fn paid_conflict(s: &TimeSession) -> AppError {
    AppError::conflict(format!("session {} is PAID and immutable", s.id), Some(&s.id))
}

impl EditorLogic {
    /// Fabricate a session on behalf of a worker.
    pub fn create_manual(
        pool: &mut DbPool,
        clock: &dyn Clock,
        rates: &dyn RateDirectory,
        req: ManualSession,
    ) -> AppResult<TimeSession> {
        check_bounds(req.clock_in, req.clock_out)?;

        let status = req.status.unwrap_or(if req.clock_out.is_some() {
            SessionStatus::Closed
        } else {
            SessionStatus::Open
        });
        check_status_shape(status, req.clock_out)?;

        let now = clock.now();
        let source = req.source.clone().unwrap_or_else(|| MANUAL_SOURCE.to_string());

        let mut s = TimeSession::open(req.tenant_id, &req.worker_id, req.clock_in);
        s.clock_out = req.clock_out;
        s.status = status;
        s.shift_id = req.shift_id;
        s.notes = req.notes;
        s.is_manual = true;
        s.created_by_id = Some(req.created_by_id.clone());
        s.clock_in_source = Some(source.clone());

        match req.clock_out {
            Some(out) => {
                let rate = match req.hourly_rate {
                    Some(r) => r,
                    None => close_time_rate(rates, s.tenant_id, &s.worker_id)?,
                };
                s.clock_out_source = Some(source);
                payroll::compute(s.clock_in, out, Some(rate)).apply_to(&mut s);
            }
            None => s.hourly_rate = req.hourly_rate,
        }

        let tx = pool.begin()?;

        if s.clock_out.is_none() {
            if let Some(open) = find_open(&tx, s.tenant_id, &s.worker_id)? {
                return Err(AppError::conflict(
                    format!("worker {} already has an OPEN session", s.worker_id),
                    Some(&open.id),
                ));
            }
        } else {
            reject_overlap(&tx, &s, None)?;
        }

        insert_session(&tx, &s).map_err(|e| open_session_conflict(&tx, s.tenant_id, &s.worker_id, e))?;

        audit(
            &tx,
            now,
            "create",
            &s.id,
            &AuditRecord {
                actor: s.created_by_id.clone(),
                worker_id: s.worker_id.clone(),
                reason: None,
                before: None,
                after: Some(SessionState::from(&s)),
            },
        )?;
        tx.commit()?;

        info!(
            tenant_id = s.tenant_id,
            worker_id = %s.worker_id,
            session_id = %s.id,
            created_by = %req.created_by_id,
            clock_in = %s.clock_in,
            clock_out = ?s.clock_out,
            "manual session created"
        );
        Ok(s)
    }

    /// Apply a retroactive edit.
    ///
    /// Clearing clock_out on a CLOSED session reopens it and drops its
    /// snapshot; setting clock_out on an OPEN one closes it. The frozen rate
    /// is reused unless the editor supplies a new one.
    pub fn edit(
        pool: &mut DbPool,
        clock: &dyn Clock,
        rates: &dyn RateDirectory,
        tenant_id: i64,
        session_id: &str,
        edit: SessionEdit,
    ) -> AppResult<TimeSession> {
        let now = clock.now();
        let tx = pool.begin()?;

        let before = find_by_id(&tx, tenant_id, session_id)?
            .ok_or_else(|| AppError::NotFound(format!("session {}", session_id)))?;
        if before.status.is_terminal() {
            return Err(paid_conflict(&before));
        }

        let mut s = before.clone();
        if let Some(ci) = edit.clock_in {
            s.clock_in = ci;
        }
        match edit.clock_out {
            ClockOutChange::Keep => {}
            ClockOutChange::Set(t) => s.clock_out = Some(t),
            ClockOutChange::Clear => s.clock_out = None,
        }
        check_bounds(s.clock_in, s.clock_out)?;

        // Status implied by the new bounds, then the explicitly requested one.
        let implied = match (before.status, s.clock_out) {
            (SessionStatus::Open, Some(_)) => SessionStatus::Closed,
            (st, None) if !st.is_open() => SessionStatus::Open,
            (st, _) => st,
        };
        ensure_step(&before.id, before.status, implied)?;

        let target = match edit.status {
            Some(requested) => {
                ensure_step(&before.id, implied, requested)?;
                requested
            }
            None => implied,
        };
        check_status_shape(target, s.clock_out)?;

        reject_overlap(&tx, &s, Some(&before.id))?;

        match (target, s.clock_out) {
            (SessionStatus::Open, _) | (_, None) => {
                payroll::clear(&mut s);
                if let Some(r) = edit.hourly_rate {
                    s.hourly_rate = Some(r);
                }
                s.clock_out_source = None;
                s.clock_out_ip = None;
            }
            (_, Some(out)) => {
                // A session closed for the first time here has no frozen rate
                // yet; this edit is its close moment.
                let rate = match edit.hourly_rate.or(before.hourly_rate) {
                    Some(r) => r,
                    None => close_time_rate(rates, s.tenant_id, &s.worker_id)?,
                };
                payroll::compute(s.clock_in, out, Some(rate)).apply_to(&mut s);
                if s.clock_out_source.is_none() {
                    s.clock_out_source = Some(MANUAL_SOURCE.to_string());
                }
            }
        }

        s.status = target;
        if let Some(notes) = edit.notes {
            s.notes = Some(notes);
        }
        if let Some(shift) = edit.shift_id {
            s.shift_id = Some(shift);
        }
        s.edited_by_id = Some(edit.edited_by_id.clone());
        s.edited_at = Some(now);
        s.edit_reason = edit.edit_reason.clone();

        let touched = update_session(&tx, &s, before.status)
            .map_err(|e| open_session_conflict(&tx, s.tenant_id, &s.worker_id, e))?;
        if touched == 0 {
            return Err(AppError::conflict(
                format!("session {} was modified concurrently", s.id),
                Some(&s.id),
            ));
        }

        audit(
            &tx,
            now,
            "edit",
            &s.id,
            &AuditRecord {
                actor: Some(edit.edited_by_id.clone()),
                worker_id: s.worker_id.clone(),
                reason: edit.edit_reason,
                before: Some(SessionState::from(&before)),
                after: Some(SessionState::from(&s)),
            },
        )?;
        tx.commit()?;

        info!(
            tenant_id,
            session_id = %s.id,
            edited_by = %edit.edited_by_id,
            before_in = %before.clock_in,
            before_out = ?before.clock_out,
            after_in = %s.clock_in,
            after_out = ?s.clock_out,
            status = %s.status,
            "session edited"
        );
        Ok(s)
    }

    /// Remove a session. PAID sessions are never deleted.
    pub fn delete(
        pool: &mut DbPool,
        clock: &dyn Clock,
        tenant_id: i64,
        session_id: &str,
        actor_id: &str,
        reason: Option<&str>,
    ) -> AppResult<TimeSession> {
        let now = clock.now();
        let tx = pool.begin()?;

        let before = find_by_id(&tx, tenant_id, session_id)?
            .ok_or_else(|| AppError::NotFound(format!("session {}", session_id)))?;
        if before.status.is_terminal() {
            return Err(paid_conflict(&before));
        }

        if delete_session(&tx, tenant_id, session_id)? == 0 {
            return Err(AppError::NotFound(format!("session {}", session_id)));
        }

        audit(
            &tx,
            now,
            "delete",
            &before.id,
            &AuditRecord {
                actor: Some(actor_id.to_string()),
                worker_id: before.worker_id.clone(),
                reason: reason.map(str::to_string),
                before: Some(SessionState::from(&before)),
                after: None,
            },
        )?;
        tx.commit()?;

        info!(tenant_id, session_id, deleted_by = actor_id, "session deleted");
        Ok(before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lost_race() -> AppError {
        AppError::RaceCondition {
            tenant_id: 1,
            worker_id: "w1".into(),
        }
    }

    #[test]
    fn lost_race_names_the_open_holder() {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::migrate::run_pending_migrations(&conn).unwrap();
        conn.execute(
            "INSERT INTO time_sessions (id, tenant_id, worker_id, clock_in, status, clock_in_source, is_manual)
             VALUES ('held', 1, 'w1', '2025-10-06 09:00:00', 'OPEN', 'web', 0)",
            [],
        )
        .unwrap();

        let err = open_session_conflict(&conn, 1, "w1", lost_race());
        assert!(err.is_conflict());
        assert_eq!(err.conflicting_id(), Some("held"));
    }

    #[test]
    fn failed_holder_read_is_not_reported_as_conflict() {
        // No schema: the holder lookup itself fails.
        let conn = Connection::open_in_memory().unwrap();
        let err = open_session_conflict(&conn, 1, "w1", lost_race());
        assert!(matches!(err, AppError::Db(_)));
    }

    #[test]
    fn other_errors_pass_through() {
        let conn = Connection::open_in_memory().unwrap();
        let err = open_session_conflict(&conn, 1, "w1", AppError::Validation("bad".into()));
        assert!(err.is_validation());
    }
}
