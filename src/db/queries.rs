//! Session Store: every read and write against `time_sessions`.
//!
//! Functions take a plain `&Connection` so they run equally on a pool
//! connection or inside a `Transaction`.

use crate::errors::{AppError, AppResult};
use crate::models::{SessionStatus, StatusFilter, TimeSession, TimeWindow};
use crate::utils::time::{from_db, to_db};
use chrono::NaiveDateTime;
use rusqlite::types::Type;
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row, params, params_from_iter};
use rust_decimal::Decimal;
use std::str::FromStr;

const COLUMNS: &str = "id, tenant_id, worker_id, shift_id, clock_in, clock_out, status, notes,
     clock_in_source, clock_out_source, clock_in_ip, clock_out_ip,
     duration_minutes, hourly_rate, gross_pay,
     is_manual, created_by_id, edited_by_id, edited_at, edit_reason";

/// Conversion failure reported against the named column's index.
fn conversion_error(row: &Row, col: &str, err: AppError) -> rusqlite::Error {
    match row.as_ref().column_index(col) {
        Ok(idx) => rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err)),
        Err(e) => e,
    }
}

fn get_datetime(row: &Row, col: &str) -> rusqlite::Result<Option<NaiveDateTime>> {
    let raw: Option<String> = row.get(col)?;
    match raw {
        None => Ok(None),
        Some(s) => from_db(&s)
            .map(Some)
            .ok_or_else(|| conversion_error(row, col, AppError::InvalidTime(s))),
    }
}

fn get_decimal(row: &Row, col: &str) -> rusqlite::Result<Option<Decimal>> {
    let raw: Option<String> = row.get(col)?;
    match raw {
        None => Ok(None),
        Some(s) => Decimal::from_str(&s)
            .map(Some)
            .map_err(|_| conversion_error(row, col, AppError::InvalidAmount(s))),
    }
}

pub fn map_row(row: &Row) -> rusqlite::Result<TimeSession> {
    let status_str: String = row.get("status")?;
    let status = SessionStatus::from_db_str(&status_str)
        .ok_or_else(|| conversion_error(row, "status", AppError::InvalidStatus(status_str.clone())))?;

    let clock_in = get_datetime(row, "clock_in")?
        .ok_or_else(|| conversion_error(row, "clock_in", AppError::InvalidTime("missing clock_in".into())))?;

    Ok(TimeSession {
        id: row.get("id")?,
        tenant_id: row.get("tenant_id")?,
        worker_id: row.get("worker_id")?,
        shift_id: row.get("shift_id")?,
        clock_in,
        clock_out: get_datetime(row, "clock_out")?,
        status,
        duration_minutes: row.get("duration_minutes")?,
        hourly_rate: get_decimal(row, "hourly_rate")?,
        gross_pay: get_decimal(row, "gross_pay")?,
        clock_in_source: row.get("clock_in_source")?,
        clock_out_source: row.get("clock_out_source")?,
        clock_in_ip: row.get("clock_in_ip")?,
        clock_out_ip: row.get("clock_out_ip")?,
        is_manual: row.get::<_, i32>("is_manual")? == 1,
        created_by_id: row.get("created_by_id")?,
        edited_by_id: row.get("edited_by_id")?,
        edited_at: get_datetime(row, "edited_at")?,
        edit_reason: row.get("edit_reason")?,
        notes: row.get("notes")?,
    })
}

/// Translate constraint failures into domain errors.
///
/// The only UNIQUE index besides the primary key is the one-open-session
/// guard, so a plain UNIQUE failure means a concurrent open session won.
fn map_write_error(e: rusqlite::Error, s: &TimeSession) -> AppError {
    if let rusqlite::Error::SqliteFailure(ref err, ref msg) = e
        && err.code == ErrorCode::ConstraintViolation
    {
        match err.extended_code {
            rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE => {
                return AppError::RaceCondition {
                    tenant_id: s.tenant_id,
                    worker_id: s.worker_id.clone(),
                };
            }
            rusqlite::ffi::SQLITE_CONSTRAINT_CHECK => {
                return AppError::Validation(
                    msg.clone()
                        .unwrap_or_else(|| "session violates a storage constraint".into()),
                );
            }
            _ => {}
        }
    }
    AppError::Db(e)
}

fn in_list(statuses: &[SessionStatus]) -> String {
    statuses
        .iter()
        .map(|s| format!("'{}'", s.to_db_str()))
        .collect::<Vec<_>>()
        .join(",")
}

fn collect(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> AppResult<Vec<TimeSession>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn insert_session(conn: &Connection, s: &TimeSession) -> AppResult<()> {
    conn.execute(
        &format!(
            "INSERT INTO time_sessions ({COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10,
                     ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20)"
        ),
        params![
            s.id,
            s.tenant_id,
            s.worker_id,
            s.shift_id,
            to_db(&s.clock_in),
            s.clock_out.as_ref().map(to_db),
            s.status.to_db_str(),
            s.notes,
            s.clock_in_source,
            s.clock_out_source,
            s.clock_in_ip,
            s.clock_out_ip,
            s.duration_minutes,
            s.hourly_rate.map(|d| d.to_string()),
            s.gross_pay.map(|d| d.to_string()),
            if s.is_manual { 1 } else { 0 },
            s.created_by_id,
            s.edited_by_id,
            s.edited_at.as_ref().map(to_db),
            s.edit_reason,
        ],
    )
    .map_err(|e| map_write_error(e, s))?;
    Ok(())
}

/// Rewrite every mutable column of `s`, but only while the stored row is
/// still in `expected` status. Returns the number of rows touched (0 or 1).
pub fn update_session(
    conn: &Connection,
    s: &TimeSession,
    expected: SessionStatus,
) -> AppResult<usize> {
    conn.execute(
        "UPDATE time_sessions
         SET shift_id = ?1, clock_in = ?2, clock_out = ?3, status = ?4, notes = ?5,
             clock_in_source = ?6, clock_out_source = ?7,
             clock_in_ip = ?8, clock_out_ip = ?9,
             duration_minutes = ?10, hourly_rate = ?11, gross_pay = ?12,
             edited_by_id = ?13, edited_at = ?14, edit_reason = ?15
         WHERE id = ?16 AND tenant_id = ?17 AND status = ?18",
        params![
            s.shift_id,
            to_db(&s.clock_in),
            s.clock_out.as_ref().map(to_db),
            s.status.to_db_str(),
            s.notes,
            s.clock_in_source,
            s.clock_out_source,
            s.clock_in_ip,
            s.clock_out_ip,
            s.duration_minutes,
            s.hourly_rate.map(|d| d.to_string()),
            s.gross_pay.map(|d| d.to_string()),
            s.edited_by_id,
            s.edited_at.as_ref().map(to_db),
            s.edit_reason,
            s.id,
            s.tenant_id,
            expected.to_db_str(),
        ],
    )
    .map_err(|e| map_write_error(e, s))
}

/// Delete a session unless it is PAID.
pub fn delete_session(conn: &Connection, tenant_id: i64, id: &str) -> AppResult<usize> {
    Ok(conn.execute(
        "DELETE FROM time_sessions
         WHERE id = ?1 AND tenant_id = ?2 AND status <> 'PAID'",
        params![id, tenant_id],
    )?)
}

pub fn find_by_id(conn: &Connection, tenant_id: i64, id: &str) -> AppResult<Option<TimeSession>> {
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {COLUMNS} FROM time_sessions WHERE id = ?1 AND tenant_id = ?2"
    ))?;
    Ok(stmt.query_row(params![id, tenant_id], map_row).optional()?)
}

/// The worker's OPEN session, if any.
pub fn find_open(
    conn: &Connection,
    tenant_id: i64,
    worker_id: &str,
) -> AppResult<Option<TimeSession>> {
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {COLUMNS} FROM time_sessions
         WHERE tenant_id = ?1 AND worker_id = ?2 AND status = 'OPEN'
         ORDER BY clock_in DESC
         LIMIT 1"
    ))?;
    Ok(stmt
        .query_row(params![tenant_id, worker_id], map_row)
        .optional()?)
}

/// Sessions that may overlap `[new_in, new_out)`. OPEN rows (or rows with no
/// clock_out) count as reaching to infinity.
pub fn overlap_candidates(
    conn: &Connection,
    tenant_id: i64,
    worker_id: &str,
    new_in: NaiveDateTime,
    new_out: NaiveDateTime,
    exclude_id: Option<&str>,
) -> AppResult<Vec<TimeSession>> {
    collect(
        conn,
        &format!(
            "SELECT {COLUMNS} FROM time_sessions
             WHERE tenant_id = ?1 AND worker_id = ?2
               AND clock_in < ?3
               AND (status = 'OPEN' OR clock_out IS NULL OR clock_out > ?4)
               AND (?5 IS NULL OR id <> ?5)
             ORDER BY clock_in ASC"
        ),
        params![tenant_id, worker_id, to_db(&new_out), to_db(&new_in), exclude_id],
    )
}

/// A worker's sessions whose clock_in falls in `window`.
pub fn list_for_worker(
    conn: &Connection,
    tenant_id: i64,
    worker_id: &str,
    window: &TimeWindow,
    filter: StatusFilter,
) -> AppResult<Vec<TimeSession>> {
    collect(
        conn,
        &format!(
            "SELECT {COLUMNS} FROM time_sessions
             WHERE tenant_id = ?1 AND worker_id = ?2
               AND clock_in >= ?3 AND clock_in < ?4
               AND status IN ({})
             ORDER BY clock_in ASC",
            in_list(&filter.statuses())
        ),
        params![tenant_id, worker_id, to_db(&window.start), to_db(&window.end)],
    )
}

/// Every tenant session whose clock_in falls in `window`.
pub fn list_in_window(
    conn: &Connection,
    tenant_id: i64,
    window: &TimeWindow,
    filter: StatusFilter,
) -> AppResult<Vec<TimeSession>> {
    collect(
        conn,
        &format!(
            "SELECT {COLUMNS} FROM time_sessions
             WHERE tenant_id = ?1
               AND clock_in >= ?2 AND clock_in < ?3
               AND status IN ({})
             ORDER BY worker_id ASC, clock_in ASC",
            in_list(&filter.statuses())
        ),
        params![tenant_id, to_db(&window.start), to_db(&window.end)],
    )
}

/// OPEN sessions that started strictly before `cutoff`.
pub fn stale_open(
    conn: &Connection,
    tenant_id: i64,
    cutoff: NaiveDateTime,
) -> AppResult<Vec<TimeSession>> {
    collect(
        conn,
        &format!(
            "SELECT {COLUMNS} FROM time_sessions
             WHERE tenant_id = ?1 AND status = 'OPEN' AND clock_in < ?2
             ORDER BY clock_in ASC"
        ),
        params![tenant_id, to_db(&cutoff)],
    )
}

/// Move every matching row from one of `from` to `to` in a single statement.
pub fn advance_status(
    conn: &Connection,
    tenant_id: i64,
    worker_ids: &[String],
    window: &TimeWindow,
    from: &[SessionStatus],
    to: SessionStatus,
) -> AppResult<usize> {
    if worker_ids.is_empty() || from.is_empty() {
        return Ok(0);
    }

    let placeholders = vec!["?"; worker_ids.len()].join(",");
    let sql = format!(
        "UPDATE time_sessions
         SET status = ?
         WHERE tenant_id = ?
           AND clock_in >= ? AND clock_in < ?
           AND status IN ({})
           AND worker_id IN ({})",
        in_list(from),
        placeholders
    );

    let mut values: Vec<Box<dyn rusqlite::ToSql>> = vec![
        Box::new(to.to_db_str()),
        Box::new(tenant_id),
        Box::new(to_db(&window.start)),
        Box::new(to_db(&window.end)),
    ];
    for w in worker_ids {
        values.push(Box::new(w.clone()));
    }

    Ok(conn.execute(&sql, params_from_iter(values.iter()))?)
}

pub fn count_open(conn: &Connection, tenant_id: i64) -> AppResult<i64> {
    Ok(conn.query_row(
        "SELECT COUNT(*) FROM time_sessions WHERE tenant_id = ?1 AND status = 'OPEN'",
        [tenant_id],
        |row| row.get(0),
    )?)
}

/// Row counts per status across all tenants.
pub fn count_by_status(conn: &Connection) -> AppResult<Vec<(SessionStatus, i64)>> {
    let mut out = Vec::new();
    for status in SessionStatus::ALL {
        let n: i64 = conn.query_row(
            "SELECT COUNT(*) FROM time_sessions WHERE status = ?1",
            [status.to_db_str()],
            |row| row.get(0),
        )?;
        out.push((status, n));
    }
    Ok(out)
}
