//! The internal `log` table doubles as the append-only audit trail.
//! Rows are written inside the caller's transaction so an audit line exists
//! exactly when the mutation it describes committed.

use crate::errors::AppResult;
use crate::models::{SessionStatus, TimeSession};
use crate::utils::time::to_db;
use chrono::NaiveDateTime;
use rusqlite::{Connection, params};
use serde::Serialize;

/// Time bounds and status of a session at one point of an edit.
#[derive(Debug, Clone, Serialize)]
pub struct SessionState {
    pub clock_in: NaiveDateTime,
    pub clock_out: Option<NaiveDateTime>,
    pub status: SessionStatus,
}

impl From<&TimeSession> for SessionState {
    fn from(s: &TimeSession) -> Self {
        Self {
            clock_in: s.clock_in,
            clock_out: s.clock_out,
            status: s.status,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditRecord {
    pub actor: Option<String>,
    pub worker_id: String,
    pub reason: Option<String>,
    pub before: Option<SessionState>,
    pub after: Option<SessionState>,
}

#[derive(Debug, Clone)]
pub struct LogRow {
    pub id: i64,
    pub date: String,
    pub operation: String,
    pub target: String,
    pub message: String,
}

/// Write an internal log line into the `log` table.
pub fn ttlog(
    conn: &Connection,
    at: NaiveDateTime,
    operation: &str,
    target: &str,
    message: &str,
) -> AppResult<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO log (date, operation, target, message)
         VALUES (?1, ?2, ?3, ?4)",
    )?;
    stmt.execute(params![to_db(&at), operation, target, message])?;
    Ok(())
}

/// Append an audit row whose message is the JSON rendering of `record`.
pub fn audit(
    conn: &Connection,
    at: NaiveDateTime,
    operation: &str,
    session_id: &str,
    record: &AuditRecord,
) -> AppResult<()> {
    let message = serde_json::to_string(record)?;
    ttlog(conn, at, operation, session_id, &message)
}

/// All rows, oldest first; `operation` narrows to one kind.
pub fn load_log(conn: &Connection, operation: Option<&str>) -> AppResult<Vec<LogRow>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, date, operation, COALESCE(target, ''), message FROM log
         WHERE ?1 IS NULL OR operation = ?1
         ORDER BY id ASC",
    )?;

    let rows = stmt.query_map([operation], |row| {
        Ok(LogRow {
            id: row.get(0)?,
            date: row.get(1)?,
            operation: row.get(2)?,
            target: row.get(3)?,
            message: row.get(4)?,
        })
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
