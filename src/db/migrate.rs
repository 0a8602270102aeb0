//! Versioned schema migrations.
//!
//! Each migration runs once; applied versions are recorded in the `log`
//! table as `operation = 'migration_applied'`, `target = <version>`.

use crate::errors::{AppError, AppResult};
use rusqlite::{Connection, OptionalExtension};
use tracing::info;

struct Migration {
    version: &'static str,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20251011_0001_create_time_sessions",
        description: "Created time_sessions with payroll snapshot and open-session guard",
        sql: r#"
        CREATE TABLE IF NOT EXISTS time_sessions (
            id                TEXT PRIMARY KEY,
            tenant_id         INTEGER NOT NULL,
            worker_id         TEXT NOT NULL,
            shift_id          TEXT,
            clock_in          TEXT NOT NULL,
            clock_out         TEXT,
            status            TEXT NOT NULL DEFAULT 'OPEN'
                              CHECK(status IN ('OPEN','CLOSED','APPROVED','PAID')),
            notes             TEXT,
            clock_in_source   TEXT,
            clock_out_source  TEXT,
            clock_in_ip       TEXT,
            clock_out_ip      TEXT,
            duration_minutes  INTEGER,
            hourly_rate       TEXT,
            gross_pay         TEXT,
            is_manual         INTEGER NOT NULL DEFAULT 0,
            created_by_id     TEXT,
            edited_by_id      TEXT,
            edited_at         TEXT,
            edit_reason       TEXT,

            CONSTRAINT ck_time_sessions_duration_nonneg
                CHECK (duration_minutes IS NULL OR duration_minutes >= 0),
            CONSTRAINT ck_time_sessions_gross_nonneg
                CHECK (gross_pay IS NULL OR CAST(gross_pay AS REAL) >= 0),
            CONSTRAINT ck_time_sessions_out_after_in
                CHECK (clock_out IS NULL OR clock_out > clock_in)
        );

        CREATE INDEX IF NOT EXISTS idx_time_sessions_worker
            ON time_sessions(tenant_id, worker_id, clock_in);
        CREATE INDEX IF NOT EXISTS idx_time_sessions_status
            ON time_sessions(tenant_id, status);

        CREATE UNIQUE INDEX IF NOT EXISTS uq_open_session_per_worker
            ON time_sessions(tenant_id, worker_id)
            WHERE status = 'OPEN';
        "#,
    },
    Migration {
        version: "20251011_0002_create_worker_rates",
        description: "Created worker_rates directory table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS worker_rates (
            tenant_id    INTEGER NOT NULL,
            worker_id    TEXT NOT NULL,
            hourly_rate  TEXT NOT NULL CHECK (CAST(hourly_rate AS REAL) >= 0),
            updated_at   TEXT NOT NULL,
            PRIMARY KEY (tenant_id, worker_id)
        );
        "#,
    },
];

/// Ensure that the `log` table exists.
fn ensure_log_table(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn is_applied(conn: &Connection, version: &str) -> AppResult<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn apply(conn: &Connection, m: &Migration) -> AppResult<()> {
    let batch = format!(
        "BEGIN;
         {}
         INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', '{}', '{}');
         COMMIT;",
        m.sql, m.version, m.description
    );

    if let Err(e) = conn.execute_batch(&batch) {
        let _ = conn.execute_batch("ROLLBACK;");
        return Err(AppError::Migration(format!("{}: {}", m.version, e)));
    }

    info!(version = m.version, "migration applied");
    Ok(())
}

/// Versions not yet applied, in order.
pub fn pending_migrations(conn: &Connection) -> AppResult<Vec<&'static str>> {
    ensure_log_table(conn)?;
    let mut out = Vec::new();
    for m in MIGRATIONS {
        if !is_applied(conn, m.version)? {
            out.push(m.version);
        }
    }
    Ok(out)
}

/// Public entry point: run all pending migrations.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<usize> {
    ensure_log_table(conn)?;

    let mut applied = 0;
    for m in MIGRATIONS {
        if is_applied(conn, m.version)? {
            continue;
        }
        apply(conn, m)?;
        applied += 1;
    }

    Ok(applied)
}
