//! Local `worker_rates` table, the binary's stand-in for the worker
//! directory.

use crate::errors::{AppError, AppResult};
use crate::utils::time::to_db;
use chrono::NaiveDateTime;
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use std::str::FromStr;

pub fn set_rate(
    conn: &Connection,
    tenant_id: i64,
    worker_id: &str,
    rate: Decimal,
    at: NaiveDateTime,
) -> AppResult<()> {
    if rate.is_sign_negative() {
        return Err(AppError::InvalidAmount(rate.to_string()));
    }

    conn.execute(
        "INSERT INTO worker_rates (tenant_id, worker_id, hourly_rate, updated_at)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(tenant_id, worker_id)
         DO UPDATE SET hourly_rate = excluded.hourly_rate, updated_at = excluded.updated_at",
        params![tenant_id, worker_id, rate.to_string(), to_db(&at)],
    )?;
    Ok(())
}

pub fn get_rate(conn: &Connection, tenant_id: i64, worker_id: &str) -> AppResult<Option<Decimal>> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT hourly_rate FROM worker_rates WHERE tenant_id = ?1 AND worker_id = ?2",
            params![tenant_id, worker_id],
            |row| row.get(0),
        )
        .optional()?;

    raw.map(|s| Decimal::from_str(&s).map_err(|_| AppError::InvalidAmount(s)))
        .transpose()
}
