//! Read-side projections. Nothing here takes a write lock or checks
//! lifecycle invariants.

use crate::db::pool::DbPool;
use crate::db::queries::{count_open, find_open, list_for_worker, list_in_window};
use crate::errors::AppResult;
use crate::models::{
    PayrollKpis, SessionStatus, StatusFilter, TimeSession, TimeWindow, WorkerSummary,
};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

pub struct ReportLogic;

fn is_unpaid(s: &TimeSession) -> bool {
    matches!(s.status, SessionStatus::Closed | SessionStatus::Approved)
}

impl ReportLogic {
    pub fn open_session(
        pool: &DbPool,
        tenant_id: i64,
        worker_id: &str,
    ) -> AppResult<Option<TimeSession>> {
        find_open(&pool.conn, tenant_id, worker_id)
    }

    pub fn sessions_for_worker(
        pool: &DbPool,
        tenant_id: i64,
        worker_id: &str,
        window: &TimeWindow,
        filter: StatusFilter,
    ) -> AppResult<Vec<TimeSession>> {
        list_for_worker(&pool.conn, tenant_id, worker_id, window, filter)
    }

    /// Every session of the tenant in `window`, ordered by worker then clock_in.
    pub fn sessions_in_window(
        pool: &DbPool,
        tenant_id: i64,
        window: &TimeWindow,
        filter: StatusFilter,
    ) -> AppResult<Vec<TimeSession>> {
        list_in_window(&pool.conn, tenant_id, window, filter)
    }

    /// One row per worker with at least one matching session, ordered by
    /// worker id. OPEN sessions count as entries but add no minutes or pay.
    pub fn worker_summaries(
        pool: &DbPool,
        tenant_id: i64,
        window: &TimeWindow,
        filter: StatusFilter,
        worker_id: Option<&str>,
    ) -> AppResult<Vec<WorkerSummary>> {
        let sessions = match worker_id {
            Some(w) => list_for_worker(&pool.conn, tenant_id, w, window, filter)?,
            None => list_in_window(&pool.conn, tenant_id, window, filter)?,
        };
        Ok(summarize(&sessions))
    }

    pub fn kpis(pool: &DbPool, tenant_id: i64, window: &TimeWindow) -> AppResult<PayrollKpis> {
        let sessions = list_in_window(&pool.conn, tenant_id, window, StatusFilter::All)?;

        let mut k = PayrollKpis {
            open_count: count_open(&pool.conn, tenant_id)?,
            ..Default::default()
        };
        for s in sessions.iter().filter(|s| !s.is_open()) {
            let gross = s.gross_pay.unwrap_or(Decimal::ZERO);
            k.total_minutes += s.duration_minutes.unwrap_or(0);
            k.gross_total += gross;
            if is_unpaid(s) {
                k.unpaid_total += gross;
            }
        }
        Ok(k)
    }
}

/// Fold sessions into per-worker rows.
pub fn summarize(sessions: &[TimeSession]) -> Vec<WorkerSummary> {
    let mut by_worker: BTreeMap<&str, WorkerSummary> = BTreeMap::new();

    for s in sessions {
        let row = by_worker
            .entry(s.worker_id.as_str())
            .or_insert_with(|| WorkerSummary {
                worker_id: s.worker_id.clone(),
                total_minutes: 0,
                total_gross: Decimal::ZERO,
                unpaid_gross: Decimal::ZERO,
                entries: 0,
                last_clock_in: None,
            });

        row.entries += 1;
        row.last_clock_in = row.last_clock_in.max(Some(s.clock_in));

        if s.is_open() {
            continue;
        }
        let gross = s.gross_pay.unwrap_or(Decimal::ZERO);
        row.total_minutes += s.duration_minutes.unwrap_or(0);
        row.total_gross += gross;
        if is_unpaid(s) {
            row.unpaid_gross += gross;
        }
    }

    by_worker.into_values().collect()
}
