//! Bulk Payout: flips every payable session of the selected workers to PAID.

use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::advance_status;
use crate::errors::AppResult;
use crate::models::{SessionStatus, TimeWindow};
use crate::utils::time::{Clock, to_db};
use tracing::info;

pub struct PayoutLogic;

impl PayoutLogic {
    /// Mark CLOSED and APPROVED sessions of `worker_ids` whose clock_in falls
    /// in `window` as PAID. OPEN and already-PAID rows are left alone.
    /// Returns how many rows changed.
    pub fn mark_paid_bulk(
        pool: &mut DbPool,
        clock: &dyn Clock,
        tenant_id: i64,
        worker_ids: &[String],
        window: TimeWindow,
    ) -> AppResult<usize> {
        if worker_ids.is_empty() {
            return Ok(0);
        }

        let from = SessionStatus::sources_of(SessionStatus::Paid);
        let tx = pool.begin()?;
        let paid = advance_status(&tx, tenant_id, worker_ids, &window, &from, SessionStatus::Paid)?;

        if paid > 0 {
            ttlog(
                &tx,
                clock.now(),
                "pay",
                &format!("tenant:{}", tenant_id),
                &format!(
                    "{} session(s) paid for [{}] in [{}, {})",
                    paid,
                    worker_ids.join(","),
                    to_db(&window.start),
                    to_db(&window.end)
                ),
            )?;
        }
        tx.commit()?;

        info!(tenant_id, workers = worker_ids.len(), paid, "bulk payout");
        Ok(paid)
    }
}
