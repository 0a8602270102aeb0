//! Worker directory boundary: the engine only ever asks it for a rate.

use crate::db::pool::DbPool;
use crate::db::rates::get_rate;
use crate::errors::AppResult;
use rust_decimal::Decimal;
use std::collections::HashMap;

pub trait RateDirectory {
    /// Current hourly rate, `None` when the directory has none on file.
    fn hourly_rate(&self, tenant_id: i64, worker_id: &str) -> AppResult<Option<Decimal>>;
}

/// Rates read from the local `worker_rates` table on a dedicated connection.
pub struct SqliteRateDirectory {
    pool: DbPool,
}

impl SqliteRateDirectory {
    pub fn open(path: &str) -> AppResult<Self> {
        Ok(Self {
            pool: DbPool::new(path)?,
        })
    }
}

impl RateDirectory for SqliteRateDirectory {
    fn hourly_rate(&self, tenant_id: i64, worker_id: &str) -> AppResult<Option<Decimal>> {
        get_rate(&self.pool.conn, tenant_id, worker_id)
    }
}

/// Fixed in-memory rates.
#[derive(Debug, Default, Clone)]
pub struct StaticRates {
    rates: HashMap<(i64, String), Decimal>,
}

impl StaticRates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, tenant_id: i64, worker_id: &str, rate: Decimal) -> Self {
        self.set(tenant_id, worker_id, rate);
        self
    }

    pub fn set(&mut self, tenant_id: i64, worker_id: &str, rate: Decimal) {
        self.rates.insert((tenant_id, worker_id.to_string()), rate);
    }
}

impl RateDirectory for StaticRates {
    fn hourly_rate(&self, tenant_id: i64, worker_id: &str) -> AppResult<Option<Decimal>> {
        Ok(self.rates.get(&(tenant_id, worker_id.to_string())).copied())
    }
}

/// Rate to freeze when a session closes: a missing directory entry pays zero.
pub fn close_time_rate(
    rates: &dyn RateDirectory,
    tenant_id: i64,
    worker_id: &str,
) -> AppResult<Decimal> {
    Ok(rates.hourly_rate(tenant_id, worker_id)?.unwrap_or(Decimal::ZERO))
}
