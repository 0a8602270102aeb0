pub mod log;
pub mod migrate;
pub mod pool;
pub mod queries;
pub mod rates;
pub mod stats;

use crate::errors::AppResult;
use rusqlite::Connection;

/// Initialize the database: every schema change goes through migrations.
pub fn init_db(conn: &Connection) -> AppResult<()> {
    migrate::run_pending_migrations(conn)?;
    Ok(())
}
