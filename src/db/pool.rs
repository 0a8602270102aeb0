//! SQLite connection wrapper.
//!
//! One `DbPool` per thread of control; concurrent callers open their own
//! and meet at the file, where SQLite's locking and the schema constraints
//! keep the session table consistent.

use rusqlite::{Connection, Result, Transaction};
use std::path::Path;
use std::time::Duration;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub struct DbPool {
    pub conn: Connection,
}

impl DbPool {
    pub fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(Path::new(path))?;
        Self::configure(conn)
    }

    /// Private in-memory store, mostly for tests.
    pub fn in_memory() -> Result<Self> {
        Self::configure(Connection::open_in_memory()?)
    }

    fn configure(conn: Connection) -> Result<Self> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self { conn })
    }

    /// Start a write transaction. IMMEDIATE takes the write lock up front so
    /// a read-then-write sequence cannot deadlock against another writer.
    pub fn begin(&mut self) -> Result<Transaction<'_>> {
        self.conn
            .transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)
    }
}
