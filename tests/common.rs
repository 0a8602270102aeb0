#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::NaiveDateTime;
use rtimeclock::core::StaticRates;
use rtimeclock::db::init_db;
use rtimeclock::db::pool::DbPool;
use rtimeclock::utils::time::{FixedClock, parse_datetime};
use rust_decimal::Decimal;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

pub const TENANT: i64 = 1;

/// Binary under test, isolated from the user's real configuration directory.
pub fn rtc() -> Command {
    let mut home: PathBuf = env::temp_dir();
    home.push("rtimeclock_test_home");
    let mut cmd = cargo_bin_cmd!("rtimeclock");
    cmd.env("RTIMECLOCK_HOME", home);
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rtimeclock.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// `init` in test mode against a fresh file.
pub fn init_cli_db(name: &str) -> String {
    let db_path = setup_test_db(name);
    rtc()
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success();
    db_path
}

pub fn memory_pool() -> DbPool {
    let pool = DbPool::in_memory().expect("open in-memory db");
    init_db(&pool.conn).expect("migrate");
    pool
}

pub fn file_pool(path: &str) -> DbPool {
    let pool = DbPool::new(path).expect("open db file");
    init_db(&pool.conn).expect("migrate");
    pool
}

pub fn ts(s: &str) -> NaiveDateTime {
    parse_datetime(s).expect("valid timestamp")
}

pub fn clock_at(s: &str) -> FixedClock {
    FixedClock::new(ts(s))
}

pub fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).expect("valid decimal")
}

/// Worker `w1` at 20.00/h, `w2` at 15.50/h, anyone else unknown.
pub fn rates() -> StaticRates {
    StaticRates::new()
        .with(TENANT, "w1", dec("20.00"))
        .with(TENANT, "w2", dec("15.50"))
}
