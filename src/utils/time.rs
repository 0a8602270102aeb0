//! Time utilities: the injectable clock source, timestamp parsing and the
//! fixed storage format.

use crate::errors::{AppError, AppResult};
use chrono::{Duration, NaiveDateTime, SubsecRound, Utc};
use std::sync::Mutex;

/// Storage / display format. Lexicographic order equals time order.
pub const DB_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// UTC wall-clock provider. Injected everywhere "now" is needed.
pub trait Clock: Send + Sync {
    /// Current UTC time, truncated to whole seconds.
    fn now(&self) -> NaiveDateTime;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Utc::now().naive_utc().trunc_subsecs(0)
    }
}

/// Manually driven clock for tests and replays.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<NaiveDateTime>,
}

impl FixedClock {
    pub fn new(at: NaiveDateTime) -> Self {
        Self {
            now: Mutex::new(at.trunc_subsecs(0)),
        }
    }

    /// Parse `at` with any accepted input format.
    pub fn at(at: &str) -> AppResult<Self> {
        Ok(Self::new(parse_datetime(at)?))
    }

    pub fn set(&self, at: NaiveDateTime) {
        if let Ok(mut guard) = self.now.lock() {
            *guard = at.trunc_subsecs(0);
        }
    }

    pub fn advance(&self, by: Duration) {
        if let Ok(mut guard) = self.now.lock() {
            *guard += by;
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        match self.now.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

const INPUT_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parse `YYYY-MM-DD HH:MM[:SS]` (space or `T` separator).
pub fn parse_datetime(s: &str) -> AppResult<NaiveDateTime> {
    let s = s.trim();
    INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .ok_or_else(|| AppError::InvalidTime(s.to_string()))
}

pub fn parse_optional_datetime(input: Option<&String>) -> AppResult<Option<NaiveDateTime>> {
    input.map(|s| parse_datetime(s)).transpose()
}

pub fn to_db(t: &NaiveDateTime) -> String {
    t.format(DB_FORMAT).to_string()
}

pub fn from_db(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, DB_FORMAT).ok()
}
