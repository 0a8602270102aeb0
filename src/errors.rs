//! Unified application error type.
//! Engine, store and CLI layers all return AppError so callers can tell a
//! soft miss (NotFound) from a user-resolvable clash (Conflict) or bad input
//! (Validation).

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Session lifecycle
    // ---------------------------
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {message}")]
    Conflict {
        message: String,
        conflicting_id: Option<String>,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    /// Open-session uniqueness lost to a concurrent insert.
    /// Recovered inside the clock service, never returned by clock-in.
    #[error("Concurrent open session for worker {worker_id} (tenant {tenant_id})")]
    RaceCondition { tenant_id: i64, worker_id: String },

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid time format: {0}")]
    InvalidTime(String),

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    #[error("Failed to save configuration")]
    ConfigSave,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

impl AppError {
    pub fn conflict(message: impl Into<String>, conflicting_id: Option<&str>) -> Self {
        AppError::Conflict {
            message: message.into(),
            conflicting_id: conflicting_id.map(str::to_string),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(_))
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, AppError::Conflict { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }

    /// Id of the session blocking the operation, if any.
    pub fn conflicting_id(&self) -> Option<&str> {
        match self {
            AppError::Conflict { conflicting_id, .. } => conflicting_id.as_deref(),
            _ => None,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
