use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Overrides the configuration directory (used by tests and packaging).
pub const HOME_ENV: &str = "RTIMECLOCK_HOME";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_tenant")]
    pub tenant_id: i64,
    #[serde(default = "default_max_hours")]
    pub autoclose_max_hours: i64,
    #[serde(default = "default_source")]
    pub default_source: String,
    #[serde(default = "default_manual_source")]
    pub manual_source: String,
}

fn default_database() -> String {
    Config::database_file().to_string_lossy().to_string()
}
fn default_tenant() -> i64 {
    1
}
fn default_max_hours() -> i64 {
    16
}
fn default_source() -> String {
    "cli".to_string()
}
fn default_manual_source() -> String {
    "admin_manual".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            tenant_id: default_tenant(),
            autoclose_max_hours: default_max_hours(),
            default_source: default_source(),
            manual_source: default_manual_source(),
        }
    }
}

impl Config {
    /// `$HOME/.rtimeclock`, `%APPDATA%\rtimeclock` on Windows.
    pub fn config_dir() -> PathBuf {
        if let Ok(dir) = env::var(HOME_ENV) {
            return PathBuf::from(dir);
        }
        if cfg!(target_os = "windows") {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("rtimeclock")
        } else {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".rtimeclock")
        }
    }

    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rtimeclock.conf")
    }

    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rtimeclock.sqlite")
    }

    /// Load the configuration file, or defaults when there is none.
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
        serde_yaml::from_str(&content).map_err(|e| AppError::Config(e.to_string()))
    }

    pub fn save(&self, path: &Path) -> AppResult<()> {
        let yaml = serde_yaml::to_string(self).map_err(|e| AppError::Config(e.to_string()))?;
        fs::write(path, yaml).map_err(|_| AppError::ConfigSave)
    }

    /// Create the configuration directory, write a default configuration
    /// (skipped in test mode) and return it.
    pub fn init_all(custom_db: Option<&str>, is_test: bool) -> AppResult<Self> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        let database = match custom_db {
            Some(name) => crate::utils::path::resolve_in(&dir, name),
            None => Self::database_file(),
        };

        let cfg = Config {
            database: database.to_string_lossy().to_string(),
            ..Self::default()
        };

        if !is_test {
            cfg.save(&Self::config_file())?;
        }
        Ok(cfg)
    }
}
