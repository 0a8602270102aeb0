use crate::config::Config;
use crate::errors::{AppError, AppResult};
use std::path::Path;
use std::process::Command;

pub struct ConfigLogic;

impl ConfigLogic {
    /// Print the effective configuration (file values plus CLI overrides).
    pub fn print(cfg: &Config, path: &Path) -> AppResult<()> {
        let yaml = serde_yaml::to_string(cfg).map_err(|e| AppError::Config(e.to_string()))?;
        println!("# {}", path.display());
        println!("{}", yaml.trim_end());
        Ok(())
    }

    pub fn edit(path: &Path, editor: Option<&str>) -> AppResult<()> {
        if !path.exists() {
            Config::default().save(path)?;
        }

        let ed = editor
            .map(str::to_string)
            .or_else(|| std::env::var("EDITOR").ok())
            .unwrap_or_else(|| {
                if cfg!(target_os = "windows") {
                    "notepad".into()
                } else {
                    "nano".into()
                }
            });

        let status = Command::new(&ed)
            .arg(path)
            .status()
            .map_err(|e| AppError::Config(format!("cannot launch {}: {}", ed, e)))?;
        if !status.success() {
            return Err(AppError::Config(format!("{} exited with {}", ed, status)));
        }

        // Refuse to leave a file behind that the next run cannot parse.
        Config::load_from(path)?;
        Ok(())
    }
}
