use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::config::ConfigLogic;
use crate::errors::AppResult;
use crate::ui::messages::success;

/// Handle the `config` subcommand
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Config {
        print_config,
        edit_config,
        editor,
    } = cmd
    {
        let path = Config::config_file();

        if *print_config {
            ConfigLogic::print(cfg, &path)?;
        }

        if *edit_config {
            ConfigLogic::edit(&path, editor.as_deref())?;
            success(format!("Configuration saved to {}", path.display()));
        }
    }

    Ok(())
}
