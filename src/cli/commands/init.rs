use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::init_db;
use crate::db::log;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};
use crate::utils::time::Clock;

/// Handle the `init` command: config directory, configuration file
/// (skipped with `--test`), database file and all pending migrations.
pub fn handle(cli: &Cli, clock: &dyn Clock) -> AppResult<()> {
    let cfg = Config::init_all(cli.db.as_deref(), cli.test)?;

    println!("⚙️  Initializing rtimeclock…");
    if !cli.test {
        println!("📄 Config file : {}", Config::config_file().display());
    }
    println!("🗄️  Database   : {}", cfg.database);

    let pool = DbPool::new(&cfg.database)?;
    init_db(&pool.conn)?;

    if let Err(e) = log::ttlog(
        &pool.conn,
        clock.now(),
        "init",
        &cfg.database,
        "Database initialized",
    ) {
        warning(format!("Failed to write audit log: {}", e));
    }

    success(format!("Database initialized at {}", cfg.database));
    Ok(())
}
