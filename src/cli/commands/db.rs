use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::migrate::{pending_migrations, run_pending_migrations};
use crate::db::pool::DbPool;
use crate::db::stats;
use crate::errors::AppResult;
use ansi_term::Colour::{Cyan, Green, Red};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Db {
        migrate,
        check,
        vacuum,
        info,
    } = cmd
    {
        let pool = DbPool::new(&cfg.database)?;

        if *migrate {
            let pending = pending_migrations(&pool.conn)?;
            println!("{}", Cyan.paint(format!("▶ {} pending migration(s)…", pending.len())));
            let applied = run_pending_migrations(&pool.conn)?;
            println!("{}\n", Green.paint(format!("✔ {} migration(s) applied.", applied)));
        }

        if *info {
            stats::print_db_info(&pool, &cfg.database)?;
        }

        if *check {
            println!("{}", Cyan.paint("▶ Running integrity check…"));
            let integrity: String = pool
                .conn
                .query_row("PRAGMA integrity_check;", [], |row| row.get(0))?;

            if integrity == "ok" {
                println!("{}\n", Green.paint("✔ Integrity check passed."));
            } else {
                println!("{} {}\n", Red.paint("✘ Integrity check failed:"), integrity);
            }
        }

        if *vacuum {
            println!("{}", Cyan.paint("▶ Running VACUUM…"));
            pool.conn.execute_batch("VACUUM;")?;
            println!("{}\n", Green.paint("✔ Vacuum completed."));
        }
    }

    Ok(())
}
