use crate::db::pool::DbPool;
use crate::db::queries::count_by_status;
use crate::errors::AppResult;
use crate::utils::formatting::status_color;
use ansi_term::Colour::{Cyan, Fixed, Green, Yellow};
use rusqlite::OptionalExtension;
use std::fs;

const RESET: &str = "\x1b[0m";

pub fn print_db_info(pool: &DbPool, db_path: &str) -> AppResult<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{} {}", Cyan.paint("• File:"), Yellow.paint(db_path));
    println!("{} {:.2} MB", Cyan.paint("• Size:"), file_mb);

    //
    // 2) SESSIONS PER STATUS
    //
    let counts = count_by_status(&pool.conn)?;
    let total: i64 = counts.iter().map(|(_, n)| n).sum();
    println!(
        "{} {}",
        Cyan.paint("• Total sessions:"),
        Green.paint(total.to_string())
    );
    for (status, n) in counts {
        println!("    {}{:<9}{} {}", status_color(status), status.to_db_str(), RESET, n);
    }

    //
    // 3) CLOCK-IN RANGE
    //
    let (first, last): (Option<String>, Option<String>) = pool
        .conn
        .query_row(
            "SELECT MIN(clock_in), MAX(clock_in) FROM time_sessions",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?
        .unwrap_or((None, None));

    let dash = Fixed(8).paint("--").to_string();
    println!("{}", Cyan.paint("• Clock-in range:"));
    println!("    from: {}", first.unwrap_or_else(|| dash.clone()));
    println!("    to:   {}", last.unwrap_or(dash));

    //
    // 4) AUDIT ROWS
    //
    let log_rows: i64 = pool
        .conn
        .query_row("SELECT COUNT(*) FROM log", [], |row| row.get(0))?;
    println!("{} {}", Cyan.paint("• Log rows:"), log_rows);

    println!();
    Ok(())
}
