use crate::db::log::{LogRow, load_log};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use ansi_term::Colour;

const MAX_TARGET: usize = 40;

fn color_for_operation(op: &str) -> Colour {
    match op {
        "clock_in" => Colour::Green,
        "clock_out" => Colour::Cyan,
        "create" => Colour::Green,
        "edit" => Colour::Yellow,
        "delete" => Colour::Red,
        "autoclose" => Colour::RGB(255, 153, 51),
        "pay" => Colour::Blue,
        "rate" => Colour::Fixed(245),
        "migration_applied" | "init" => Colour::Purple,
        _ => Colour::White,
    }
}

fn shorten(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

pub struct LogLogic;

impl LogLogic {
    pub fn print_log(pool: &DbPool, operation: Option<&str>) -> AppResult<()> {
        let entries: Vec<LogRow> = load_log(&pool.conn, operation)?;
        if entries.is_empty() {
            println!("No log entries.");
            return Ok(());
        }

        let id_w = entries
            .iter()
            .map(|e| e.id.to_string().len())
            .max()
            .unwrap_or(1);
        let op_w = entries.iter().map(|e| e.operation.len()).max().unwrap_or(4);
        let target_w = entries
            .iter()
            .map(|e| shorten(&e.target, MAX_TARGET).chars().count())
            .max()
            .unwrap_or(0);

        println!("📜 Audit log:\n");
        for e in entries {
            // Pad before painting: ANSI codes would throw the width off.
            let op = format!("{:<op_w$}", e.operation, op_w = op_w);
            println!(
                "{:>id_w$}: {} | {} {:<target_w$} => {}",
                e.id,
                e.date,
                color_for_operation(&e.operation).paint(op),
                shorten(&e.target, MAX_TARGET),
                e.message,
                id_w = id_w,
                target_w = target_w
            );
        }
        Ok(())
    }
}
