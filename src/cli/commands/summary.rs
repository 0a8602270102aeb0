use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::ReportLogic;
use crate::errors::AppResult;
use crate::models::{PayrollKpis, TimeWindow, WorkerSummary};
use crate::ui::messages::header;
use crate::utils::date::resolve_window;
use crate::utils::formatting::{mins2readable, money};
use crate::utils::table::Table;
use crate::utils::time::{Clock, to_db};
use serde::Serialize;

use super::{open_store, parse_filter};

#[derive(Serialize)]
struct SummaryReport<'a> {
    tenant_id: i64,
    window: &'a TimeWindow,
    workers: &'a [WorkerSummary],
    kpis: &'a PayrollKpis,
}

pub fn handle(cmd: &Commands, cfg: &Config, clock: &dyn Clock) -> AppResult<()> {
    if let Commands::Summary {
        worker,
        period,
        status,
        json,
    } = cmd
    {
        let window = resolve_window(period.as_deref(), clock.now())?;
        let filter = parse_filter(status)?;

        let pool = open_store(cfg)?;
        let rows =
            ReportLogic::worker_summaries(&pool, cfg.tenant_id, &window, filter, worker.as_deref())?;
        let kpis = ReportLogic::kpis(&pool, cfg.tenant_id, &window)?;

        if *json {
            let report = SummaryReport {
                tenant_id: cfg.tenant_id,
                window: &window,
                workers: &rows,
                kpis: &kpis,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
            return Ok(());
        }

        header(format!(
            "Summary {} → {}",
            to_db(&window.start),
            to_db(&window.end)
        ));

        let mut table = Table::new(&["WORKER", "ENTRIES", "WORKED", "GROSS", "UNPAID", "LAST IN"]);
        for r in &rows {
            table.add_row(vec![
                r.worker_id.clone(),
                r.entries.to_string(),
                mins2readable(r.total_minutes, false),
                money(Some(r.total_gross)),
                money(Some(r.unpaid_gross)),
                r.last_clock_in.as_ref().map(to_db).unwrap_or_default(),
            ]);
        }
        if table.is_empty() {
            println!("No sessions in the selected period.\n");
        } else {
            println!("{}", table.render());
        }

        println!("Total worked : {}", mins2readable(kpis.total_minutes, false));
        println!("Gross total  : {}", money(Some(kpis.gross_total)));
        println!("Unpaid total : {}", money(Some(kpis.unpaid_total)));
        println!("Open now     : {}", kpis.open_count);
    }

    Ok(())
}
