use crate::error::Result;
use crate::loader::LoadReport;
use crate::reports::{cost_rows, order_count_rows};
use crate::types::DashboardSummary;
use crate::util::format_int;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};

pub const TITLE: &str = "MONITOR GESTION DEL MANTENIMIENTO";

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

pub fn render_table<T>(rows: &[T], max_rows: usize) -> String
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        return "(no rows)".to_string();
    }
    Table::new(slice).with(Style::markdown()).to_string()
}

pub fn print_load_report(report: &LoadReport) {
    println!(
        "Processing dataset... ({} rows read, {} kept)",
        format_int(report.total_rows),
        format_int(report.kept_rows)
    );
    if report.malformed_rows > 0 {
        println!(
            "Note: {} malformed rows skipped.",
            format_int(report.malformed_rows)
        );
    }
    if report.unmapped_org_rows > 0 || report.unmapped_class_rows > 0 {
        println!(
            "Info: {} rows with unmapped org code, {} with unmapped order class.",
            format_int(report.unmapped_org_rows),
            format_int(report.unmapped_class_rows)
        );
    }
    if report.coerced_costs > 0 {
        println!(
            "Info: {} non-numeric costs counted as 0.",
            format_int(report.coerced_costs)
        );
    }
    println!();
}

pub fn print_dashboard(summary: &DashboardSummary, max_rows: usize) {
    println!("{}\n", TITLE);
    println!("Org group: {}", summary.org_selection);
    println!("Process area: {}\n", summary.process_selection);
    println!("Orders:            {}", format_int(summary.total_orders));
    println!("Corrective orders: {}", format_int(summary.corrective_orders));
    println!("Preventive orders: {}", format_int(summary.preventive_orders));
    println!("Real total cost:   {}\n", format_int(summary.total_real_cost));

    println!("Orders by org group");
    println!("{}\n", render_table(&order_count_rows(&summary.orders_by_org_group), max_rows));
    println!("Orders by process area");
    println!("{}\n", render_table(&order_count_rows(&summary.orders_by_process_area), max_rows));
    println!("Real cost by process area");
    println!("{}\n", render_table(&cost_rows(&summary.cost_by_process_area), max_rows));
    println!("Orders by month");
    println!("{}\n", render_table(&order_count_rows(&summary.orders_by_period), max_rows));
    println!("Real cost by month");
    println!("{}\n", render_table(&cost_rows(&summary.cost_by_period), max_rows));
}

/// Write every series as CSV plus the whole summary as JSON into `dir`.
/// Returns the paths written.
pub fn export_dashboard(dir: &Path, summary: &DashboardSummary) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let mut written = Vec::new();

    let count_series = [
        ("orders_by_org_group.csv", &summary.orders_by_org_group),
        ("orders_by_process_area.csv", &summary.orders_by_process_area),
        ("orders_by_month.csv", &summary.orders_by_period),
    ];
    for (name, series) in count_series {
        let path = dir.join(name);
        write_csv(&path, &order_count_rows(series))?;
        written.push(path);
    }

    let cost_series = [
        ("cost_by_process_area.csv", &summary.cost_by_process_area),
        ("cost_by_month.csv", &summary.cost_by_period),
    ];
    for (name, series) in cost_series {
        let path = dir.join(name);
        write_csv(&path, &cost_rows(series))?;
        written.push(path);
    }

    let path = dir.join("dashboard.json");
    write_json(&path, summary)?;
    written.push(path);
    Ok(written)
}
