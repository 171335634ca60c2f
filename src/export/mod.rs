//! Text serializations of a finished forecast: CSV, JSON and a printable table.

use std::{fs, io::Write, path::Path};

use cashflow_config::ExportFormat;
use cashflow_domain::{CashFlowProjection, ForecastReport, ForecastSummary};

use crate::errors::ForecastError;

pub const CSV_HEADER: [&str; 6] = [
    "Month",
    "Inflow",
    "Outflow",
    "Recurring Expenses",
    "One-time Expenses",
    "Balance",
];

/// Writes one CSV row per projected month, amounts with two decimals.
pub fn write_csv<W: Write>(
    projections: &[CashFlowProjection],
    writer: W,
) -> Result<(), ForecastError> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(CSV_HEADER)?;
    for projection in projections {
        csv.write_record([
            projection.month.clone(),
            money(projection.inflow),
            money(projection.outflow),
            money(projection.recurring_expenses),
            money(projection.one_time_expenses),
            money(projection.balance),
        ])?;
    }
    csv.flush()?;
    Ok(())
}

pub fn to_csv_string(projections: &[CashFlowProjection]) -> Result<String, ForecastError> {
    let mut buffer = Vec::new();
    write_csv(projections, &mut buffer)?;
    String::from_utf8(buffer).map_err(|err| ForecastError::InvalidArgument(err.to_string()))
}

pub fn to_json_string(report: &ForecastReport) -> Result<String, ForecastError> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Fixed-width table for terminals and print-outs.
pub fn render_table(projections: &[CashFlowProjection]) -> String {
    let mut out = format!(
        "{:<10} {:>14} {:>14} {:>14} {:>14} {:>14}\n",
        "Month", "Inflow", "Outflow", "Recurring", "One-time", "Balance"
    );
    out.push_str(&"-".repeat(85));
    out.push('\n');
    for projection in projections {
        out.push_str(&format!(
            "{:<10} {:>14} {:>14} {:>14} {:>14} {:>14}\n",
            projection.month,
            money(projection.inflow),
            money(projection.outflow),
            money(projection.recurring_expenses),
            money(projection.one_time_expenses),
            money(projection.balance),
        ));
    }
    out
}

pub fn render_summary(summary: &ForecastSummary, currency: &str) -> String {
    [
        (
            "Recurring expenses / month",
            money(summary.total_recurring_monthly),
        ),
        ("Current balance", money(summary.current_balance)),
        (
            "Projected balance (6 months)",
            money(summary.projected_balance_6_months),
        ),
        (
            "Projected balance (12 months)",
            money(summary.projected_balance_12_months),
        ),
    ]
    .iter()
    .map(|(label, value)| format!("{label:<30} {value:>14} {currency}\n"))
    .chain(std::iter::once(format!(
        "{:<30} {:>14}\n",
        "Recurring records", summary.recurring_expense_count
    )))
    .collect()
}

/// Renders the report in `format` (`Table` includes the summary block).
pub fn render(
    report: &ForecastReport,
    format: ExportFormat,
    currency: &str,
) -> Result<String, ForecastError> {
    match format {
        ExportFormat::Csv => to_csv_string(&report.projections),
        ExportFormat::Json => to_json_string(report),
        ExportFormat::Table => Ok(format!(
            "{}\n{}",
            render_table(&report.projections),
            render_summary(&report.summary, currency)
        )),
    }
}

pub fn export_to_path(
    report: &ForecastReport,
    format: ExportFormat,
    currency: &str,
    path: &Path,
) -> Result<(), ForecastError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, render(report, format, currency)?)?;
    Ok(())
}

fn money(value: f64) -> String {
    // Avoids printing "-0.00" for tiny negative rounding residue.
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        "0.00".into()
    } else {
        format!("{rounded:.2}")
    }
}
