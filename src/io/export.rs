//! CSV export of a report's cost breakdown and cash-flow table.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::report::SizingReport;

const BREAKDOWN_HEADER: [&str; 3] = ["component", "amount", "share"];

const CASHFLOW_HEADER: [&str; 5] = ["year", "savings", "replacement_cost", "discounted", "cumulative"];

/// Writes the cost breakdown to a CSV file at `path`.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_breakdown(report: &SizingReport, path: &Path) -> io::Result<()> {
    write_breakdown(report, io::BufWriter::new(File::create(path)?))
}

/// Writes the cash-flow table to a CSV file at `path`.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_cash_flows(report: &SizingReport, path: &Path) -> io::Result<()> {
    write_cash_flows(report, io::BufWriter::new(File::create(path)?))
}

/// One row per cost line in display order, then a `Total` row.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_breakdown(report: &SizingReport, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(BREAKDOWN_HEADER)?;

    for slice in report.cost_slices() {
        wtr.write_record(&[
            slice.label.to_string(),
            format!("{:.2}", slice.amount),
            format!("{:.4}", slice.share),
        ])?;
    }
    wtr.write_record(&[
        "Total".to_string(),
        format!("{:.2}", report.costs.total()),
        format!("{:.4}", 1.0),
    ])?;

    wtr.flush()?;
    Ok(())
}

/// One row per projection year.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_cash_flows(report: &SizingReport, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(CASHFLOW_HEADER)?;

    for cf in &report.roi.cash_flows {
        wtr.write_record(&[
            cf.year.to_string(),
            format!("{:.2}", cf.savings),
            format!("{:.2}", cf.replacement_cost),
            format!("{:.2}", cf.discounted),
            format!("{:.2}", cf.cumulative),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
