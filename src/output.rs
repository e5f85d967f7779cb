//! Output formatting and persistence for traffic reports.
//!
//! Supports pretty-printing, JSON serialization, and CSV export of the three
//! views for the rendering layer.

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info};

use crate::filter::FilteredSet;
use crate::observation::Observation;
use crate::pipeline::TrafficReport;
use csv::WriterBuilder;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// Rows shown by [`preview`] unless the caller asks otherwise.
pub const PREVIEW_ROWS: usize = 5;

/// Logs a report using Rust's debug pretty-print format.
pub fn print_pretty(report: &TrafficReport) {
    debug!("{:#?}", report);
}

/// Logs a one-line summary of a report, and the full report as pretty-printed
/// JSON at debug level.
pub fn print_json(report: &TrafficReport) -> Result<()> {
    info!(
        filtered_rows = report.filtered_rows,
        streets = report.top_streets.len(),
        years = report.yearly_series.len(),
        heat_points = report.heat_points.len(),
        "Report summary"
    );
    debug!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

/// Writes a report as pretty-printed JSON, replacing any existing file.
pub fn write_json(path: &Path, report: &TrafficReport) -> Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, report)?;
    debug!(path = %path.display(), "Report written");
    Ok(())
}

/// Writes `rows` to a CSV file with a header line, replacing any existing file.
///
/// An empty slice still produces a valid, empty file.
pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);

    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    debug!(path = %path.display(), rows = rows.len(), "CSV written");
    Ok(())
}

/// Writes the three views of a report as `top_streets.csv`,
/// `yearly_series.csv` and `heat_points.csv` under `dir`.
pub fn export_views(dir: &Path, report: &TrafficReport) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;

    let top = dir.join("top_streets.csv");
    let yearly = dir.join("yearly_series.csv");
    let heat = dir.join("heat_points.csv");

    write_csv(&top, &report.top_streets)?;
    write_csv(&yearly, &report.yearly_series)?;
    write_csv(&heat, &report.heat_points)?;

    info!(dir = %dir.display(), "Views exported");
    Ok(vec![top, yearly, heat])
}

/// The first `rows` filtered observations, as shown above the charts.
pub fn preview(filtered: &FilteredSet, rows: usize) -> &[Observation] {
    filtered.head(rows)
}
