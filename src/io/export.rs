//! CSV export for station series, forecasts, and recommendations.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::SecondsFormat;

use crate::forecast::ForecastPoint;
use crate::recommend::Recommendation;
use crate::station::types::StationSeries;

/// Column header for station series export.
const SERIES_HEADER: &str = "time,traffic_mbps,utilization,energy_w,qos,\
                             capacity_mbps,baseline_w,dyn_w_max";
/// Column header for forecast export.
const FORECAST_HEADER: &str = "time,traffic_mbps";
/// Column header for recommendation export.
const RECOMMENDATION_HEADER: &str = "time_range,action,expected_impact";

/// Writes a station series as CSV to any writer.
///
/// One row per hour; hardware parameters are repeated on every row so the
/// file stands alone. Produces deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_series_csv(series: &StationSeries, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(SERIES_HEADER.split(',').map(str::trim))?;

    let p = series.profile;
    for s in &series.samples {
        wtr.write_record(&[
            s.time.to_rfc3339_opts(SecondsFormat::Secs, true),
            format!("{:.4}", s.traffic_mbps),
            format!("{:.4}", s.utilization),
            format!("{:.4}", s.energy_w),
            format!("{:.4}", s.qos),
            format!("{:.4}", p.capacity_mbps),
            format!("{:.4}", p.baseline_w),
            format!("{:.4}", p.dyn_w_max),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes forecast points as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_forecast_csv(points: &[ForecastPoint], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(FORECAST_HEADER.split(','))?;
    for p in points {
        wtr.write_record(&[
            p.time.to_rfc3339_opts(SecondsFormat::Secs, true),
            format!("{:.4}", p.traffic_mbps),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes recommendations as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_recommendations_csv(recs: &[Recommendation], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(RECOMMENDATION_HEADER.split(','))?;
    for r in recs {
        wtr.write_record([&r.time_range, &r.action, &r.expected_impact])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Exports a station series to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_series_csv(series: &StationSeries, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_series_csv(series, io::BufWriter::new(file))
}

/// Everything shown for one station, ready to be written to a directory.
#[derive(Debug, Clone, Copy)]
pub struct StationReport<'a> {
    /// Untransformed series.
    pub baseline: &'a StationSeries,
    /// Scenario-transformed series.
    pub scenario: &'a StationSeries,
    /// Short scenario identifier used in the file name.
    pub scenario_slug: &'a str,
    /// Timestamped traffic forecast.
    pub forecast: &'a [ForecastPoint],
    /// Recommended actions.
    pub recommendations: &'a [Recommendation],
}

/// Writes a station report into `dir`, creating it if needed.
///
/// Produces `<id>.csv`, `<id>_<scenario>.csv`, `<id>_forecast.csv`, and
/// `<id>_recommendations.csv`.
///
/// # Returns
///
/// Paths of the written files.
///
/// # Errors
///
/// Returns an `io::Error` if the directory or any file cannot be written.
pub fn export_report(report: &StationReport<'_>, dir: &Path) -> io::Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let id = &report.baseline.station_id;

    let baseline_path = dir.join(format!("{id}.csv"));
    export_series_csv(report.baseline, &baseline_path)?;

    let scenario_path = dir.join(format!("{id}_{}.csv", report.scenario_slug));
    export_series_csv(report.scenario, &scenario_path)?;

    let forecast_path = dir.join(format!("{id}_forecast.csv"));
    write_forecast_csv(report.forecast, io::BufWriter::new(File::create(&forecast_path)?))?;

    let recs_path = dir.join(format!("{id}_recommendations.csv"));
    write_recommendations_csv(
        report.recommendations,
        io::BufWriter::new(File::create(&recs_path)?),
    )?;

    Ok(vec![baseline_path, scenario_path, forecast_path, recs_path])
}
