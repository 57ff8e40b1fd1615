//! Scalar KPI summaries computed from a station series.

use std::fmt;

use serde::Serialize;

use crate::station::types::StationSeries;

/// Seconds per hourly sample.
const SECONDS_PER_HOUR: f64 = 3600.0;
/// Megabits per (1000-based) gigabyte.
const MEGABITS_PER_GB: f64 = 8000.0;

/// Aggregate indicators for one series.
///
/// Each sample is treated as a one-hour average, so summing hourly power in
/// watts yields watt-hours.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KpiSummary {
    /// Mean power draw (W).
    pub avg_power_w: f64,
    /// Total energy (kWh).
    pub energy_kwh: f64,
    /// Total carried data (GB, 1000-based).
    pub traffic_gb: f64,
    /// Energy per carried data (Wh/GB). NaN when no data was carried.
    pub energy_per_gb_wh: f64,
    /// Mean QoS score.
    pub avg_qos: f64,
}

impl KpiSummary {
    /// Computes all KPIs from a series.
    ///
    /// Means of an empty series are NaN, totals are zero.
    pub fn from_series(series: &StationSeries) -> Self {
        let n = series.len() as f64;
        let mut power_sum = 0.0_f64;
        let mut traffic_sum = 0.0_f64;
        let mut qos_sum = 0.0_f64;

        for s in &series.samples {
            power_sum += s.energy_w;
            traffic_sum += s.traffic_mbps;
            qos_sum += s.qos;
        }

        let energy_kwh = power_sum / 1000.0;
        let traffic_gb = traffic_sum * SECONDS_PER_HOUR / MEGABITS_PER_GB;
        let energy_per_gb_wh = if traffic_gb > 0.0 {
            energy_kwh * 1000.0 / traffic_gb
        } else {
            f64::NAN
        };

        Self {
            avg_power_w: power_sum / n,
            energy_kwh,
            traffic_gb,
            energy_per_gb_wh,
            avg_qos: qos_sum / n,
        }
    }

    /// Differences `self - baseline`, field by field.
    pub fn delta(&self, baseline: &Self) -> KpiDelta {
        KpiDelta {
            avg_power_w: self.avg_power_w - baseline.avg_power_w,
            energy_kwh: self.energy_kwh - baseline.energy_kwh,
            traffic_gb: self.traffic_gb - baseline.traffic_gb,
            energy_per_gb_wh: self.energy_per_gb_wh - baseline.energy_per_gb_wh,
            avg_qos: self.avg_qos - baseline.avg_qos,
        }
    }
}

/// Change of each KPI between a scenario and its baseline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KpiDelta {
    /// Mean power change (W).
    pub avg_power_w: f64,
    /// Total energy change (kWh).
    pub energy_kwh: f64,
    /// Carried data change (GB).
    pub traffic_gb: f64,
    /// Efficiency change (Wh/GB).
    pub energy_per_gb_wh: f64,
    /// Mean QoS change (points).
    pub avg_qos: f64,
}

/// Reduces a series to its [`KpiSummary`].
pub fn summarize(series: &StationSeries) -> KpiSummary {
    KpiSummary::from_series(series)
}

impl fmt::Display for KpiSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Average power:   {:.0} W", self.avg_power_w)?;
        writeln!(f, "Total energy:    {:.2} kWh", self.energy_kwh)?;
        writeln!(f, "Total traffic:   {:.1} GB", self.traffic_gb)?;
        writeln!(f, "Energy per GB:   {:.1} Wh/GB", self.energy_per_gb_wh)?;
        write!(f, "Average QoS:     {:.1}", self.avg_qos)
    }
}

impl fmt::Display for KpiDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Average power:   {:+.0} W", self.avg_power_w)?;
        writeln!(f, "Total energy:    {:+.2} kWh", self.energy_kwh)?;
        writeln!(f, "Total traffic:   {:+.1} GB", self.traffic_gb)?;
        writeln!(f, "Energy per GB:   {:+.1} Wh/GB", self.energy_per_gb_wh)?;
        write!(f, "Average QoS:     {:+.1} points", self.avg_qos)
    }
}
