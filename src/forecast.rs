//! Forecasting utilities for station traffic.

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

use crate::station::types::StationSeries;

/// Hours in one daily cycle.
pub const DAILY_PERIOD: usize = 24;
/// Longest accepted forecast horizon: four weeks of hours.
pub const MAX_STEPS: usize = 24 * 28;

/// Seasonal-naive forecaster: "the next cycle repeats the last one".
///
/// Copies the most recent full cycle of valid observations and tiles it
/// forward. With less than one cycle of history it repeats the last valid
/// value, or zero if there is none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonalNaiveForecast {
    /// Cycle length in samples.
    pub seasonal_period: usize,
}

impl Default for SeasonalNaiveForecast {
    fn default() -> Self {
        Self {
            seasonal_period: DAILY_PERIOD,
        }
    }
}

impl SeasonalNaiveForecast {
    /// Creates a forecaster with the given cycle length.
    pub fn new(seasonal_period: usize) -> Self {
        Self { seasonal_period }
    }

    /// Produce a forecast for the given horizon.
    ///
    /// # Arguments
    ///
    /// * `history` - Observed values, oldest first. Non-finite values (NaN and
    ///   both infinities) are treated as missing and skipped.
    /// * `steps` - Number of values to forecast
    ///
    /// # Returns
    ///
    /// A vector of forecast values with length equal to `steps`.
    pub fn forecast(&self, history: &[f64], steps: usize) -> Vec<f64> {
        if steps == 0 {
            return Vec::new();
        }

        let valid: Vec<f64> = history.iter().copied().filter(|v| v.is_finite()).collect();
        let period = self.seasonal_period;

        if period == 0 || valid.len() < period {
            let last = valid.last().copied().unwrap_or(0.0);
            return vec![last; steps];
        }

        valid[valid.len() - period..]
            .iter()
            .copied()
            .cycle()
            .take(steps)
            .collect()
    }

    /// Forecasts a station's traffic, timestamped from the hour after its
    /// last sample.
    ///
    /// Returns an empty vector for an empty series.
    pub fn points(&self, series: &StationSeries, steps: usize) -> Vec<ForecastPoint> {
        let Some(last) = series.last_time() else {
            return Vec::new();
        };
        self.forecast(&series.traffic(), steps)
            .into_iter()
            .enumerate()
            .map(|(k, traffic_mbps)| ForecastPoint {
                time: last + TimeDelta::hours(k as i64 + 1),
                traffic_mbps,
            })
            .collect()
    }
}

/// Forecasts `steps` values of `series` with a seasonal-naive model.
///
/// # Examples
///
/// ```
/// use cell_twin::forecast::forecast;
///
/// let history = [1.0, 2.0, 3.0, 4.0, 5.0];
/// assert_eq!(forecast(&history, 5, 2), vec![4.0, 5.0, 4.0, 5.0, 4.0]);
/// assert_eq!(forecast(&history, 2, 10), vec![5.0, 5.0]);
/// ```
pub fn forecast(series: &[f64], steps: usize, seasonal_period: usize) -> Vec<f64> {
    SeasonalNaiveForecast::new(seasonal_period).forecast(series, steps)
}

/// One forecast value with the hour it applies to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastPoint {
    /// Start of the forecast hour (UTC).
    pub time: DateTime<Utc>,
    /// Predicted traffic (Mb/s).
    pub traffic_mbps: f64,
}

/// Daily seasonal-naive traffic forecast timestamped from the hour after the
/// last observed sample.
///
/// Returns an empty vector for an empty series.
pub fn forecast_points(series: &StationSeries, steps: usize) -> Vec<ForecastPoint> {
    SeasonalNaiveForecast::default().points(series, steps)
}
