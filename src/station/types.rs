//! Core station types: hardware profile, hourly samples, and series containers.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;

use super::models;

/// Base capacity of the first station (Mb/s).
pub const BASE_CAPACITY_MBPS: f64 = 600.0;
/// Capacity added per station index (Mb/s).
pub const CAPACITY_STEP_MBPS: f64 = 50.0;
/// Idle power draw of the first station (W).
pub const BASE_BASELINE_W: f64 = 700.0;
/// Idle power added per station index (W).
pub const BASELINE_STEP_W: f64 = 20.0;
/// Dynamic power ceiling shared by all stations (W).
pub const DEFAULT_DYN_W_MAX: f64 = 600.0;

/// Hardware parameters of one base station.
///
/// Constant across a generated series. Scenarios that change the effective
/// hardware (e.g. energy-saving mode) return a series with a new profile.
///
/// # Examples
///
/// ```
/// use cell_twin::station::types::StationProfile;
///
/// let p = StationProfile::for_index(2);
/// assert_eq!(p.capacity_mbps, 700.0);
/// assert_eq!(p.baseline_w, 740.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StationProfile {
    /// Nominal traffic capacity (Mb/s, positive).
    pub capacity_mbps: f64,
    /// Power drawn at zero load (W).
    pub baseline_w: f64,
    /// Extra power drawn at full load (W).
    pub dyn_w_max: f64,
}

impl StationProfile {
    /// Heterogeneous hardware for the station at zero-based `index`.
    pub fn for_index(index: usize) -> Self {
        let i = index as f64;
        Self {
            capacity_mbps: BASE_CAPACITY_MBPS + CAPACITY_STEP_MBPS * i,
            baseline_w: BASE_BASELINE_W + BASELINE_STEP_W * i,
            dyn_w_max: DEFAULT_DYN_W_MAX,
        }
    }

    /// Load fraction for `traffic_mbps` against this profile's capacity.
    pub fn utilization(&self, traffic_mbps: f64) -> f64 {
        models::utilization(traffic_mbps, self.capacity_mbps)
    }

    /// Power draw at utilization `u`.
    pub fn energy_w(&self, u: f64) -> f64 {
        models::energy_w(u, self.baseline_w, self.dyn_w_max)
    }
}

/// One hourly observation of a station.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlySample {
    /// Start of the hour (UTC, hour-aligned).
    pub time: DateTime<Utc>,
    /// Offered traffic (Mb/s, non-negative).
    pub traffic_mbps: f64,
    /// Traffic divided by capacity, clamped to [0, 1].
    pub utilization: f64,
    /// Power draw averaged over the hour (W).
    pub energy_w: f64,
    /// Service quality score (0–100).
    pub qos: f64,
    /// QoS noise drawn at generation time, reused when scenarios recompute QoS.
    #[serde(skip)]
    pub qos_jitter: f64,
}

/// Hourly series for a single station, ordered by time with no gaps.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationSeries {
    /// Ordinal label such as `"BS-1"`.
    pub station_id: String,
    /// Hardware the series was computed against.
    pub profile: StationProfile,
    /// One sample per hour, ascending.
    pub samples: Vec<HourlySample>,
}

impl StationSeries {
    /// Number of hourly samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the series holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Traffic column (Mb/s).
    pub fn traffic(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.traffic_mbps).collect()
    }

    /// Utilization column.
    pub fn utilization(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.utilization).collect()
    }

    /// Power column (W).
    pub fn energy(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.energy_w).collect()
    }

    /// QoS column.
    pub fn qos(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.qos).collect()
    }

    /// Timestamp of the most recent sample, if any.
    pub fn last_time(&self) -> Option<DateTime<Utc>> {
        self.samples.last().map(|s| s.time)
    }
}

/// Generated stations keyed by id, in generation order.
pub type Fleet = IndexMap<String, StationSeries>;

/// Label for the station at zero-based `index`.
pub fn station_id(index: usize) -> String {
    format!("BS-{}", index + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_increments_per_index() {
        let p0 = StationProfile::for_index(0);
        let p1 = StationProfile::for_index(1);
        assert_eq!(p0.capacity_mbps, 600.0);
        assert_eq!(p1.capacity_mbps, 650.0);
        assert_eq!(p0.baseline_w, 700.0);
        assert_eq!(p1.baseline_w, 720.0);
        assert_eq!(p0.dyn_w_max, p1.dyn_w_max);
    }

    #[test]
    fn station_ids_are_one_based() {
        assert_eq!(station_id(0), "BS-1");
        assert_eq!(station_id(4), "BS-5");
    }

    #[test]
    fn profile_energy_at_extremes() {
        let p = StationProfile::for_index(0);
        assert_eq!(p.energy_w(0.0), 700.0);
        assert!((p.energy_w(1.0) - 1300.0).abs() < 1e-9);
    }
}
