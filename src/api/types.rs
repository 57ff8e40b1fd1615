//! API response and query types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::kpi::{KpiDelta, KpiSummary};
use crate::scenario::{REFERENCE, ScenarioParameters};
use crate::station::types::{HourlySample, StationProfile, StationSeries};

/// One station in the fleet listing.
#[derive(Debug, Serialize)]
pub struct StationInfo {
    /// Station label.
    pub station_id: String,
    /// Hardware parameters.
    pub profile: StationProfile,
    /// Number of hourly samples.
    pub hours: usize,
}

impl From<&StationSeries> for StationInfo {
    fn from(s: &StationSeries) -> Self {
        Self {
            station_id: s.station_id.clone(),
            profile: s.profile,
            hours: s.len(),
        }
    }
}

/// Single hourly row, flattened with the hardware it was computed against.
///
/// Field names follow the CSV export columns.
#[derive(Debug, Serialize)]
pub struct SampleRecord {
    /// Row index within the series.
    pub index: usize,
    /// Start of the hour (UTC).
    pub time: DateTime<Utc>,
    /// Traffic (Mb/s).
    pub traffic_mbps: f64,
    /// Utilization (0–1).
    pub utilization: f64,
    /// Power draw (W).
    pub energy_w: f64,
    /// QoS score.
    pub qos: f64,
    /// Effective capacity (Mb/s).
    pub capacity_mbps: f64,
    /// Effective idle power (W).
    pub baseline_w: f64,
    /// Effective dynamic power ceiling (W).
    pub dyn_w_max: f64,
}

impl SampleRecord {
    /// Builds a record from a sample and its series profile.
    pub fn new(index: usize, s: &HourlySample, p: &StationProfile) -> Self {
        Self {
            index,
            time: s.time,
            traffic_mbps: s.traffic_mbps,
            utilization: s.utilization,
            energy_w: s.energy_w,
            qos: s.qos,
            capacity_mbps: p.capacity_mbps,
            baseline_w: p.baseline_w,
            dyn_w_max: p.dyn_w_max,
        }
    }
}

/// Baseline and scenario KPIs side by side.
#[derive(Debug, Serialize)]
pub struct KpiComparison {
    /// Scenario name as requested (unknown names act as the reference).
    pub scenario_name: String,
    /// KPIs of the untransformed series.
    pub baseline: KpiSummary,
    /// KPIs of the transformed series.
    pub scenario: KpiSummary,
    /// `scenario - baseline`.
    pub delta: KpiDelta,
}

/// Scenario selection and optional inclusive row range.
#[derive(Debug, Default, Deserialize)]
pub struct ScenarioQuery {
    /// Scenario display name; defaults to the reference.
    pub scenario: Option<String>,
    /// Fraction passed to whichever parameter the scenario reads.
    pub fraction: Option<f64>,
    /// First row index (inclusive).
    pub from: Option<usize>,
    /// Last row index (inclusive).
    pub to: Option<usize>,
}

impl ScenarioQuery {
    /// Requested scenario name.
    pub fn name(&self) -> &str {
        self.scenario.as_deref().unwrap_or(REFERENCE)
    }

    /// Parameter map for the scenario engine.
    pub fn parameters(&self) -> ScenarioParameters {
        ScenarioParameters {
            savings_fraction: self.fraction,
            offload_fraction: self.fraction,
        }
    }
}

/// Forecast horizon override.
#[derive(Debug, Default, Deserialize)]
pub struct StepsQuery {
    /// Hours to forecast.
    pub steps: Option<usize>,
}

/// Error response body for 4xx errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn sample_record_copies_profile() {
        let s = HourlySample {
            time: Utc.with_ymd_and_hms(2024, 1, 1, 5, 0, 0).unwrap(),
            traffic_mbps: 300.0,
            utilization: 0.5,
            energy_w: 950.0,
            qos: 99.2,
            qos_jitter: -0.8,
        };
        let p = StationProfile::for_index(1);
        let r = SampleRecord::new(7, &s, &p);
        assert_eq!(r.index, 7);
        assert_eq!(r.traffic_mbps, 300.0);
        assert_eq!(r.capacity_mbps, 650.0);
        assert_eq!(r.baseline_w, 720.0);
    }

    #[test]
    fn scenario_query_defaults_to_reference() {
        let q = ScenarioQuery::default();
        assert_eq!(q.name(), REFERENCE);
        assert_eq!(q.parameters(), ScenarioParameters::default());
    }
}
