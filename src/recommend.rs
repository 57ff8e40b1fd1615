//! Rule-based operational recommendations from a traffic forecast.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::forecast::{DAILY_PERIOD, SeasonalNaiveForecast};
use crate::station::generator::floor_to_hour;

/// Forecast horizon used when none is given (hours).
pub const DEFAULT_STEPS: usize = 24;
/// Low-load hours needed before suggesting energy-saving mode.
const MIN_LOW_HOURS: usize = 2;
/// Peak hours needed before suggesting offload.
const MIN_PEAK_HOURS: usize = 1;
/// Ranges listed in one recommendation before eliding the rest.
const MAX_LISTED_RANGES: usize = 3;

/// Label of the fixed night-time window.
pub const NIGHT_WINDOW_LABEL: &str = "Night (approx. 01:00–05:00)";

/// Which rule produced a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    /// Low forecast load: enable energy-saving mode.
    EnergySaving,
    /// Forecast peaks: offload to neighbor cells.
    NeighborOffload,
    /// Very low average load: shut down carriers at night.
    NightShutdown,
}

/// One suggested operational action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    /// Rule that fired.
    pub kind: RecommendationKind,
    /// Human-readable clock-time window(s).
    pub time_range: String,
    /// What to do.
    pub action: String,
    /// Qualitative expected effect.
    pub expected_impact: String,
}

impl Recommendation {
    fn new(kind: RecommendationKind, time_range: String) -> Self {
        let (action, expected_impact) = match kind {
            RecommendationKind::EnergySaving => (
                "Enable energy-saving mode (reduce TX power / carriers)",
                "10–25% lower dynamic power; no or negligible QoS impact",
            ),
            RecommendationKind::NeighborOffload => (
                "Offload 10–20% of traffic to neighbor cells (eNodeB/gNodeB parameters)",
                "Peak-hour QoS +5–10 points; small energy change from load rebalancing",
            ),
            RecommendationKind::NightShutdown => (
                "Shut down carriers/antennas at low load (reduce MIMO order)",
                "~0.1–0.3 kWh saved per hour; limited QoS impact",
            ),
        };
        Self {
            kind,
            time_range,
            action: action.to_string(),
            expected_impact: expected_impact.to_string(),
        }
    }
}

/// Threshold table for the recommendation rules.
///
/// Rules are evaluated in a fixed order: low load, peak load, night average.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Recommender {
    /// Hourly utilization below which an hour counts as low load.
    pub low_utilization: f64,
    /// Hourly utilization above which an hour counts as a peak.
    pub peak_utilization: f64,
    /// Mean utilization below which the night shutdown is suggested.
    pub night_average_utilization: f64,
}

impl Default for Recommender {
    fn default() -> Self {
        Self {
            low_utilization: 0.35,
            peak_utilization: 0.85,
            night_average_utilization: 0.25,
        }
    }
}

impl Recommender {
    /// Derives recommendations for the `steps` hours after `start`.
    ///
    /// # Arguments
    ///
    /// * `traffic` - Observed traffic history (Mb/s), oldest first
    /// * `capacity_mbps` - Station capacity; non-positive yields no recommendations
    /// * `steps` - Forecast horizon in hours
    /// * `start` - Hour the forecast is anchored on; ranges are labeled relative to it
    pub fn recommend(
        &self,
        traffic: &[f64],
        capacity_mbps: f64,
        steps: usize,
        start: DateTime<Utc>,
    ) -> Vec<Recommendation> {
        let mut recs = Vec::new();
        if capacity_mbps.is_nan() || capacity_mbps <= 0.0 {
            return recs;
        }

        let fc = SeasonalNaiveForecast::new(DAILY_PERIOD).forecast(traffic, steps);
        let u: Vec<f64> = fc
            .iter()
            .map(|v| (v / capacity_mbps).clamp(0.0, 1.0))
            .collect();

        let low_mask: Vec<bool> = u.iter().map(|&x| x < self.low_utilization).collect();
        let peak_mask: Vec<bool> = u.iter().map(|&x| x > self.peak_utilization).collect();

        if count(&low_mask) >= MIN_LOW_HOURS {
            let ranges = hour_ranges(&low_mask, start);
            recs.push(Recommendation::new(
                RecommendationKind::EnergySaving,
                summarize_ranges(&ranges),
            ));
        }

        if count(&peak_mask) >= MIN_PEAK_HOURS {
            let ranges = hour_ranges(&peak_mask, start);
            recs.push(Recommendation::new(
                RecommendationKind::NeighborOffload,
                summarize_ranges(&ranges),
            ));
        }

        if !u.is_empty() {
            let avg_u = u.iter().sum::<f64>() / u.len() as f64;
            if avg_u < self.night_average_utilization {
                recs.push(Recommendation::new(
                    RecommendationKind::NightShutdown,
                    NIGHT_WINDOW_LABEL.to_string(),
                ));
            }
        }

        recs
    }
}

/// Recommendations for the next `steps` hours from the current UTC hour,
/// using the default thresholds.
///
/// Range labels are UTC clock times, not local wall-clock times. Use
/// [`recommend_from`] to label relative to another start.
pub fn recommend(traffic: &[f64], capacity_mbps: f64, steps: usize) -> Vec<Recommendation> {
    recommend_from(traffic, capacity_mbps, steps, floor_to_hour(Utc::now()))
}

/// Recommendations for the next `steps` hours from `start`, using the
/// default thresholds.
pub fn recommend_from(
    traffic: &[f64],
    capacity_mbps: f64,
    steps: usize,
    start: DateTime<Utc>,
) -> Vec<Recommendation> {
    Recommender::default().recommend(traffic, capacity_mbps, steps, start)
}

/// Collapses each maximal run of `true` into a clock-time range label.
///
/// A run covering forecast indices `i..=j` is labeled
/// `[start + (i + 1) h, start + (j + 2) h)`.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use cell_twin::recommend::hour_ranges;
///
/// let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let ranges = hour_ranges(&[false, true, true, false, true], start);
/// assert_eq!(ranges, vec!["02:00–04:00", "05:00–06:00"]);
/// ```
pub fn hour_ranges(mask: &[bool], start: DateTime<Utc>) -> Vec<String> {
    let mut ranges = Vec::new();
    let n = mask.len();
    let mut i = 0;
    while i < n {
        if !mask[i] {
            i += 1;
            continue;
        }
        let mut j = i;
        while j + 1 < n && mask[j + 1] {
            j += 1;
        }
        let t0 = start + TimeDelta::hours(i as i64 + 1);
        let t1 = start + TimeDelta::hours(j as i64 + 2);
        ranges.push(format!("{}–{}", t0.format("%H:%M"), t1.format("%H:%M")));
        i = j + 1;
    }
    ranges
}

fn summarize_ranges(ranges: &[String]) -> String {
    let shown = ranges[..ranges.len().min(MAX_LISTED_RANGES)].join(", ");
    if ranges.len() > MAX_LISTED_RANGES {
        format!("{shown}…")
    } else {
        shown
    }
}

fn count(mask: &[bool]) -> usize {
    mask.iter().filter(|&&b| b).count()
}
