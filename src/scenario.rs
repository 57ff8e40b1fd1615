//! What-if scenarios applied to a baseline station series.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::station::models::{clamp_qos, overload_ramp, qos_score};
use crate::station::types::{HourlySample, StationProfile, StationSeries};

/// Name of the identity scenario.
pub const REFERENCE: &str = "Reference";
/// Name of the energy-saving scenario.
pub const ENERGY_SAVING: &str = "Energy-Saving Mode";
/// Name of the neighbor load-offload scenario.
pub const NEIGHBOR_OFFLOAD: &str = "Neighbor Offload";

/// Parameter key for the energy-saving fraction.
pub const SAVINGS_FRACTION_KEY: &str = "savings_fraction";
/// Parameter key for the offload fraction.
pub const OFFLOAD_FRACTION_KEY: &str = "offload_fraction";

/// Fraction used when a scenario's parameter is not supplied.
pub const DEFAULT_FRACTION: f64 = 0.15;
/// Smallest meaningful scenario fraction.
pub const MIN_FRACTION: f64 = 0.05;
/// Largest meaningful scenario fraction.
pub const MAX_FRACTION: f64 = 0.30;

/// Capacity lost per unit of savings fraction.
const SAVING_CAPACITY_FACTOR: f64 = 0.30;
/// Idle power saved per unit of savings fraction.
const SAVING_BASELINE_FACTOR: f64 = 0.40;
/// Dynamic power ceiling saved per unit of savings fraction.
const SAVING_DYNAMIC_FACTOR: f64 = 0.60;
/// Extra QoS penalty at full load under reduced headroom (points).
const SAVING_HEADROOM_PENALTY: f64 = 2.0;
/// QoS bonus at the maximum offload fraction (points).
const OFFLOAD_MAX_BONUS: f64 = 2.0;

/// Loosely typed scenario parameters, keyed by option name.
///
/// Missing values fall back to [`DEFAULT_FRACTION`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScenarioParameters {
    /// Energy-saving depth in [0.05, 0.30].
    pub savings_fraction: Option<f64>,
    /// Share of traffic moved to neighbor cells in [0.05, 0.30].
    pub offload_fraction: Option<f64>,
}

impl ScenarioParameters {
    /// Parameters with only the savings fraction set.
    pub fn savings(fraction: f64) -> Self {
        Self {
            savings_fraction: Some(fraction),
            ..Self::default()
        }
    }

    /// Parameters with only the offload fraction set.
    pub fn offload(fraction: f64) -> Self {
        Self {
            offload_fraction: Some(fraction),
            ..Self::default()
        }
    }

    /// Looks up a parameter by its option name.
    pub fn get(&self, key: &str) -> Option<f64> {
        match key {
            SAVINGS_FRACTION_KEY => self.savings_fraction,
            OFFLOAD_FRACTION_KEY => self.offload_fraction,
            _ => None,
        }
    }
}

/// A parameterized operational policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "name")]
pub enum Scenario {
    /// Baseline operation, no change.
    Reference,
    /// Lower transmit power and carriers at the cost of some capacity.
    EnergySaving {
        /// Savings depth `t`.
        savings_fraction: f64,
    },
    /// Hand a share of traffic over to neighboring cells.
    NeighborOffload {
        /// Offloaded traffic share `x`.
        offload_fraction: f64,
    },
}

impl Scenario {
    /// Display names of all scenarios, in menu order.
    pub const NAMES: &[&str] = &[REFERENCE, ENERGY_SAVING, NEIGHBOR_OFFLOAD];

    /// Resolves a scenario by display name.
    ///
    /// Returns `None` if `name` is not one of [`Scenario::NAMES`].
    pub fn from_name(name: &str, params: &ScenarioParameters) -> Option<Self> {
        match name {
            REFERENCE => Some(Self::Reference),
            ENERGY_SAVING => Some(Self::EnergySaving {
                savings_fraction: params.savings_fraction.unwrap_or(DEFAULT_FRACTION),
            }),
            NEIGHBOR_OFFLOAD => Some(Self::NeighborOffload {
                offload_fraction: params.offload_fraction.unwrap_or(DEFAULT_FRACTION),
            }),
            _ => None,
        }
    }

    /// Display name of this scenario.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Reference => REFERENCE,
            Self::EnergySaving { .. } => ENERGY_SAVING,
            Self::NeighborOffload { .. } => NEIGHBOR_OFFLOAD,
        }
    }

    /// Short file-friendly identifier.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Reference => "reference",
            Self::EnergySaving { .. } => "energy_saving",
            Self::NeighborOffload { .. } => "neighbor_offload",
        }
    }

    /// Produces a new series under this scenario; `baseline` is left untouched.
    pub fn apply(&self, baseline: &StationSeries) -> StationSeries {
        debug!(station = %baseline.station_id, scenario = %self, "applying scenario");
        match *self {
            Self::Reference => baseline.clone(),
            Self::EnergySaving { savings_fraction } => energy_saving(baseline, savings_fraction),
            Self::NeighborOffload { offload_fraction } => {
                neighbor_offload(baseline, offload_fraction)
            }
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reference => write!(f, "{REFERENCE}"),
            Self::EnergySaving { savings_fraction } => {
                write!(f, "{ENERGY_SAVING} ({:.0}%)", savings_fraction * 100.0)
            }
            Self::NeighborOffload { offload_fraction } => {
                write!(f, "{NEIGHBOR_OFFLOAD} ({:.0}%)", offload_fraction * 100.0)
            }
        }
    }
}

/// Applies the scenario called `name` to `baseline`.
///
/// An unrecognized name is passed through as the identity transform.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use cell_twin::scenario::{apply, ScenarioParameters};
/// use cell_twin::station::generate_at;
///
/// let fleet = generate_at(1, 24, 42, Utc::now());
/// let base = &fleet["BS-1"];
/// let same = apply(base, "Reference", &ScenarioParameters::default());
/// assert_eq!(&same, base);
/// ```
pub fn apply(baseline: &StationSeries, name: &str, params: &ScenarioParameters) -> StationSeries {
    match Scenario::from_name(name, params) {
        Some(scenario) => scenario.apply(baseline),
        None => {
            warn!(scenario = name, "unknown scenario, returning baseline unchanged");
            baseline.clone()
        }
    }
}

fn energy_saving(baseline: &StationSeries, t: f64) -> StationSeries {
    let base = baseline.profile;
    let profile = StationProfile {
        capacity_mbps: base.capacity_mbps * (1.0 - SAVING_CAPACITY_FACTOR * t),
        baseline_w: base.baseline_w * (1.0 - SAVING_BASELINE_FACTOR * t),
        dyn_w_max: base.dyn_w_max * (1.0 - SAVING_DYNAMIC_FACTOR * t),
    };

    let samples = baseline
        .samples
        .iter()
        .map(|s| {
            let u = profile.utilization(s.traffic_mbps);
            let qos = qos_score(u, s.qos_jitter) - SAVING_HEADROOM_PENALTY * overload_ramp(u);
            HourlySample {
                utilization: u,
                energy_w: profile.energy_w(u),
                qos: clamp_qos(qos),
                ..s.clone()
            }
        })
        .collect();

    StationSeries {
        station_id: baseline.station_id.clone(),
        profile,
        samples,
    }
}

fn neighbor_offload(baseline: &StationSeries, x: f64) -> StationSeries {
    let profile = baseline.profile;
    let bonus = OFFLOAD_MAX_BONUS * x / MAX_FRACTION;

    let samples = baseline
        .samples
        .iter()
        .map(|s| {
            let traffic_mbps = s.traffic_mbps * (1.0 - x);
            let u = profile.utilization(traffic_mbps);
            HourlySample {
                traffic_mbps,
                utilization: u,
                energy_w: profile.energy_w(u),
                qos: clamp_qos(qos_score(u, s.qos_jitter) + bonus),
                ..s.clone()
            }
        })
        .collect();

    StationSeries {
        station_id: baseline.station_id.clone(),
        profile,
        samples,
    }
}
