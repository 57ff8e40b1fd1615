//! Synthetic hourly traffic, power, and QoS series for a fleet of stations.

use std::f64::consts::PI;

use chrono::{DateTime, DurationRound, TimeDelta, Timelike, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::debug;

use super::models::{gaussian_noise, qos_score};
use super::types::{Fleet, HourlySample, StationProfile, StationSeries, station_id};

/// Floor of the daily traffic factor (fraction of capacity).
const TRAFFIC_FLOOR: f64 = 0.25;
/// Amplitude of the morning bump.
const MORNING_AMPLITUDE: f64 = 0.35;
/// Amplitude of the evening bump.
const EVENING_AMPLITUDE: f64 = 0.40;
/// Hour the morning sine is centred on.
const MORNING_HOUR: f64 = 8.0;
/// Hour the evening sine is centred on.
const EVENING_HOUR: f64 = 18.0;
/// Phase shift between consecutive stations (hours).
const PHASE_STEP_HOURS: f64 = 2.0;
/// Traffic noise standard deviation as a fraction of capacity.
const TRAFFIC_NOISE_SCALE: f64 = 0.06;
/// QoS noise standard deviation (points).
const QOS_NOISE_STD: f64 = 0.8;
/// Traffic lower bound as a fraction of capacity.
const TRAFFIC_MIN_FRACTION: f64 = 0.05;
/// Traffic upper bound as a fraction of capacity.
const TRAFFIC_MAX_FRACTION: f64 = 1.2;

/// Shape of the daily demand curve in [0.25, 1.0] for a given hour of day.
///
/// Two phase-shifted sine waves approximate the morning and evening peaks.
///
/// # Arguments
///
/// * `hour` - Hour of day (0–23)
/// * `phase_shift` - Per-station shift in hours
pub fn daily_traffic_factor(hour: u32, phase_shift: f64) -> f64 {
    let h = f64::from(hour);
    let bump = |centre: f64| ((2.0 * PI * (h - centre + phase_shift) / 24.0).sin() + 1.0) / 2.0;
    TRAFFIC_FLOOR + MORNING_AMPLITUDE * bump(MORNING_HOUR) + EVENING_AMPLITUDE * bump(EVENING_HOUR)
}

/// Truncates a timestamp to the start of its hour.
pub fn floor_to_hour(t: DateTime<Utc>) -> DateTime<Utc> {
    t.duration_trunc(TimeDelta::hours(1)).unwrap_or(t)
}

/// Hourly timestamps ending at `end` (inclusive), `horizon_hours` long.
pub fn hourly_index(end: DateTime<Utc>, horizon_hours: usize) -> Vec<DateTime<Utc>> {
    (0..horizon_hours)
        .map(|k| end - TimeDelta::hours((horizon_hours - 1 - k) as i64))
        .collect()
}

/// Seeded generator of synthetic station series.
///
/// Owns a single random stream. Stations are generated in index order and
/// every station consumes its traffic draws before its QoS draws, so the
/// output is fully determined by the seed, the station count, and the horizon.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use cell_twin::station::generator::SignalGenerator;
///
/// let end = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
/// let fleet = SignalGenerator::new(42).generate(2, 48, end);
/// assert_eq!(fleet.len(), 2);
/// assert_eq!(fleet["BS-1"].len(), 48);
/// ```
#[derive(Debug, Clone)]
pub struct SignalGenerator {
    rng: StdRng,
}

impl SignalGenerator {
    /// Creates a generator whose stream is seeded with `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generates `station_count` series of `horizon_hours` samples ending at
    /// the hour containing `end`.
    ///
    /// A zero station count yields an empty fleet and a zero horizon yields
    /// empty series.
    pub fn generate(
        &mut self,
        station_count: usize,
        horizon_hours: usize,
        end: DateTime<Utc>,
    ) -> Fleet {
        let times = hourly_index(floor_to_hour(end), horizon_hours);
        let mut fleet = Fleet::with_capacity(station_count);
        for index in 0..station_count {
            let series = self.station_series(index, &times);
            debug!(
                station = %series.station_id,
                capacity_mbps = series.profile.capacity_mbps,
                hours = series.len(),
                "generated station series"
            );
            fleet.insert(series.station_id.clone(), series);
        }
        fleet
    }

    fn station_series(&mut self, index: usize, times: &[DateTime<Utc>]) -> StationSeries {
        let profile = StationProfile::for_index(index);
        let cap = profile.capacity_mbps;
        let phase_shift = index as f64 * PHASE_STEP_HOURS;

        let traffic: Vec<f64> = times
            .iter()
            .map(|t| {
                let demand = cap * daily_traffic_factor(t.hour(), phase_shift);
                let noise = gaussian_noise(&mut self.rng, TRAFFIC_NOISE_SCALE * cap);
                (demand + noise).clamp(
                    TRAFFIC_MIN_FRACTION * cap,
                    TRAFFIC_MAX_FRACTION * cap,
                )
            })
            .collect();

        let jitter: Vec<f64> = times
            .iter()
            .map(|_| gaussian_noise(&mut self.rng, QOS_NOISE_STD))
            .collect();

        let samples = times
            .iter()
            .zip(traffic)
            .zip(jitter)
            .map(|((&time, traffic_mbps), qos_jitter)| {
                let utilization = profile.utilization(traffic_mbps);
                HourlySample {
                    time,
                    traffic_mbps,
                    utilization,
                    energy_w: profile.energy_w(utilization),
                    qos: qos_score(utilization, qos_jitter),
                    qos_jitter,
                }
            })
            .collect();

        StationSeries {
            station_id: station_id(index),
            profile,
            samples,
        }
    }
}

/// Generates a fleet whose last sample is the current UTC hour.
pub fn generate(station_count: usize, horizon_hours: usize, seed: u64) -> Fleet {
    generate_at(station_count, horizon_hours, seed, Utc::now())
}

/// Generates a fleet whose last sample is the hour containing `end`.
pub fn generate_at(
    station_count: usize,
    horizon_hours: usize,
    seed: u64,
    end: DateTime<Utc>,
) -> Fleet {
    SignalGenerator::new(seed).generate(station_count, horizon_hours, end)
}
