//! Digital twin of a cellular base-station fleet.
//!
//! Generates synthetic hourly traffic, energy, and QoS series, evaluates
//! what-if scenarios against them, and derives forecasts and operational
//! recommendations.

/// TOML configuration and presets.
pub mod config;
/// Seasonal-naive traffic forecasting.
pub mod forecast;
/// CSV export.
pub mod io;
/// Energy, traffic, and QoS indicators.
pub mod kpi;
/// Tracing subscriber setup.
pub mod logging;
/// Rule-based operational recommendations.
pub mod recommend;
/// What-if scenarios applied to a baseline series.
pub mod scenario;
/// Station hardware models and the synthetic signal generator.
pub mod station;

/// Read-only REST API over a generated fleet.
#[cfg(feature = "api")]
pub mod api;
