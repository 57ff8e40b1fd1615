//! Base station model: hardware profiles, physics, and synthetic series.

/// Seeded synthetic series generator.
pub mod generator;
/// Utilization, power, and QoS formulas.
pub mod models;
pub mod types;

// Re-export the main types for convenience
pub use generator::{SignalGenerator, floor_to_hour, generate, generate_at};
pub use types::{Fleet, HourlySample, StationProfile, StationSeries};
