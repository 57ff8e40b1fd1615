//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};

use cell_twin::station::generate_at;
use cell_twin::station::types::{Fleet, StationSeries};

/// Fixed anchor so series are reproducible across runs (a Monday, 23:00 UTC).
pub fn anchor() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 3, 23, 0, 0).unwrap()
}

/// Reference fleet: three stations, 72 hours, seed 42.
pub fn reference_fleet() -> Fleet {
    generate_at(3, 72, 42, anchor())
}

/// First station of the reference fleet (capacity 600 Mb/s).
pub fn reference_station() -> StationSeries {
    reference_fleet().swap_remove("BS-1").unwrap()
}

/// Asserts two floats agree to a relative tolerance.
pub fn assert_close(actual: f64, expected: f64, rel: f64) {
    let tol = rel * expected.abs().max(1.0);
    assert!(
        (actual - expected).abs() <= tol,
        "expected {expected}, got {actual} (tolerance {tol})"
    );
}
