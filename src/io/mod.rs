//! File output for series, forecasts, and recommendations.

pub mod export;
