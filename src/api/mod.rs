//! REST API over a generated station fleet.
//!
//! Provides read-only GET endpoints:
//! - `/stations`: station ids and hardware profiles
//! - `/stations/{id}/series`: hourly rows, optionally scenario-transformed
//! - `/stations/{id}/kpi`: baseline vs scenario KPIs
//! - `/stations/{id}/forecast`: seasonal-naive traffic forecast
//! - `/stations/{id}/recommendations`: rule-based actions

mod handlers;
mod types;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use chrono::{DateTime, Utc};

use crate::config::TwinConfig;
use crate::station::types::Fleet;

pub use types::{
    ErrorResponse, KpiComparison, SampleRecord, ScenarioQuery, StationInfo, StepsQuery,
};

/// Immutable application state shared across all request handlers.
///
/// Constructed once after the fleet is generated and wrapped in
/// `Arc`; no locks needed since all data is read-only.
pub struct AppState {
    /// Configuration the fleet was generated from.
    pub config: TwinConfig,
    /// Generated baseline series.
    pub fleet: Fleet,
    /// Hour recommendations are labeled from.
    pub forecast_start: DateTime<Utc>,
}

/// Builds the axum router with all API routes.
///
/// # Arguments
///
/// * `state` - Shared application state
///
/// # Returns
///
/// Configured `Router` ready to serve.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/stations", get(handlers::list_stations))
        .route("/stations/{id}/series", get(handlers::get_series))
        .route("/stations/{id}/kpi", get(handlers::get_kpi))
        .route("/stations/{id}/forecast", get(handlers::get_forecast))
        .route(
            "/stations/{id}/recommendations",
            get(handlers::get_recommendations),
        )
        .with_state(state)
}

/// Binds to the given address and serves the API until the process exits.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
