//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use super::AppState;
use super::types::{
    ErrorResponse, KpiComparison, SampleRecord, ScenarioQuery, StationInfo, StepsQuery,
};
use crate::forecast::{ForecastPoint, MAX_STEPS, SeasonalNaiveForecast};
use crate::kpi::KpiSummary;
use crate::recommend::Recommendation;
use crate::scenario::{self, MAX_FRACTION, MIN_FRACTION};
use crate::station::types::StationSeries;

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error(status: StatusCode, message: String) -> ApiError {
    (status, Json(ErrorResponse { error: message }))
}

fn station<'a>(state: &'a AppState, id: &str) -> Result<&'a StationSeries, ApiError> {
    state
        .fleet
        .get(id)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, format!("unknown station `{id}`")))
}

fn check_fraction(query: &ScenarioQuery) -> Result<(), ApiError> {
    match query.fraction {
        Some(f) if !(MIN_FRACTION..=MAX_FRACTION).contains(&f) => Err(error(
            StatusCode::BAD_REQUEST,
            format!("`fraction` ({f}) must be in [{MIN_FRACTION}, {MAX_FRACTION}]"),
        )),
        _ => Ok(()),
    }
}

/// Lists every station with its hardware profile.
///
/// `GET /stations` → 200 + `Vec<StationInfo>` JSON
pub async fn list_stations(State(state): State<Arc<AppState>>) -> Json<Vec<StationInfo>> {
    Json(state.fleet.values().map(StationInfo::from).collect())
}

/// Returns hourly rows for one station, optionally scenario-transformed and
/// filtered by index range.
///
/// `GET /stations/{id}/series` → 200 + `Vec<SampleRecord>` JSON
/// `GET /stations/{id}/series?scenario=Neighbor%20Offload&fraction=0.2`
/// `GET /stations/{id}/series?from=10&to=5` → 400 + `ErrorResponse`
/// `GET /stations/{id}/series?fraction=2.0` → 400 + `ErrorResponse`
pub async fn get_series(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<ScenarioQuery>,
) -> Result<Json<Vec<SampleRecord>>, ApiError> {
    let baseline = station(&state, &id)?;
    check_fraction(&query)?;

    let from = query.from.unwrap_or(0);
    let to = query.to.unwrap_or(usize::MAX);
    if from > to {
        return Err(error(
            StatusCode::BAD_REQUEST,
            format!("`from` ({from}) must be <= `to` ({to})"),
        ));
    }

    let series = scenario::apply(baseline, query.name(), &query.parameters());
    let records: Vec<SampleRecord> = series
        .samples
        .iter()
        .enumerate()
        .filter(|(i, _)| *i >= from && *i <= to)
        .map(|(i, s)| SampleRecord::new(i, s, &series.profile))
        .collect();

    Ok(Json(records))
}

/// Compares baseline KPIs with a scenario's.
///
/// `GET /stations/{id}/kpi?scenario=Energy-Saving%20Mode&fraction=0.2`
/// → 200 + `KpiComparison` JSON
/// `GET /stations/{id}/kpi?fraction=NaN` → 400 + `ErrorResponse`
pub async fn get_kpi(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<ScenarioQuery>,
) -> Result<Json<KpiComparison>, ApiError> {
    let baseline = station(&state, &id)?;
    check_fraction(&query)?;
    let transformed = scenario::apply(baseline, query.name(), &query.parameters());

    let base_kpi = KpiSummary::from_series(baseline);
    let scen_kpi = KpiSummary::from_series(&transformed);
    Ok(Json(KpiComparison {
        scenario_name: query.name().to_string(),
        delta: scen_kpi.delta(&base_kpi),
        baseline: base_kpi,
        scenario: scen_kpi,
    }))
}

/// Timestamped traffic forecast for one station.
///
/// `GET /stations/{id}/forecast?steps=48` → 200 + `Vec<ForecastPoint>` JSON
/// `GET /stations/{id}/forecast?steps=0` → 400 + `ErrorResponse`
///
/// `steps` must be in `1..=MAX_STEPS` (four weeks).
pub async fn get_forecast(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<StepsQuery>,
) -> Result<Json<Vec<ForecastPoint>>, ApiError> {
    let series = station(&state, &id)?;
    let cfg = &state.config.forecast;
    let steps = query.steps.unwrap_or(cfg.steps);
    if !(1..=MAX_STEPS).contains(&steps) {
        return Err(error(
            StatusCode::BAD_REQUEST,
            format!("`steps` ({steps}) must be in [1, {MAX_STEPS}]"),
        ));
    }
    let points = SeasonalNaiveForecast::new(cfg.seasonal_period).points(series, steps);
    Ok(Json(points))
}

/// Recommended actions for one station over the configured horizon.
///
/// `GET /stations/{id}/recommendations` → 200 + `Vec<Recommendation>` JSON
pub async fn get_recommendations(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Recommendation>>, ApiError> {
    let series = station(&state, &id)?;
    let recs = state.config.recommender.recommend(
        &series.traffic(),
        series.profile.capacity_mbps,
        state.config.forecast.steps,
        state.forecast_start,
    );
    Ok(Json(recs))
}
