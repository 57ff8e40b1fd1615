//! Integration tests for the REST API feature.

#![cfg(feature = "api")]

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::util::ServiceExt;

use cell_twin::api::{AppState, router};
use cell_twin::config::TwinConfig;
use cell_twin::kpi::summarize;

use common::{anchor, assert_close, reference_fleet, reference_station};

fn build_api_state() -> Arc<AppState> {
    Arc::new(AppState {
        config: TwinConfig::reference(),
        fleet: reference_fleet(),
        forecast_start: anchor(),
    })
}

async fn get(uri: &str) -> (StatusCode, serde_json::Value) {
    let app = router(build_api_state());
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap();
    (status, json)
}

#[tokio::test]
async fn stations_endpoint_lists_reference_fleet() {
    let (status, json) = get("/stations").await;
    assert_eq!(status, StatusCode::OK);

    let arr = json.as_array().unwrap();
    assert_eq!(arr.len(), 3);
    let caps: Vec<f64> = arr
        .iter()
        .map(|s| s["profile"]["capacity_mbps"].as_f64().unwrap())
        .collect();
    assert_eq!(caps, [600.0, 650.0, 700.0]);
}

#[tokio::test]
async fn full_series_matches_generated_rows() {
    let (status, json) = get("/stations/BS-1/series").await;
    assert_eq!(status, StatusCode::OK);

    let base = reference_station();
    let arr = json.as_array().unwrap();
    assert_eq!(arr.len(), base.len());
    assert_eq!(arr[71]["time"], "2024-06-03T23:00:00Z");
    assert_eq!(arr[10]["traffic_mbps"].as_f64().unwrap(), base.samples[10].traffic_mbps);
    assert!(arr[0].get("qos_jitter").is_none());
}

#[tokio::test]
async fn series_range_clamps_to_end() {
    let (status, json) = get("/stations/BS-2/series?from=70&to=500").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn kpi_endpoint_agrees_with_library() {
    let uri = "/stations/BS-1/kpi?scenario=Energy-Saving%20Mode&fraction=0.2";
    let (status, json) = get(uri).await;
    assert_eq!(status, StatusCode::OK);

    let expected = summarize(&reference_station());
    assert_close(
        json["baseline"]["energy_kwh"].as_f64().unwrap(),
        expected.energy_kwh,
        1e-12,
    );
    assert!(json["delta"]["energy_kwh"].as_f64().unwrap() < 0.0);
    assert!(json["delta"]["avg_qos"].as_f64().unwrap() <= 0.0);
}

#[tokio::test]
async fn unknown_scenario_acts_as_reference() {
    let (status, json) = get("/stations/BS-3/kpi?scenario=Turbo").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["scenario_name"], "Turbo");
    assert_eq!(json["baseline"], json["scenario"]);
}

#[tokio::test]
async fn forecast_defaults_to_configured_steps() {
    let (status, json) = get("/stations/BS-1/forecast").await;
    assert_eq!(status, StatusCode::OK);
    let arr = json.as_array().unwrap();
    assert_eq!(arr.len(), 24);
    assert_eq!(arr[0]["time"], "2024-06-04T00:00:00Z");
    assert_eq!(arr[23]["time"], "2024-06-04T23:00:00Z");
}

#[tokio::test]
async fn unknown_station_returns_404_everywhere() {
    for path in ["series", "kpi", "forecast", "recommendations"] {
        let (status, json) = get(&format!("/stations/BS-42/{path}")).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{path}");
        assert!(json["error"].is_string());
    }
}

#[tokio::test]
async fn offload_beyond_whole_cell_is_rejected() {
    let (status, json) = get("/stations/BS-1/series?scenario=Neighbor%20Offload&fraction=2.0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("fraction"));

    let (status, _) = get("/stations/BS-1/forecast?steps=100000000000").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
