//! Integration tests for the API endpoints.
//!
//! Tests use Axum's `Router` directly via `tower::ServiceExt` without
//! starting a TCP server. This validates handler logic and routing
//! without needing a live network connection.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use firewatch_api::{AppState, build_router};
use firewatch_core::{
    EvacuationPlanner, FetchError, MonitorConfig, MonitorControl, RefreshScheduler, RiskScorer,
    StaticReadingSource, StaticRouteCatalog, ZoneReadingSource, ZoneStore,
};
use firewatch_types::{
    EnvironmentalFactors, EvacuationRoute, GeoPoint, RouteId, SafeZone, ZoneId, ZoneReading,
};
use serde_json::Value;
use tokio::sync::Notify;
use tower::ServiceExt;

type TestState = AppState<StaticReadingSource, StaticRouteCatalog>;

fn reading(id: &str, name: &str, temperature: f64, humidity: f64, wind_speed: f64) -> ZoneReading {
    ZoneReading {
        id: ZoneId::from(id),
        name: name.to_owned(),
        latitude: 30.35,
        longitude: 76.38,
        factors: EnvironmentalFactors {
            temperature,
            humidity,
            wind_speed,
        },
    }
}

fn route(id: &str, name: &str, points: &[(f64, f64)]) -> EvacuationRoute {
    let last = points.last().copied().unwrap_or((0.0, 0.0));
    EvacuationRoute {
        id: RouteId::from(id),
        name: name.to_owned(),
        points: points.iter().map(|&(lat, lng)| GeoPoint::new(lat, lng)).collect(),
        safe_zone: SafeZone {
            lat: last.0,
            lng: last.1,
            name: format!("{name} Safe Zone"),
        },
    }
}

async fn make_test_state() -> Arc<TestState> {
    let source = StaticReadingSource::new(vec![
        reading("zone1", "Model Town", 43.0, 20.0, 20.0),
        reading("zone4", "Tripuri", 36.0, 45.0, 10.0),
        reading("zone8", "Ranjit Nagar", 20.0, 70.0, 5.0),
    ]);
    let scheduler = Arc::new(RefreshScheduler::new(
        source,
        &MonitorConfig::default(),
        Arc::new(ZoneStore::new()),
        Arc::new(MonitorControl::new(true)),
    ));
    scheduler.refresh_now().await.unwrap();

    let catalog = StaticRouteCatalog::new(vec![
        route(
            "route1",
            "Northern Evacuation Route",
            &[(37.7749, -122.4194), (37.7833, -122.4167)],
        ),
        route(
            "route2",
            "Southern Evacuation Route",
            &[(37.7339, -122.4565), (37.7200, -122.4400)],
        ),
    ]);

    Arc::new(AppState::new(
        scheduler,
        EvacuationPlanner::new(catalog),
        RiskScorer::default(),
    ))
}

fn app(state: &Arc<TestState>) -> Router {
    build_router(Arc::clone(state))
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn get(state: &Arc<TestState>, uri: &str) -> (StatusCode, Value) {
    let response = app(state)
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

async fn post_json(state: &Arc<TestState>, uri: &str, body: &Value) -> (StatusCode, Value) {
    let response = app(state)
        .oneshot(
            Request::post(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

// =============================================================================
// Zones
// =============================================================================

#[tokio::test]
async fn test_list_zones() {
    let state = make_test_state().await;
    let (status, json) = get(&state, "/api/zones").await;

    assert_eq!(status, StatusCode::OK);
    let zones = json.as_array().unwrap();
    assert_eq!(zones.len(), 3);
    assert_eq!(zones[0]["id"], "zone1");
    assert_eq!(zones[0]["riskLevel"], "extreme");
    assert_eq!(zones[0]["factors"]["windSpeed"], 20.0);
    assert_eq!(zones[1]["riskLevel"], "high");
    assert_eq!(zones[2]["riskLevel"], "low");
}

#[tokio::test]
async fn test_list_zones_filtered_by_level() {
    let state = make_test_state().await;
    let (status, json) = get(&state, "/api/zones?minLevel=high").await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|z| z["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["zone1", "zone4"]);
}

#[tokio::test]
async fn test_get_zone_by_id() {
    let state = make_test_state().await;
    let (status, json) = get(&state, "/api/zones/zone4").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "Tripuri");
    assert_eq!(json["riskLevel"], "high");
}

#[tokio::test]
async fn test_get_zone_not_found() {
    let state = make_test_state().await;
    let (status, json) = get(&state, "/api/zones/zone99").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["status"], 404);
}

#[tokio::test]
async fn test_summary_and_snapshot() {
    let state = make_test_state().await;

    let (status, json) = get(&state, "/api/summary").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["cycle"], 1);
    assert_eq!(json["highest"], "extreme");
    assert_eq!(json["counts"]["medium"], 0);

    let (status, json) = get(&state, "/api/snapshot").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["cycle"], 1);
    assert_eq!(json["zones"].as_array().unwrap().len(), 3);
}

// =============================================================================
// Prediction
// =============================================================================

#[tokio::test]
async fn test_predict() {
    let state = make_test_state().await;
    let body = serde_json::json!({
        "locationName": "Patiala",
        "latitude": 30.3398,
        "longitude": 76.3869,
        "temperature": 25.0,
        "humidity": 60.0,
        "windSpeed": 10.0,
        "cloudCover": 40.0,
        "precipitation": 0.5,
        "windDirection": 180.0
    });
    let (status, json) = post_json(&state, "/api/predict", &body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["result"]["name"], "Prediction for Patiala");
    assert_eq!(json["result"]["riskLevel"], "medium");
    assert!(json["id"].as_str().unwrap().starts_with("prediction-"));
    assert_eq!(json["conditions"]["rain"], "light");
    assert_eq!(json["recommendedActions"].as_array().unwrap().len(), 0);

    // Predictions never touch the store.
    let (_, zones) = get(&state, "/api/zones").await;
    assert_eq!(zones.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_predict_rejects_invalid_input() {
    let state = make_test_state().await;
    let body = serde_json::json!({
        "locationName": "Nowhere",
        "latitude": 30.0,
        "longitude": 76.0,
        "temperature": 25.0,
        "humidity": 120.0,
        "windSpeed": 10.0,
        "cloudCover": 40.0,
        "precipitation": 0.0,
        "windDirection": 180.0
    });
    let (status, json) = post_json(&state, "/api/predict", &body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("humidity"));
}

// =============================================================================
// Evacuation
// =============================================================================

#[tokio::test]
async fn test_evacuation_plan_returns_nearest_route() {
    let state = make_test_state().await;
    let (status, json) = get(&state, "/api/evacuation?lat=37.73&lng=-122.45").await;

    assert_eq!(status, StatusCode::OK);
    let routes = json.as_array().unwrap();
    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0]["id"], "route2");
    assert_eq!(routes[0]["safeZone"]["name"], "Southern Evacuation Route Safe Zone");
}

#[tokio::test]
async fn test_evacuation_plan_rejects_invalid_point() {
    let state = make_test_state().await;
    let (status, _) = get(&state, "/api/evacuation?lat=120&lng=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_evacuation_options_are_ranked() {
    let state = make_test_state().await;
    let (status, json) = get(&state, "/api/evacuation/options?lat=37.7749&lng=-122.4194").await;

    assert_eq!(status, StatusCode::OK);
    let options = json.as_array().unwrap();
    assert_eq!(options.len(), 2);
    assert_eq!(options[0]["route"]["id"], "route1");
    assert!(options[0]["distanceKm"].as_f64().unwrap() < 1e-6);
    assert!(options[1]["lengthKm"].as_f64().unwrap() > 0.0);
}

// =============================================================================
// Operator
// =============================================================================

#[tokio::test]
async fn test_disable_and_enable() {
    let state = make_test_state().await;

    let (status, json) = post_json(&state, "/api/monitor/disable", &Value::Null).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["ok"], true);
    assert!(!state.control().is_enabled());

    let (_, json) = get(&state, "/api/monitor/status").await;
    assert_eq!(json["enabled"], false);
    assert_eq!(json["cycle"], 1);
    assert_eq!(json["inFlight"], false);
    assert_eq!(json["stats"]["completed"], 1);

    post_json(&state, "/api/monitor/enable", &Value::Null).await;
    assert!(state.control().is_enabled());
}

#[tokio::test]
async fn test_manual_refresh_reports_escalations() {
    let state = make_test_state().await;
    state.scheduler.source().set_readings(vec![
        reading("zone1", "Model Town", 43.0, 20.0, 20.0),
        reading("zone4", "Tripuri", 36.0, 45.0, 10.0),
        reading("zone8", "Ranjit Nagar", 46.0, 12.0, 28.0),
    ]);

    let (status, json) = post_json(&state, "/api/monitor/refresh", &Value::Null).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["outcome"], "completed");
    assert_eq!(json["cycle"], 2);
    let escalations = json["escalations"].as_array().unwrap();
    assert_eq!(escalations.len(), 1);
    assert_eq!(escalations[0]["zoneId"], "zone8");
    assert_eq!(escalations[0]["zoneName"], "Ranjit Nagar");
    assert_eq!(escalations[0]["newLevel"], "extreme");
}

#[tokio::test]
async fn test_failed_refresh_is_bad_gateway_and_keeps_zones() {
    let state = make_test_state().await;
    state.scheduler.source().set_failure(FetchError::Transport {
        message: "connection refused".to_owned(),
    });

    let (status, json) = post_json(&state, "/api/monitor/refresh", &Value::Null).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(json["error"].as_str().unwrap().contains("connection refused"));

    let (_, summary) = get(&state, "/api/summary").await;
    assert_eq!(summary["cycle"], 1);
}

/// Holds each fetch until the test opens the gate.
struct GatedSource {
    readings: Vec<ZoneReading>,
    entered: Notify,
    gate: Notify,
}

impl ZoneReadingSource for GatedSource {
    async fn fetch_zone_readings(&self) -> Result<Vec<ZoneReading>, FetchError> {
        self.entered.notify_one();
        self.gate.notified().await;
        Ok(self.readings.clone())
    }
}

#[tokio::test]
async fn test_refresh_completes_after_client_disconnects() {
    let scheduler = Arc::new(RefreshScheduler::new(
        GatedSource {
            readings: vec![reading("zone1", "Model Town", 43.0, 20.0, 20.0)],
            entered: Notify::new(),
            gate: Notify::new(),
        },
        &MonitorConfig::default(),
        Arc::new(ZoneStore::new()),
        Arc::new(MonitorControl::new(true)),
    ));
    let state = Arc::new(AppState::new(
        Arc::clone(&scheduler),
        EvacuationPlanner::new(StaticRouteCatalog::new(Vec::new())),
        RiskScorer::default(),
    ));

    // The client gives up while the fetch is still blocked.
    let request = build_router(Arc::clone(&state)).oneshot(
        Request::post("/api/monitor/refresh")
            .body(Body::empty())
            .unwrap(),
    );
    let abandoned = tokio::time::timeout(Duration::from_millis(50), request).await;
    assert!(abandoned.is_err());

    scheduler.source().entered.notified().await;
    scheduler.source().gate.notify_one();

    for _ in 0..100 {
        if scheduler.stats().completed == 1 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    assert_eq!(scheduler.stats().completed, 1);
    assert_eq!(scheduler.store().snapshot().await.cycle, 1);
    assert!(!scheduler.is_in_flight());
}
