//! REST API endpoint handlers for zone data, predictions, and evacuation.
//!
//! Zone reads are served from the store's current snapshot.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/api/zones` | List zones (optionally at or above a level) |
//! | `GET` | `/api/zones/{id}` | Get single zone |
//! | `GET` | `/api/summary` | Per-level zone counts |
//! | `GET` | `/api/snapshot` | The full current snapshot |
//! | `POST` | `/api/predict` | One-off prediction for a weather record |
//! | `GET` | `/api/evacuation` | Nearest evacuation route for a point |
//! | `GET` | `/api/evacuation/options` | Every route ranked by distance |

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use firewatch_core::{RouteCatalogSource, ZoneReadingSource};
use firewatch_types::{EvacuationRoute, FireRiskData, GeoPoint, RiskLevel, WeatherData, ZoneId};

use crate::error::ApiError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query parameter structs
// ---------------------------------------------------------------------------

/// Query parameters for the `GET /api/zones` endpoint.
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZonesQuery {
    /// Only return zones at or above this level.
    pub min_level: Option<RiskLevel>,
}

/// Query parameters for the evacuation endpoints.
#[derive(Debug, serde::Deserialize)]
pub struct PointQuery {
    /// Latitude of the query point.
    pub lat: f64,
    /// Longitude of the query point.
    pub lng: f64,
}

/// One entry of `GET /api/evacuation/options`.
#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteOptionView {
    /// The route.
    pub route: EvacuationRoute,
    /// Kilometres from the query point to the route origin.
    pub distance_km: f64,
    /// Total route length in kilometres.
    pub length_km: f64,
}

// ---------------------------------------------------------------------------
// GET /api/zones -- list zones
// ---------------------------------------------------------------------------

/// List monitored zones in snapshot order.
pub async fn list_zones<S: ZoneReadingSource, C: RouteCatalogSource>(
    State(state): State<Arc<AppState<S, C>>>,
    Query(query): Query<ZonesQuery>,
) -> impl IntoResponse {
    let snapshot = state.store().snapshot().await;
    let min_level = query.min_level.unwrap_or(RiskLevel::Low);
    let zones: Vec<FireRiskData> = snapshot
        .at_or_above(min_level)
        .map(FireRiskData::from)
        .collect();
    Json(zones)
}

// ---------------------------------------------------------------------------
// GET /api/zones/{id} -- single zone
// ---------------------------------------------------------------------------

/// Get one zone by id.
pub async fn get_zone<S: ZoneReadingSource, C: RouteCatalogSource>(
    State(state): State<Arc<AppState<S, C>>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let zone_id = ZoneId::from(id);
    let zone = state
        .store()
        .zone(&zone_id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("zone {zone_id}")))?;
    Ok(Json(zone))
}

// ---------------------------------------------------------------------------
// GET /api/summary, GET /api/snapshot
// ---------------------------------------------------------------------------

/// Per-level zone counts for the current snapshot.
pub async fn get_summary<S: ZoneReadingSource, C: RouteCatalogSource>(
    State(state): State<Arc<AppState<S, C>>>,
) -> impl IntoResponse {
    Json(state.store().summary().await)
}

/// The full current snapshot.
pub async fn get_snapshot<S: ZoneReadingSource, C: RouteCatalogSource>(
    State(state): State<Arc<AppState<S, C>>>,
) -> impl IntoResponse {
    let snapshot = state.store().snapshot().await;
    Json(snapshot.as_ref().clone())
}

// ---------------------------------------------------------------------------
// POST /api/predict
// ---------------------------------------------------------------------------

/// Score a weather record without touching the zone store.
pub async fn predict<S: ZoneReadingSource, C: RouteCatalogSource>(
    State(state): State<Arc<AppState<S, C>>>,
    Json(weather): Json<WeatherData>,
) -> Result<impl IntoResponse, ApiError> {
    let report = firewatch_core::predict_report(&state.scorer, &weather)?;
    Ok(Json(report))
}

// ---------------------------------------------------------------------------
// GET /api/evacuation, GET /api/evacuation/options
// ---------------------------------------------------------------------------

/// The nearest evacuation route, as a list of zero or one routes.
pub async fn get_evacuation_plan<S: ZoneReadingSource, C: RouteCatalogSource>(
    State(state): State<Arc<AppState<S, C>>>,
    Query(query): Query<PointQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let route = state
        .planner
        .plan(GeoPoint::new(query.lat, query.lng))
        .await?;
    let routes: Vec<EvacuationRoute> = route.into_iter().collect();
    Ok(Json(routes))
}

/// Every catalog route ranked by distance to its origin.
pub async fn get_evacuation_options<S: ZoneReadingSource, C: RouteCatalogSource>(
    State(state): State<Arc<AppState<S, C>>>,
    Query(query): Query<PointQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let options = state
        .planner
        .options(GeoPoint::new(query.lat, query.lng))
        .await?;
    let views: Vec<RouteOptionView> = options
        .into_iter()
        .map(|o| RouteOptionView {
            route: o.route,
            distance_km: o.distance_km,
            length_km: o.length_km,
        })
        .collect();
    Ok(Json(views))
}
