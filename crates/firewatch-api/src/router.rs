//! Axum router construction for the API.
//!
//! Assembles all routes (REST + `WebSocket`) into a single [`Router`]
//! with CORS and request tracing enabled for cross-origin dashboard access.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use firewatch_core::{RouteCatalogSource, ZoneReadingSource};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, operator, ws};

/// Build the complete Axum router for the API server.
///
/// The router includes:
/// - `GET /ws/escalations` -- `WebSocket` escalation stream
/// - `GET /api/zones` -- list zones, `?minLevel=` filters by level
/// - `GET /api/zones/{id}` -- single zone
/// - `GET /api/summary` -- per-level counts
/// - `GET /api/snapshot` -- full current snapshot
/// - `POST /api/predict` -- one-off prediction
/// - `GET /api/evacuation` -- nearest route for `?lat=&lng=`
/// - `GET /api/evacuation/options` -- all routes ranked by distance
/// - `/api/monitor/*` -- schedule control and manual refresh
///
/// CORS allows any origin for development.
pub fn build_router<S, C>(state: Arc<AppState<S, C>>) -> Router
where
    S: ZoneReadingSource + 'static,
    C: RouteCatalogSource + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // WebSocket
        .route("/ws/escalations", get(ws::ws_escalations::<S, C>))
        // Zones
        .route("/api/zones", get(handlers::list_zones::<S, C>))
        .route("/api/zones/{id}", get(handlers::get_zone::<S, C>))
        .route("/api/summary", get(handlers::get_summary::<S, C>))
        .route("/api/snapshot", get(handlers::get_snapshot::<S, C>))
        // Prediction and evacuation
        .route("/api/predict", post(handlers::predict::<S, C>))
        .route("/api/evacuation", get(handlers::get_evacuation_plan::<S, C>))
        .route(
            "/api/evacuation/options",
            get(handlers::get_evacuation_options::<S, C>),
        )
        // Operator
        .route("/api/monitor/enable", post(operator::enable::<S, C>))
        .route("/api/monitor/disable", post(operator::disable::<S, C>))
        .route("/api/monitor/refresh", post(operator::refresh::<S, C>))
        .route("/api/monitor/status", get(operator::status::<S, C>))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
