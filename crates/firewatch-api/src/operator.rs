//! Operator REST API handlers for runtime control of the refresh schedule.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/api/monitor/enable` | Enable scheduled refresh |
//! | `POST` | `/api/monitor/disable` | Disable scheduled refresh |
//! | `POST` | `/api/monitor/refresh` | Run a refresh cycle now |
//! | `GET` | `/api/monitor/status` | Schedule state and counters |

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use firewatch_core::{
    MonitorStatus, RefreshOutcome, RefreshStats, RouteCatalogSource, ZoneReadingSource,
};
use firewatch_types::EscalationEvent;

use crate::error::ApiError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Generic success response.
#[derive(Debug, serde::Serialize)]
struct OperatorResponse {
    /// Whether the operation succeeded.
    ok: bool,
    /// Human-readable message.
    message: String,
}

/// Response body for `POST /api/monitor/refresh`.
#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    /// `completed` or `skipped`.
    pub outcome: &'static str,
    /// Cycle number of the installed snapshot, when one was installed.
    pub cycle: Option<u64>,
    /// Zones in the installed snapshot, when one was installed.
    pub zone_count: Option<usize>,
    /// Zones that escalated in this cycle.
    pub escalations: Vec<EscalationEvent>,
}

/// Response body for `GET /api/monitor/status`.
#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    /// Control flags.
    #[serde(flatten)]
    pub status: MonitorStatus,
    /// Whether a cycle is running right now.
    pub in_flight: bool,
    /// Cycle number of the installed snapshot.
    pub cycle: u64,
    /// Scheduler counters.
    pub stats: RefreshStats,
}

// ---------------------------------------------------------------------------
// POST /api/monitor/enable, POST /api/monitor/disable
// ---------------------------------------------------------------------------

/// Enable scheduled refresh. The next cycle runs one interval later.
pub async fn enable<S: ZoneReadingSource, C: RouteCatalogSource>(
    State(state): State<Arc<AppState<S, C>>>,
) -> impl IntoResponse {
    state.control().enable();
    Json(OperatorResponse {
        ok: true,
        message: "Scheduled refresh enabled".to_owned(),
    })
}

/// Disable scheduled refresh. A cycle in flight still completes.
pub async fn disable<S: ZoneReadingSource, C: RouteCatalogSource>(
    State(state): State<Arc<AppState<S, C>>>,
) -> impl IntoResponse {
    state.control().disable();
    Json(OperatorResponse {
        ok: true,
        message: "Scheduled refresh disabled".to_owned(),
    })
}

// ---------------------------------------------------------------------------
// POST /api/monitor/refresh
// ---------------------------------------------------------------------------

/// Run a refresh cycle now, sharing the single-flight guard with the
/// schedule.
///
/// The cycle runs on its own task so it still completes and installs its
/// snapshot when the client goes away before the response is sent.
pub async fn refresh<S, C>(
    State(state): State<Arc<AppState<S, C>>>,
) -> Result<impl IntoResponse, ApiError>
where
    S: ZoneReadingSource + 'static,
    C: RouteCatalogSource,
{
    let scheduler = Arc::clone(&state.scheduler);
    let outcome = tokio::spawn(async move { scheduler.refresh_now().await })
        .await
        .map_err(|e| ApiError::Internal(format!("refresh task: {e}")))??;
    let body = match outcome {
        RefreshOutcome::Completed(report) => RefreshResponse {
            outcome: "completed",
            cycle: Some(report.cycle),
            zone_count: Some(report.zone_count),
            escalations: report.escalations,
        },
        RefreshOutcome::Skipped => RefreshResponse {
            outcome: "skipped",
            cycle: None,
            zone_count: None,
            escalations: Vec::new(),
        },
    };
    Ok(Json(body))
}

// ---------------------------------------------------------------------------
// GET /api/monitor/status
// ---------------------------------------------------------------------------

/// Current schedule state and refresh counters.
pub async fn status<S: ZoneReadingSource, C: RouteCatalogSource>(
    State(state): State<Arc<AppState<S, C>>>,
) -> impl IntoResponse {
    let cycle = state.store().snapshot().await.cycle;
    Json(StatusResponse {
        status: state.control().status(),
        in_flight: state.scheduler.is_in_flight(),
        cycle,
        stats: state.scheduler.stats(),
    })
}
