//! Shared application state for the API server.
//!
//! [`AppState`] bundles the refresh scheduler (and through it the zone
//! store, schedule control, and escalation stream), the evacuation
//! planner, and the scorer used for one-off predictions. Handlers read
//! zones from the store's current snapshot and never block a refresh.

use std::sync::Arc;

use firewatch_core::{
    EvacuationPlanner, MonitorControl, RefreshScheduler, RiskScorer, RouteCatalogSource,
    ZoneReadingSource, ZoneStore,
};

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor.
pub struct AppState<S, C> {
    /// The refresh scheduler driving the zone store.
    pub scheduler: Arc<RefreshScheduler<S>>,
    /// Resolves evacuation routes.
    pub planner: EvacuationPlanner<C>,
    /// Scores one-off predictions.
    pub scorer: RiskScorer,
}

impl<S: ZoneReadingSource, C: RouteCatalogSource> AppState<S, C> {
    /// Create application state.
    pub const fn new(
        scheduler: Arc<RefreshScheduler<S>>,
        planner: EvacuationPlanner<C>,
        scorer: RiskScorer,
    ) -> Self {
        Self {
            scheduler,
            planner,
            scorer,
        }
    }

    /// The zone store.
    pub fn store(&self) -> &ZoneStore {
        self.scheduler.store()
    }

    /// The schedule control.
    pub fn control(&self) -> &MonitorControl {
        self.scheduler.control()
    }
}
