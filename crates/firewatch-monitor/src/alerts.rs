//! Escalation alerts and cycle logging.
//!
//! [`AlertCallback`] logs the outcome of every scheduled cycle.
//! [`run_escalation_alerts`] consumes the escalation stream and, for every
//! zone that reached an alerting level, resolves the nearest evacuation
//! route for that zone.

use std::sync::Arc;

use firewatch_core::{
    CycleReport, EvacuationPlanner, RefreshCallback, RefreshError, RouteCatalogSource, ZoneStore,
};
use firewatch_types::{EscalationEvent, EvacuationRoute};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

/// Callback that logs every scheduled refresh cycle.
#[derive(Debug, Default)]
pub struct AlertCallback {
    consecutive_failures: u32,
}

impl AlertCallback {
    /// Failures since the last completed cycle.
    pub const fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }
}

impl RefreshCallback for AlertCallback {
    fn on_cycle(&mut self, report: &CycleReport) {
        if self.consecutive_failures() > 0 {
            info!(
                failures = self.consecutive_failures,
                "Refresh recovered after failures"
            );
        }
        self.consecutive_failures = 0;
        debug!(
            cycle = report.cycle,
            zone_count = report.zone_count,
            escalations = report.escalations.len(),
            "Scheduled cycle complete"
        );
    }

    fn on_failure(&mut self, error: &RefreshError) {
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        warn!(
            error = %error,
            consecutive_failures = self.consecutive_failures,
            "Scheduled cycle failed"
        );
    }
}

/// Resolve the evacuation route for one escalation.
///
/// Returns `None` for non-alerting levels, for zones that left the store
/// since the event was raised, and when no route is available.
pub async fn route_for_escalation<C: RouteCatalogSource>(
    event: &EscalationEvent,
    store: &ZoneStore,
    planner: &EvacuationPlanner<C>,
) -> Option<EvacuationRoute> {
    if !event.new_level.is_alerting() {
        return None;
    }
    let zone = store.zone(&event.zone_id).await?;
    match planner.plan(zone.location()).await {
        Ok(route) => route,
        Err(e) => {
            warn!(zone_id = %event.zone_id, error = %e, "Evacuation planning failed");
            None
        }
    }
}

/// Consume escalation events until the channel closes.
pub async fn run_escalation_alerts<C: RouteCatalogSource>(
    mut events: broadcast::Receiver<EscalationEvent>,
    store: Arc<ZoneStore>,
    planner: EvacuationPlanner<C>,
) {
    loop {
        let event = match events.recv().await {
            Ok(event) => event,
            Err(RecvError::Lagged(missed)) => {
                warn!(missed, "Escalation consumer lagged, events dropped");
                continue;
            }
            Err(RecvError::Closed) => break,
        };

        if !event.new_level.is_alerting() {
            continue;
        }

        warn!(
            zone = %event.zone_name,
            level = %event.new_level,
            description = event.new_level.description(),
            "Fire risk alert"
        );

        match route_for_escalation(&event, &store, &planner).await {
            Some(route) => info!(
                zone = %event.zone_name,
                route_id = %route.id,
                route_name = %route.name,
                safe_zone = %route.safe_zone.name,
                "Evacuation route assigned"
            ),
            None => warn!(zone = %event.zone_name, "No evacuation route available"),
        }
    }
    debug!("Escalation consumer stopped");
}
