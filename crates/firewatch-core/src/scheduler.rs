//! The refresh scheduler: periodic re-evaluation of every monitored zone.
//!
//! Each refresh cycle runs these steps in order:
//!
//! 1. **Fetch** -- pull fresh readings from the [`ZoneReadingSource`]
//!    (bounded by the configured fetch timeout).
//! 2. **Score** -- validate and classify each reading with the
//!    [`RiskScorer`], assembling the next [`ZoneSnapshot`].
//! 3. **Detect** -- diff the installed snapshot against the new one with
//!    [`detect_escalations`].
//! 4. **Install** -- swap the new snapshot into the [`ZoneStore`] and
//!    publish the escalation events.
//!
//! Any failure before step 4 aborts the cycle and leaves the store exactly
//! as it was. At most one cycle is in flight at a time: a scheduled tick or
//! manual refresh that arrives while a cycle is running is skipped, not
//! queued. Because a skipped tick produces no snapshot, the next completed
//! cycle is compared against the same still-installed snapshot and no
//! transition is ever missed.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use chrono::Utc;
use firewatch_geo::GeoError;
use firewatch_types::{EscalationEvent, GeoPoint, Zone, ZoneId, ZoneReading, ZoneSnapshot};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::config::MonitorConfig;
use crate::control::MonitorControl;
use crate::escalation::detect_escalations;
use crate::scoring::{RiskScorer, ScoringError};
use crate::source::{FetchError, ZoneReadingSource};
use crate::store::ZoneStore;

/// Errors that abort a single refresh cycle.
///
/// None of these stop the schedule; the next tick starts a fresh cycle.
#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    /// The reading source failed or timed out.
    #[error("fetch failed: {source}")]
    Fetch {
        /// The underlying fetch error.
        #[from]
        source: FetchError,
    },

    /// A reading carried out-of-range factors.
    #[error("zone {zone_id} has an invalid reading: {source}")]
    InvalidReading {
        /// The zone whose reading was rejected.
        zone_id: ZoneId,
        /// The underlying scoring error.
        source: ScoringError,
    },

    /// A reading carried out-of-range coordinates.
    #[error("zone {zone_id} has an invalid location: {source}")]
    InvalidLocation {
        /// The zone whose location was rejected.
        zone_id: ZoneId,
        /// The underlying geo error.
        source: GeoError,
    },

    /// The same zone id appeared twice in one reading set.
    #[error("duplicate zone id in readings: {0}")]
    DuplicateZone(ZoneId),
}

/// What a refresh request did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A cycle ran to completion and installed a new snapshot.
    Completed(CycleReport),
    /// Another cycle was already in flight; nothing changed.
    Skipped,
}

/// Summary of one completed refresh cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    /// Cycle number of the installed snapshot.
    pub cycle: u64,
    /// Number of zones in the installed snapshot.
    pub zone_count: usize,
    /// Zones whose risk level increased in this cycle.
    pub escalations: Vec<EscalationEvent>,
}

/// Running counters for the scheduler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshStats {
    /// Cycles that installed a snapshot.
    pub completed: u64,
    /// Cycles aborted by an error.
    pub failed: u64,
    /// Requests skipped because a cycle was in flight.
    pub skipped: u64,
}

/// Callback invoked by [`RefreshScheduler::run`] after every scheduled tick
/// that attempted a cycle.
pub trait RefreshCallback: Send {
    /// Called after a cycle installed a snapshot.
    fn on_cycle(&mut self, report: &CycleReport);

    /// Called after a cycle was aborted.
    fn on_failure(&mut self, error: &RefreshError);
}

/// A no-op refresh callback.
pub struct NoOpCallback;

impl RefreshCallback for NoOpCallback {
    fn on_cycle(&mut self, _report: &CycleReport) {}

    fn on_failure(&mut self, _error: &RefreshError) {}
}

/// Marks a cycle as in flight for as long as it is alive.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    /// Claim the flag, or return `None` if a cycle already holds it.
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_prev| Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Drives refresh cycles against a reading source.
pub struct RefreshScheduler<S> {
    source: S,
    scorer: RiskScorer,
    store: Arc<ZoneStore>,
    control: Arc<MonitorControl>,
    escalations: broadcast::Sender<EscalationEvent>,
    in_flight: AtomicBool,
    interval: Duration,
    fetch_timeout: Duration,
    completed: AtomicU64,
    failed: AtomicU64,
    skipped: AtomicU64,
}

impl<S: ZoneReadingSource> RefreshScheduler<S> {
    /// Create a scheduler that publishes into `store`.
    pub fn new(
        source: S,
        config: &MonitorConfig,
        store: Arc<ZoneStore>,
        control: Arc<MonitorControl>,
    ) -> Self {
        // Both panic on zero; configs built in code skip validation.
        let (escalations, _) =
            broadcast::channel(config.refresh.escalation_channel_capacity.max(1));
        Self {
            source,
            scorer: RiskScorer::new(config.scoring.clone()),
            store,
            control,
            escalations,
            in_flight: AtomicBool::new(false),
            interval: config.refresh.interval().max(Duration::from_millis(1)),
            fetch_timeout: config.refresh.fetch_timeout(),
            completed: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            skipped: AtomicU64::new(0),
        }
    }

    /// The store this scheduler installs snapshots into.
    pub const fn store(&self) -> &Arc<ZoneStore> {
        &self.store
    }

    /// The shared schedule control.
    pub const fn control(&self) -> &Arc<MonitorControl> {
        &self.control
    }

    /// The reading source.
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Subscribe to escalation events from all future cycles.
    pub fn subscribe(&self) -> broadcast::Receiver<EscalationEvent> {
        self.escalations.subscribe()
    }

    /// Whether a cycle is currently running.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Counters since the scheduler was created.
    pub fn stats(&self) -> RefreshStats {
        RefreshStats {
            completed: self.completed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
        }
    }

    /// Run one refresh cycle now, unless one is already in flight.
    ///
    /// Shares the in-flight guard with scheduled ticks. Returns
    /// [`RefreshOutcome::Skipped`] without touching the store when another
    /// cycle is running.
    pub async fn refresh_now(&self) -> Result<RefreshOutcome, RefreshError> {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            self.skipped.fetch_add(1, Ordering::Relaxed);
            debug!("Refresh skipped, a cycle is already in flight");
            return Ok(RefreshOutcome::Skipped);
        };

        match self.run_cycle().await {
            Ok(report) => {
                self.completed.fetch_add(1, Ordering::Relaxed);
                Ok(RefreshOutcome::Completed(report))
            }
            Err(e) => {
                self.failed.fetch_add(1, Ordering::Relaxed);
                warn!(error = %e, "Refresh cycle failed, keeping previous snapshot");
                Err(e)
            }
        }
    }

    /// Fetch, score, detect, install. Caller holds the in-flight guard.
    async fn run_cycle(&self) -> Result<CycleReport, RefreshError> {
        let readings = self.fetch().await?;

        let previous = self.store.snapshot().await;
        let cycle = previous.cycle.saturating_add(1);
        let next = build_snapshot(&self.scorer, readings, cycle)?;

        let escalations = detect_escalations(&previous, &next);
        let zone_count = next.len();
        self.store.replace(next).await;

        for event in &escalations {
            warn!(
                zone_id = %event.zone_id,
                zone_name = %event.zone_name,
                previous_level = %event.previous_level,
                new_level = %event.new_level,
                "Zone risk escalated"
            );
            // send fails only when nobody is subscribed.
            let receivers = self.escalations.send(event.clone()).unwrap_or(0);
            debug!(zone_id = %event.zone_id, receivers, "Escalation published");
        }

        info!(
            cycle,
            zone_count,
            escalations = escalations.len(),
            "Refresh cycle complete"
        );

        Ok(CycleReport {
            cycle,
            zone_count,
            escalations,
        })
    }

    async fn fetch(&self) -> Result<Vec<ZoneReading>, FetchError> {
        tokio::time::timeout(self.fetch_timeout, self.source.fetch_zone_readings())
            .await
            .map_err(|_elapsed| FetchError::Timeout {
                timeout_ms: u64::try_from(self.fetch_timeout.as_millis()).unwrap_or(u64::MAX),
            })?
    }

    /// Run scheduled refreshes until a stop is requested.
    ///
    /// The first scheduled tick fires one interval after the call. While
    /// disabled the loop sleeps on the control; re-enabling restarts the
    /// interval. Failed cycles are reported to `callback` and the schedule
    /// continues. A cycle in flight always finishes before the loop exits.
    pub async fn run(&self, callback: &mut dyn RefreshCallback) -> RefreshStats {
        let now = Instant::now();
        let first_tick = now.checked_add(self.interval).unwrap_or(now);
        let mut ticker = tokio::time::interval_at(first_tick, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            interval_ms = u64::try_from(self.interval.as_millis()).unwrap_or(u64::MAX),
            enabled = self.control.is_enabled(),
            "Refresh loop starting"
        );

        loop {
            if self.control.is_stop_requested() {
                break;
            }

            if !self.control.is_enabled() {
                self.control.changed().await;
                if self.control.is_enabled() {
                    ticker.reset();
                }
                continue;
            }

            tokio::select! {
                _ = ticker.tick() => {}
                () = self.control.changed() => continue,
            }

            match self.refresh_now().await {
                Ok(RefreshOutcome::Completed(report)) => callback.on_cycle(&report),
                Ok(RefreshOutcome::Skipped) => {}
                Err(e) => callback.on_failure(&e),
            }
        }

        let stats = self.stats();
        info!(
            completed = stats.completed,
            failed = stats.failed,
            skipped = stats.skipped,
            "Refresh loop stopped"
        );
        stats
    }
}

/// Validate and score a reading set into a snapshot.
///
/// Fails on the first invalid reading or duplicated zone id so that a
/// snapshot is either entirely valid or not built at all.
pub fn build_snapshot(
    scorer: &RiskScorer,
    readings: Vec<ZoneReading>,
    cycle: u64,
) -> Result<ZoneSnapshot, RefreshError> {
    let mut zones: Vec<Zone> = Vec::with_capacity(readings.len());

    for reading in readings {
        if zones.iter().any(|z| z.id == reading.id) {
            return Err(RefreshError::DuplicateZone(reading.id));
        }
        if let Err(source) =
            firewatch_geo::validate_point(GeoPoint::new(reading.latitude, reading.longitude))
        {
            return Err(RefreshError::InvalidLocation {
                zone_id: reading.id,
                source,
            });
        }
        let risk_level = match scorer.score(&reading.factors) {
            Ok(level) => level,
            Err(source) => {
                return Err(RefreshError::InvalidReading {
                    zone_id: reading.id,
                    source,
                });
            }
        };
        zones.push(Zone {
            id: reading.id,
            name: reading.name,
            latitude: reading.latitude,
            longitude: reading.longitude,
            risk_level,
            factors: reading.factors,
        });
    }

    Ok(ZoneSnapshot {
        cycle,
        taken_at: Utc::now(),
        zones,
    })
}

#[cfg(test)]
mod tests {
    use firewatch_types::{EnvironmentalFactors, RiskLevel};

    use super::*;

    fn reading(id: &str, temperature: f64, humidity: f64, wind_speed: f64) -> ZoneReading {
        ZoneReading {
            id: ZoneId::from(id),
            name: format!("Zone {id}"),
            latitude: 30.35,
            longitude: 76.36,
            factors: EnvironmentalFactors {
                temperature,
                humidity,
                wind_speed,
            },
        }
    }

    #[test]
    fn build_snapshot_scores_each_reading_in_order() {
        let snapshot = build_snapshot(
            &RiskScorer::default(),
            vec![reading("hot", 43.0, 20.0, 20.0), reading("mild", 25.0, 60.0, 10.0)],
            4,
        );
        let snapshot = snapshot.ok();
        let levels: Option<Vec<(String, RiskLevel)>> = snapshot.as_ref().map(|s| {
            s.zones
                .iter()
                .map(|z| (z.id.as_str().to_owned(), z.risk_level))
                .collect()
        });
        assert_eq!(
            levels,
            Some(vec![
                ("hot".to_owned(), RiskLevel::Extreme),
                ("mild".to_owned(), RiskLevel::Medium),
            ])
        );
        assert_eq!(snapshot.map(|s| s.cycle), Some(4));
    }

    #[test]
    fn build_snapshot_rejects_invalid_factors() {
        let result = build_snapshot(
            &RiskScorer::default(),
            vec![reading("ok", 30.0, 40.0, 10.0), reading("bad", 30.0, -3.0, 10.0)],
            1,
        );
        assert!(matches!(
            result,
            Err(RefreshError::InvalidReading { ref zone_id, .. }) if zone_id.as_str() == "bad"
        ));
    }

    #[test]
    fn build_snapshot_rejects_invalid_coordinates() {
        let mut bad = reading("far", 30.0, 40.0, 10.0);
        bad.latitude = 120.0;
        let result = build_snapshot(&RiskScorer::default(), vec![bad], 1);
        assert!(matches!(result, Err(RefreshError::InvalidLocation { .. })));
    }

    #[test]
    fn build_snapshot_rejects_duplicate_ids() {
        let result = build_snapshot(
            &RiskScorer::default(),
            vec![reading("z", 30.0, 40.0, 10.0), reading("z", 20.0, 40.0, 10.0)],
            1,
        );
        assert!(matches!(result, Err(RefreshError::DuplicateZone(_))));
    }

    #[test]
    fn guard_is_exclusive_and_released_on_drop() {
        let flag = AtomicBool::new(false);
        let first = InFlightGuard::acquire(&flag);
        assert!(first.is_some());
        assert!(InFlightGuard::acquire(&flag).is_none());
        drop(first);
        assert!(InFlightGuard::acquire(&flag).is_some());
    }
}
