//! Monitor binary for the Firewatch fire risk monitor.
//!
//! This is the main entry point that wires together the zone store, the
//! refresh scheduler, the file-backed data sources, and escalation
//! alerting. It loads configuration, runs an initial refresh, and keeps
//! zone risk levels current until interrupted.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `firewatch-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Create the zone store and schedule control
//! 4. Build the refresh scheduler over the readings file
//! 5. Start the escalation alert consumer
//! 6. Start the HTTP API server
//! 7. Run the initial refresh
//! 8. Run the scheduled refresh loop until Ctrl-C
//! 9. Log the result

mod alerts;
mod error;
mod sources;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use firewatch_api::AppState;
use firewatch_core::{
    EvacuationPlanner, MonitorConfig, MonitorControl, RefreshOutcome, RefreshScheduler,
    RiskScorer, ZoneStore,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::alerts::AlertCallback;
use crate::error::MonitorError;
use crate::sources::{YamlReadingSource, YamlRouteCatalog};

/// Config file looked up relative to the working directory.
const CONFIG_PATH: &str = "firewatch-config.yaml";

/// How long each shutdown step waits for background work to settle.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// How often shutdown checks for a refresh cycle still in flight.
const IN_FLIGHT_POLL: Duration = Duration::from_millis(50);

/// Application entry point for the monitor.
///
/// # Errors
///
/// Returns an error if configuration is invalid, the signal handler cannot
/// be installed, or a background task fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let (config, from_file) = load_config()?;

    // 2. Initialize structured logging. RUST_LOG wins over the config level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("firewatch-monitor starting");
    if !from_file {
        info!("Config file not found, using defaults");
    }
    info!(
        interval_ms = config.refresh.interval_ms,
        fetch_timeout_ms = config.refresh.fetch_timeout_ms,
        enabled_on_start = config.refresh.enabled_on_start,
        readings_path = %config.sources.readings_path.display(),
        routes_path = %config.sources.routes_path.display(),
        "Configuration loaded"
    );

    // 3. Create the store and control.
    let store = Arc::new(ZoneStore::new());
    let control = Arc::new(MonitorControl::new(config.refresh.enabled_on_start));

    // 4. Build the scheduler.
    let scheduler = Arc::new(RefreshScheduler::new(
        YamlReadingSource::new(config.sources.readings_path.clone()),
        &config,
        Arc::clone(&store),
        Arc::clone(&control),
    ));

    // 5. Subscribe before the first refresh so no escalation is missed.
    let planner = EvacuationPlanner::new(YamlRouteCatalog::new(config.sources.routes_path.clone()));
    let alerts_handle = tokio::spawn(alerts::run_escalation_alerts(
        scheduler.subscribe(),
        Arc::clone(&store),
        planner,
    ));

    // 6. Start the API server.
    let api_handle = if config.api.enabled {
        let app_state = Arc::new(AppState::new(
            Arc::clone(&scheduler),
            EvacuationPlanner::new(YamlRouteCatalog::new(config.sources.routes_path.clone())),
            RiskScorer::new(config.scoring.clone()),
        ));
        let handle = firewatch_api::spawn_server(&config.api, app_state)
            .await
            .map_err(|e| MonitorError::Api {
                message: format!("{e}"),
            })?;
        Some(handle)
    } else {
        info!("API server disabled");
        None
    };

    // 7. Initial refresh.
    match scheduler.refresh_now().await {
        Ok(RefreshOutcome::Completed(report)) => {
            let summary = store.summary().await;
            info!(
                cycle = report.cycle,
                zone_count = report.zone_count,
                highest = ?summary.highest,
                "Initial refresh complete"
            );
        }
        Ok(RefreshOutcome::Skipped) => {}
        Err(e) => warn!(error = %e, "Initial refresh failed, starting with no zones"),
    }

    // 8. Run the schedule until interrupted.
    let loop_handle = {
        let scheduler = Arc::clone(&scheduler);
        tokio::spawn(async move {
            let mut callback = AlertCallback::default();
            scheduler.run(&mut callback).await
        })
    };
    info!(status = ?control.status(), "Monitoring, press Ctrl-C to stop");

    tokio::signal::ctrl_c().await.map_err(MonitorError::from)?;
    info!("Shutdown signal received");
    control.request_stop();

    let stats = loop_handle.await.map_err(|e| MonitorError::Task {
        message: format!("refresh loop: {e}"),
    })?;

    if let Some(handle) = api_handle {
        handle.abort();
    }

    // A manual refresh started through the API runs on its own task.
    let settled = tokio::time::timeout(SHUTDOWN_TIMEOUT, async {
        while scheduler.is_in_flight() {
            tokio::time::sleep(IN_FLIGHT_POLL).await;
        }
    })
    .await;
    if settled.is_err() {
        warn!("Refresh cycle still in flight at shutdown");
    }

    // Dropping the last scheduler handle closes the escalation stream.
    drop(scheduler);
    match tokio::time::timeout(SHUTDOWN_TIMEOUT, alerts_handle).await {
        Ok(joined) => joined.map_err(|e| MonitorError::Task {
            message: format!("escalation consumer: {e}"),
        })?,
        // Open API connections can keep the stream alive.
        Err(_elapsed) => warn!("Escalation consumer still draining, exiting anyway"),
    }

    // 9. Log results.
    info!(
        completed = stats.completed,
        failed = stats.failed,
        skipped = stats.skipped,
        "firewatch-monitor shutdown complete"
    );

    Ok(())
}

/// Load the monitor configuration from `firewatch-config.yaml`.
///
/// Falls back to defaults, still honoring environment overrides, when the
/// file does not exist. Returns whether the file was found.
fn load_config() -> Result<(MonitorConfig, bool), MonitorError> {
    let config_path = Path::new(CONFIG_PATH);
    if config_path.exists() {
        let config = MonitorConfig::from_file(config_path)?;
        Ok((config, true))
    } else {
        let mut config = MonitorConfig::default();
        config.apply_env_overrides()?;
        config.validate()?;
        Ok((config, false))
    }
}
