//! Runtime control of the refresh schedule.
//!
//! [`MonitorControl`] is shared between the refresh loop and whoever drives
//! it (the binary's signal handler, a dashboard toggle). It can enable and
//! disable scheduled refreshes and request a clean stop without touching
//! the loop directly.
//!
//! # Architecture
//!
//! Flags are atomics so the loop reads them without locking. Every state
//! change also signals a [`Notify`]; the loop waits on it while disabled and
//! races it against the next tick while enabled, so a change takes effect
//! at the next tick boundary. A cycle that is already running is never
//! interrupted.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Notify;
use tracing::info;

/// Shared refresh schedule control state.
#[derive(Debug)]
pub struct MonitorControl {
    /// Whether scheduled ticks run refresh cycles.
    enabled: AtomicBool,

    /// Whether the loop should exit at the next tick boundary.
    stop_requested: AtomicBool,

    /// Signalled on every state change.
    changed: Notify,

    /// Wall-clock time the control was created.
    started_at: DateTime<Utc>,
}

impl MonitorControl {
    /// Create control state with scheduled refreshes on or off.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled: AtomicBool::new(enabled),
            stop_requested: AtomicBool::new(false),
            changed: Notify::new(),
            started_at: Utc::now(),
        }
    }

    // -----------------------------------------------------------------------
    // Enable / Disable
    // -----------------------------------------------------------------------

    /// Whether scheduled refreshes are enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Enable scheduled refreshes; the first one runs a full interval later.
    pub fn enable(&self) {
        if !self.enabled.swap(true, Ordering::AcqRel) {
            info!("Scheduled refresh enabled");
        }
        self.changed.notify_one();
    }

    /// Disable scheduled refreshes. A cycle in flight still completes and
    /// installs its snapshot.
    pub fn disable(&self) {
        if self.enabled.swap(false, Ordering::AcqRel) {
            info!("Scheduled refresh disabled");
        }
        self.changed.notify_one();
    }

    // -----------------------------------------------------------------------
    // Stop
    // -----------------------------------------------------------------------

    /// Request that the refresh loop exit.
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
        info!("Monitor stop requested");
        self.changed.notify_one();
    }

    /// Whether a stop has been requested.
    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }

    /// Wait for the next state change.
    ///
    /// A change that happened while nobody was waiting is remembered, so
    /// this may return immediately; callers re-check the flags afterwards.
    pub async fn changed(&self) {
        self.changed.notified().await;
    }

    /// Point-in-time view for status displays.
    pub fn status(&self) -> MonitorStatus {
        MonitorStatus {
            enabled: self.is_enabled(),
            stop_requested: self.is_stop_requested(),
            started_at: self.started_at.to_rfc3339(),
        }
    }
}

impl Default for MonitorControl {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Serializable snapshot of the control state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorStatus {
    /// Whether scheduled refreshes are enabled.
    pub enabled: bool,
    /// Whether a stop has been requested.
    pub stop_requested: bool,
    /// ISO 8601 timestamp of when monitoring started.
    pub started_at: String,
}
