//! The Zone Store: the current zone snapshot behind a single update point.
//!
//! Readers receive an [`Arc`] to an immutable [`ZoneSnapshot`] and keep a
//! consistent view for as long as they hold it. The only write is a whole
//! snapshot swap performed by the refresh scheduler, so readers never see
//! zones from two different cycles.

use std::sync::Arc;

use firewatch_types::{RiskSummary, Zone, ZoneId, ZoneSnapshot};
use tokio::sync::RwLock;

/// Holds the latest installed zone snapshot.
#[derive(Debug)]
pub struct ZoneStore {
    current: RwLock<Arc<ZoneSnapshot>>,
}

impl ZoneStore {
    /// Create a store holding the empty pre-refresh snapshot.
    pub fn new() -> Self {
        Self::with_snapshot(ZoneSnapshot::empty())
    }

    /// Create a store seeded with an existing snapshot.
    pub fn with_snapshot(snapshot: ZoneSnapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(snapshot)),
        }
    }

    /// The current snapshot.
    pub async fn snapshot(&self) -> Arc<ZoneSnapshot> {
        Arc::clone(&*self.current.read().await)
    }

    /// The current copy of one zone, if it is monitored.
    pub async fn zone(&self, id: &ZoneId) -> Option<Zone> {
        self.snapshot().await.zone(id).cloned()
    }

    /// Per-level counts for the current snapshot.
    pub async fn summary(&self) -> RiskSummary {
        self.snapshot().await.summary()
    }

    /// Swap in a new snapshot and return the one it replaced.
    ///
    /// Only the refresh scheduler installs snapshots.
    pub(crate) async fn replace(&self, next: ZoneSnapshot) -> Arc<ZoneSnapshot> {
        let mut guard = self.current.write().await;
        std::mem::replace(&mut *guard, Arc::new(next))
    }
}

impl Default for ZoneStore {
    fn default() -> Self {
        Self::new()
    }
}
