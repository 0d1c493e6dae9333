//! External data collaborators consumed by the monitor.
//!
//! [`ZoneReadingSource`] supplies raw zone readings for each refresh cycle;
//! [`RouteCatalogSource`] supplies the evacuation routes near a point. Both
//! are the only operations in the core that may suspend.
//!
//! [`StaticReadingSource`] and [`StaticRouteCatalog`] serve fixed data and
//! back tests and demos.

use std::future::Future;
use std::sync::Mutex;

use firewatch_types::{EvacuationRoute, GeoPoint, ZoneReading};

/// Errors raised by an external data source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The source could not be reached.
    #[error("transport error: {message}")]
    Transport {
        /// Description of the transport failure.
        message: String,
    },

    /// The source did not answer within the configured timeout.
    #[error("fetch timed out after {timeout_ms}ms")]
    Timeout {
        /// The timeout that elapsed.
        timeout_ms: u64,
    },

    /// The source answered with data that could not be decoded.
    #[error("malformed response: {message}")]
    Malformed {
        /// Description of the decoding failure.
        message: String,
    },
}

/// A source of raw zone readings.
pub trait ZoneReadingSource: Send + Sync {
    /// Fetch the current reading for every monitored zone.
    fn fetch_zone_readings(
        &self,
    ) -> impl Future<Output = Result<Vec<ZoneReading>, FetchError>> + Send;
}

/// A source of evacuation routes.
pub trait RouteCatalogSource: Send + Sync {
    /// Fetch the routes that serve the area around `near`.
    fn fetch_routes(
        &self,
        near: GeoPoint,
    ) -> impl Future<Output = Result<Vec<EvacuationRoute>, FetchError>> + Send;
}

/// A reading source that serves whatever readings were last set.
#[derive(Debug)]
pub struct StaticReadingSource {
    readings: Mutex<Result<Vec<ZoneReading>, FetchError>>,
}

impl StaticReadingSource {
    /// Create a source serving `readings`.
    pub const fn new(readings: Vec<ZoneReading>) -> Self {
        Self {
            readings: Mutex::new(Ok(readings)),
        }
    }

    /// Serve `readings` from the next fetch on.
    pub fn set_readings(&self, readings: Vec<ZoneReading>) {
        self.set(Ok(readings));
    }

    /// Fail every fetch with `error` until readings are set again.
    pub fn set_failure(&self, error: FetchError) {
        self.set(Err(error));
    }

    fn set(&self, value: Result<Vec<ZoneReading>, FetchError>) {
        match self.readings.lock() {
            Ok(mut guard) => *guard = value,
            Err(poisoned) => *poisoned.into_inner() = value,
        }
    }
}

impl ZoneReadingSource for StaticReadingSource {
    async fn fetch_zone_readings(&self) -> Result<Vec<ZoneReading>, FetchError> {
        match self.readings.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

/// A route catalog that returns the same routes for every query.
#[derive(Debug, Clone, Default)]
pub struct StaticRouteCatalog {
    routes: Vec<EvacuationRoute>,
}

impl StaticRouteCatalog {
    /// Create a catalog over `routes`.
    pub const fn new(routes: Vec<EvacuationRoute>) -> Self {
        Self { routes }
    }
}

impl RouteCatalogSource for StaticRouteCatalog {
    async fn fetch_routes(&self, _near: GeoPoint) -> Result<Vec<EvacuationRoute>, FetchError> {
        Ok(self.routes.clone())
    }
}
