//! Error types for the `firewatch-geo` crate.

use firewatch_types::RouteId;

/// Errors that can occur when validating geographic input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeoError {
    /// A coordinate was non-finite or outside its valid range.
    #[error("invalid {field}: {value} (expected {min} to {max})")]
    InvalidCoordinate {
        /// Which coordinate was rejected (`lat` or `lng`).
        field: &'static str,
        /// The rejected value.
        value: f64,
        /// Lower bound of the valid range.
        min: f64,
        /// Upper bound of the valid range.
        max: f64,
    },

    /// A route has no waypoints, so it has no origin.
    #[error("route {0} has no waypoints")]
    EmptyRoute(RouteId),
}
