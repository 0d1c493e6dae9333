//! Coordinate math and evacuation route resolution for the Firewatch monitor.
//!
//! This is a leaf crate: pure functions over [`GeoPoint`]s and route
//! catalogs with no runtime state.
//!
//! # Modules
//!
//! - [`error`] -- Error types for coordinate and route validation.
//! - [`geo`] -- Haversine distance and WGS84 range checks.
//! - [`route`] -- Nearest-route resolution, ranking, and route length.
//!
//! [`GeoPoint`]: firewatch_types::GeoPoint

pub mod error;
pub mod geo;
pub mod route;

// Re-export primary items at crate root.
pub use error::GeoError;
pub use geo::{EARTH_RADIUS_KM, haversine_km, validate_point};
pub use route::{RankedRoute, rank_routes, resolve, route_length_km, validate_route};
