//! Nearest-route resolution over an evacuation route catalog.
//!
//! The resolver measures the great-circle distance from a query point to
//! each route's origin (`points[0]`) and picks the closest. Among routes at
//! the same minimal distance the first in catalog order wins, so results
//! are stable for a given catalog.
//!
//! The catalog is borrowed and never modified.

use firewatch_types::{EvacuationRoute, GeoPoint};
use tracing::debug;

use crate::error::GeoError;
use crate::geo::{haversine_km, validate_point};

/// A catalog route paired with its distance from a query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedRoute<'a> {
    /// The catalog entry.
    pub route: &'a EvacuationRoute,
    /// Distance in kilometres from the query to the route origin.
    pub distance_km: f64,
}

/// Distance from `query` to the route origin, or `None` for a route with
/// no waypoints or a non-finite origin.
pub fn distance_to_origin(query: GeoPoint, route: &EvacuationRoute) -> Option<f64> {
    route
        .origin()
        .map(|origin| haversine_km(query, origin))
        .filter(|distance| distance.is_finite())
}

/// Select the route whose origin is closest to `query`.
///
/// Returns `None` when the catalog is empty (or holds only routes without
/// usable waypoints) and when `query` is not a valid coordinate. Ties
/// resolve to the earliest route in the catalog.
pub fn resolve(query: GeoPoint, catalog: &[EvacuationRoute]) -> Option<&EvacuationRoute> {
    if let Err(e) = validate_point(query) {
        debug!(error = %e, "Rejecting route query");
        return None;
    }

    let mut best: Option<RankedRoute<'_>> = None;

    for route in catalog {
        let Some(distance_km) = distance_to_origin(query, route) else {
            debug!(route_id = %route.id, "Skipping route without a usable origin");
            continue;
        };
        // Strict comparison keeps the earliest route on ties.
        let closer = best.is_none_or(|b| distance_km < b.distance_km);
        if closer {
            best = Some(RankedRoute { route, distance_km });
        }
    }

    best.map(|b| b.route)
}

/// All routes ordered by distance from `query` to their origin.
///
/// The sort is stable, so routes at equal distance keep catalog order and
/// the first entry always matches [`resolve`]. Routes without a usable
/// origin are left out, and an invalid `query` ranks nothing.
pub fn rank_routes(query: GeoPoint, catalog: &[EvacuationRoute]) -> Vec<RankedRoute<'_>> {
    if validate_point(query).is_err() {
        return Vec::new();
    }
    let mut ranked: Vec<RankedRoute<'_>> = catalog
        .iter()
        .filter_map(|route| {
            distance_to_origin(query, route).map(|distance_km| RankedRoute { route, distance_km })
        })
        .collect();
    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    ranked
}

/// Total great-circle length of a route's waypoint path in kilometres.
pub fn route_length_km(route: &EvacuationRoute) -> f64 {
    route
        .points
        .windows(2)
        .filter_map(|leg| match leg {
            [a, b] => Some(haversine_km(*a, *b)),
            _ => None,
        })
        .sum()
}

/// Check that a route has an origin and that every waypoint and the safe
/// zone carry valid coordinates.
pub fn validate_route(route: &EvacuationRoute) -> Result<(), GeoError> {
    if route.points.is_empty() {
        return Err(GeoError::EmptyRoute(route.id.clone()));
    }
    for point in &route.points {
        validate_point(*point)?;
    }
    validate_point(route.safe_zone.point())
}
