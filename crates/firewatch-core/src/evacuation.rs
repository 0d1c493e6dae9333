//! Evacuation planning against a route catalog.
//!
//! The planner fetches the routes serving the area around a point and picks
//! the one whose origin is nearest. Distance math and tie-breaking live in
//! [`firewatch_geo::route`]; this module adds the fetch.

use firewatch_geo::GeoError;
use firewatch_types::{EvacuationRoute, GeoPoint};
use tracing::{debug, info};

use crate::source::{FetchError, RouteCatalogSource};

/// Errors raised while planning an evacuation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlanError {
    /// The query point is not a valid coordinate.
    #[error("invalid query point: {0}")]
    InvalidQuery(#[from] GeoError),

    /// The route catalog could not be fetched.
    #[error("route catalog unavailable: {0}")]
    Fetch(#[from] FetchError),
}

/// A route with its origin distance and total length.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteOption {
    /// The route.
    pub route: EvacuationRoute,
    /// Great-circle distance from the query point to the route origin.
    pub distance_km: f64,
    /// Sum of the route's leg lengths.
    pub length_km: f64,
}

/// Resolves evacuation routes from a catalog source.
#[derive(Debug)]
pub struct EvacuationPlanner<C> {
    catalog: C,
}

impl<C: RouteCatalogSource> EvacuationPlanner<C> {
    /// Create a planner over `catalog`.
    pub const fn new(catalog: C) -> Self {
        Self { catalog }
    }

    /// The catalog source.
    pub const fn catalog(&self) -> &C {
        &self.catalog
    }

    /// The route whose origin is nearest to `query`.
    ///
    /// Returns `Ok(None)` when the catalog has no usable route.
    pub async fn plan(&self, query: GeoPoint) -> Result<Option<EvacuationRoute>, PlanError> {
        firewatch_geo::validate_point(query)?;
        let routes = self.catalog.fetch_routes(query).await?;
        let chosen = firewatch_geo::resolve(query, &routes).cloned();

        match &chosen {
            Some(route) => info!(
                route_id = %route.id,
                route_name = %route.name,
                lat = query.lat,
                lng = query.lng,
                "Evacuation route resolved"
            ),
            None => debug!(
                catalog_size = routes.len(),
                lat = query.lat,
                lng = query.lng,
                "No evacuation route available"
            ),
        }

        Ok(chosen)
    }

    /// Every catalog route, nearest origin first.
    pub async fn options(&self, query: GeoPoint) -> Result<Vec<RouteOption>, PlanError> {
        firewatch_geo::validate_point(query)?;
        let routes = self.catalog.fetch_routes(query).await?;
        Ok(firewatch_geo::rank_routes(query, &routes)
            .into_iter()
            .map(|ranked| RouteOption {
                route: ranked.route.clone(),
                distance_km: ranked.distance_km,
                length_km: firewatch_geo::route_length_km(ranked.route),
            })
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use firewatch_types::{RouteId, SafeZone};

    use super::*;
    use crate::source::StaticRouteCatalog;

    fn route(id: &str, origin: (f64, f64)) -> EvacuationRoute {
        EvacuationRoute {
            id: RouteId::from(id),
            name: format!("Route {id}"),
            points: vec![
                GeoPoint::new(origin.0, origin.1),
                GeoPoint::new(origin.0 + 0.01, origin.1),
            ],
            safe_zone: SafeZone {
                lat: origin.0 + 0.01,
                lng: origin.1,
                name: "Shelter".to_owned(),
            },
        }
    }

    fn san_francisco() -> Vec<EvacuationRoute> {
        vec![
            route("route1", (37.7749, -122.4194)),
            route("route2", (37.7339, -122.4565)),
        ]
    }

    #[tokio::test]
    async fn plan_picks_nearest_origin() {
        let planner = EvacuationPlanner::new(StaticRouteCatalog::new(san_francisco()));
        let chosen = planner.plan(GeoPoint::new(37.73, -122.46)).await.unwrap();
        assert_eq!(chosen.map(|r| r.id), Some(RouteId::from("route2")));
    }

    #[tokio::test]
    async fn plan_on_empty_catalog_is_none() {
        let planner = EvacuationPlanner::new(StaticRouteCatalog::new(Vec::new()));
        let chosen = planner.plan(GeoPoint::new(30.35, 76.38)).await.unwrap();
        assert!(chosen.is_none());
    }

    #[tokio::test]
    async fn plan_rejects_invalid_query() {
        let planner = EvacuationPlanner::new(StaticRouteCatalog::new(san_francisco()));
        let result = planner.plan(GeoPoint::new(95.0, 0.0)).await;
        assert!(matches!(result, Err(PlanError::InvalidQuery(_))));
    }

    #[tokio::test]
    async fn options_are_ordered_and_measured() {
        let planner = EvacuationPlanner::new(StaticRouteCatalog::new(san_francisco()));
        let options = planner.options(GeoPoint::new(37.7749, -122.4194)).await.unwrap();
        let ids: Vec<&str> = options.iter().map(|o| o.route.id.as_str()).collect();
        assert_eq!(ids, vec!["route1", "route2"]);
        assert!(options.first().unwrap().distance_km < 1e-9);
        // 0.01 degrees of latitude is about 1.11 km.
        assert!(options.iter().all(|o| (o.length_km - 1.112).abs() < 0.01));
    }
}
