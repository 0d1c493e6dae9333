//! File-backed reading and route sources.
//!
//! Both sources re-read their YAML file on every fetch, so an operator can
//! edit readings while the monitor runs and see the change on the next
//! cycle.

use std::path::{Path, PathBuf};

use firewatch_core::{FetchError, RouteCatalogSource, ZoneReadingSource};
use firewatch_types::{EvacuationRoute, GeoPoint, ZoneReading};
use serde::Deserialize;
use tracing::debug;

/// Layout of the readings file.
#[derive(Debug, Deserialize)]
struct ReadingsFile {
    #[serde(default)]
    zones: Vec<ZoneReading>,
}

/// Layout of the route catalog file.
#[derive(Debug, Deserialize)]
struct RoutesFile {
    #[serde(default)]
    routes: Vec<EvacuationRoute>,
}

async fn read_file(path: &Path) -> Result<String, FetchError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| FetchError::Transport {
            message: format!("failed to read {}: {e}", path.display()),
        })
}

fn parse<T: for<'de> Deserialize<'de>>(path: &Path, contents: &str) -> Result<T, FetchError> {
    serde_yml::from_str(contents).map_err(|e| FetchError::Malformed {
        message: format!("failed to parse {}: {e}", path.display()),
    })
}

/// Zone readings loaded from a YAML file.
#[derive(Debug, Clone)]
pub struct YamlReadingSource {
    path: PathBuf,
}

impl YamlReadingSource {
    /// Create a source reading from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ZoneReadingSource for YamlReadingSource {
    async fn fetch_zone_readings(&self) -> Result<Vec<ZoneReading>, FetchError> {
        let contents = read_file(&self.path).await?;
        let file: ReadingsFile = parse(&self.path, &contents)?;
        debug!(path = %self.path.display(), zones = file.zones.len(), "Readings loaded");
        Ok(file.zones)
    }
}

/// Evacuation routes loaded from a YAML file.
///
/// The whole catalog is returned for every query; resolution picks the
/// nearest route.
#[derive(Debug, Clone)]
pub struct YamlRouteCatalog {
    path: PathBuf,
}

impl YamlRouteCatalog {
    /// Create a catalog reading from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RouteCatalogSource for YamlRouteCatalog {
    async fn fetch_routes(&self, _near: GeoPoint) -> Result<Vec<EvacuationRoute>, FetchError> {
        let contents = read_file(&self.path).await?;
        let file: RoutesFile = parse(&self.path, &contents)?;
        debug!(path = %self.path.display(), routes = file.routes.len(), "Route catalog loaded");
        Ok(file.routes)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn fixture(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../fixtures")
            .join(name)
    }

    #[tokio::test]
    async fn reads_bundled_zone_fixture() {
        let source = YamlReadingSource::new(fixture("zones.yaml"));
        let zones = source.fetch_zone_readings().await.unwrap();
        assert_eq!(zones.len(), 10);
        let first = zones.first().unwrap();
        assert_eq!(first.id.as_str(), "zone1");
        assert_eq!(first.name, "Model Town");
    }

    #[tokio::test]
    async fn reads_bundled_route_fixture() {
        let catalog = YamlRouteCatalog::new(fixture("routes.yaml"));
        let routes = catalog
            .fetch_routes(GeoPoint::new(37.77, -122.42))
            .await
            .unwrap();
        let ids: Vec<&str> = routes.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["route1", "route2"]);
        assert!(routes.iter().all(|r| r.points.len() == 4));
    }

    #[tokio::test]
    async fn missing_file_is_a_transport_error() {
        let source = YamlReadingSource::new(fixture("does-not-exist.yaml"));
        let result = source.fetch_zone_readings().await;
        assert!(matches!(result, Err(FetchError::Transport { .. })));
    }

    #[test]
    fn bad_yaml_is_malformed() {
        let result: Result<ReadingsFile, _> =
            parse(Path::new("inline"), "zones: [ { id: 1, name: ");
        assert!(matches!(result, Err(FetchError::Malformed { .. })));
    }
}
