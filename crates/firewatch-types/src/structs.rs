//! Core entity structs for the Firewatch monitor.
//!
//! Covers the geographic primitives (`GeoPoint`, `SafeZone`,
//! `EvacuationRoute`), the environmental reading types, monitored zones and
//! their snapshots, escalation events, and the one-off prediction records
//! exchanged with the presentation layer.
//!
//! Field names serialize in camelCase so the JSON shape matches the
//! dashboard's existing API types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{HumidityCondition, RainCondition, RiskLevel, WindCondition};
use crate::ids::{PredictionId, RouteId, ZoneId};

// ---------------------------------------------------------------------------
// Geography
// ---------------------------------------------------------------------------

/// A WGS84 coordinate pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GeoPoint {
    /// Latitude in `[-90, 90]`.
    pub lat: f64,
    /// Longitude in `[-180, 180]`.
    pub lng: f64,
}

impl GeoPoint {
    /// Create a point from latitude and longitude.
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// The destination endpoint of an evacuation route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SafeZone {
    /// Latitude of the safe zone.
    pub lat: f64,
    /// Longitude of the safe zone.
    pub lng: f64,
    /// Display name.
    pub name: String,
}

impl SafeZone {
    /// The safe zone's position as a [`GeoPoint`].
    pub const fn point(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }
}

/// An evacuation route from an origin point to a safe zone.
///
/// `points[0]` is the route origin. Routes are supplied by the external
/// catalog and are only ever read by the monitor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct EvacuationRoute {
    /// Route identifier.
    pub id: RouteId,
    /// Display name.
    pub name: String,
    /// Ordered waypoints; the first is the origin.
    pub points: Vec<GeoPoint>,
    /// Terminus of the route.
    pub safe_zone: SafeZone,
}

impl EvacuationRoute {
    /// The route's origin point, or `None` for a route without waypoints.
    pub fn origin(&self) -> Option<GeoPoint> {
        self.points.first().copied()
    }
}

// ---------------------------------------------------------------------------
// Environmental readings
// ---------------------------------------------------------------------------

/// One immutable environmental reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct EnvironmentalFactors {
    /// Air temperature in degrees Celsius.
    pub temperature: f64,
    /// Relative humidity in percent (0--100).
    pub humidity: f64,
    /// Wind speed in km/h (non-negative).
    pub wind_speed: f64,
}

/// A raw zone reading as delivered by the external data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ZoneReading {
    /// Zone identifier.
    pub id: ZoneId,
    /// Display name.
    pub name: String,
    /// Latitude of the zone centre.
    pub latitude: f64,
    /// Longitude of the zone centre.
    pub longitude: f64,
    /// Current environmental factors.
    pub factors: EnvironmentalFactors,
}

/// Manual weather input for a one-off prediction.
///
/// Only temperature, humidity and wind speed feed the risk score. Cloud
/// cover, precipitation and wind direction are validated and kept for
/// richer models.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct WeatherData {
    /// Human-readable location name.
    pub location_name: String,
    /// Latitude of the location.
    pub latitude: f64,
    /// Longitude of the location.
    pub longitude: f64,
    /// Air temperature in degrees Celsius.
    pub temperature: f64,
    /// Relative humidity in percent.
    pub humidity: f64,
    /// Wind speed in km/h.
    pub wind_speed: f64,
    /// Cloud cover in percent.
    pub cloud_cover: f64,
    /// Precipitation in mm/h.
    pub precipitation: f64,
    /// Wind direction in degrees from north.
    pub wind_direction: f64,
}

impl WeatherData {
    /// The subset of the record used by risk scoring.
    pub const fn factors(&self) -> EnvironmentalFactors {
        EnvironmentalFactors {
            temperature: self.temperature,
            humidity: self.humidity,
            wind_speed: self.wind_speed,
        }
    }
}

// ---------------------------------------------------------------------------
// Zones and snapshots
// ---------------------------------------------------------------------------

/// A monitored zone with its risk level computed during a refresh cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Zone {
    /// Zone identifier.
    pub id: ZoneId,
    /// Display name.
    pub name: String,
    /// Latitude of the zone centre.
    pub latitude: f64,
    /// Longitude of the zone centre.
    pub longitude: f64,
    /// Risk level stored at scoring time.
    pub risk_level: RiskLevel,
    /// Factors the risk level was computed from.
    pub factors: EnvironmentalFactors,
}

impl Zone {
    /// The zone centre as a [`GeoPoint`].
    pub const fn location(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// A complete set of zones as of one refresh cycle.
///
/// Snapshots are immutable once built. The Zone Store swaps whole snapshots
/// and never edits one in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct ZoneSnapshot {
    /// Refresh cycle that produced this snapshot (0 before the first refresh).
    pub cycle: u64,
    /// Wall-clock time the snapshot was assembled.
    pub taken_at: DateTime<Utc>,
    /// Zones in source order.
    pub zones: Vec<Zone>,
}

impl ZoneSnapshot {
    /// The snapshot held before any refresh has completed.
    pub const fn empty() -> Self {
        Self {
            cycle: 0,
            taken_at: DateTime::<Utc>::UNIX_EPOCH,
            zones: Vec::new(),
        }
    }

    /// Number of zones.
    pub const fn len(&self) -> usize {
        self.zones.len()
    }

    /// Whether the snapshot holds no zones.
    pub const fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Look up a zone by id.
    pub fn zone(&self, id: &ZoneId) -> Option<&Zone> {
        self.zones.iter().find(|z| &z.id == id)
    }

    /// Zones whose risk level is at least `level`, in snapshot order.
    pub fn at_or_above(&self, level: RiskLevel) -> impl Iterator<Item = &Zone> {
        self.zones.iter().filter(move |z| z.risk_level >= level)
    }

    /// Count of zones per risk level plus the highest level present.
    pub fn summary(&self) -> RiskSummary {
        let mut counts: BTreeMap<RiskLevel, u32> =
            RiskLevel::ALL.iter().map(|&level| (level, 0)).collect();
        for zone in &self.zones {
            let entry = counts.entry(zone.risk_level).or_insert(0);
            *entry = entry.saturating_add(1);
        }
        RiskSummary {
            cycle: self.cycle,
            counts,
            highest: self.zones.iter().map(|z| z.risk_level).max(),
        }
    }
}

impl Default for ZoneSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

/// Aggregate view of a snapshot for dashboard headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct RiskSummary {
    /// Cycle of the summarized snapshot.
    pub cycle: u64,
    /// Number of zones at each level (every level present, possibly 0).
    pub counts: BTreeMap<RiskLevel, u32>,
    /// Highest level present, `None` for an empty snapshot.
    pub highest: Option<RiskLevel>,
}

/// A zone whose risk level strictly increased between two snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct EscalationEvent {
    /// The escalating zone.
    pub zone_id: ZoneId,
    /// Display name of the zone in the newer snapshot.
    pub zone_name: String,
    /// Level in the older snapshot.
    pub previous_level: RiskLevel,
    /// Level in the newer snapshot; always greater than `previous_level`.
    pub new_level: RiskLevel,
}

// ---------------------------------------------------------------------------
// Prediction output
// ---------------------------------------------------------------------------

/// Single-zone risk result, as rendered by the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct FireRiskData {
    /// Zone or prediction identifier.
    pub id: String,
    /// Latitude.
    pub latitude: f64,
    /// Longitude.
    pub longitude: f64,
    /// Classified risk level.
    pub risk_level: RiskLevel,
    /// Display name.
    pub name: String,
    /// Factors the level was computed from.
    pub factors: EnvironmentalFactors,
}

impl From<&Zone> for FireRiskData {
    fn from(zone: &Zone) -> Self {
        Self {
            id: zone.id.as_str().to_owned(),
            latitude: zone.latitude,
            longitude: zone.longitude,
            risk_level: zone.risk_level,
            name: zone.name.clone(),
            factors: zone.factors,
        }
    }
}

/// Descriptive categories derived from raw readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ConditionSummary {
    /// Humidity category.
    pub humidity: HumidityCondition,
    /// Wind category.
    pub wind: WindCondition,
    /// Rainfall category, when precipitation was reported.
    pub rain: Option<RainCondition>,
}

/// Full result of a one-off prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct PredictionReport {
    /// Prediction identifier (`prediction-<uuid>`).
    pub id: PredictionId,
    /// The dashboard-facing result.
    pub result: FireRiskData,
    /// Composite score the level was derived from.
    pub score: f64,
    /// Descriptive condition categories.
    pub conditions: ConditionSummary,
    /// Guidance for the classified level.
    pub description: String,
    /// Recommended actions for the classified level.
    pub recommended_actions: Vec<String>,
}
