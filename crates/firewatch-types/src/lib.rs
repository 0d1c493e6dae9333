//! Shared type definitions for the Firewatch fire risk monitor.
//!
//! This crate is the single source of truth for the data exchanged between
//! the monitoring core and the presentation layer. Types flow downstream to
//! `TypeScript` via `ts-rs` so the dashboard renders exactly what the core
//! produces.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe opaque string identifiers
//! - [`enums`] -- Risk levels and descriptive condition categories
//! - [`structs`] -- Geography, readings, zones, snapshots, and predictions

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{HumidityCondition, RainCondition, RiskLevel, WindCondition};
pub use ids::{PredictionId, RouteId, ZoneId};
pub use structs::{
    ConditionSummary, EnvironmentalFactors, EscalationEvent, EvacuationRoute, FireRiskData,
    GeoPoint, PredictionReport, RiskSummary, SafeZone, WeatherData, Zone, ZoneReading,
    ZoneSnapshot,
};
