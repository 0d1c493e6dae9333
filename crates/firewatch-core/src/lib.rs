//! Risk scoring, escalation detection, and zone refresh for the Firewatch
//! fire risk monitor.
//!
//! This crate owns the refresh cycle that keeps zone risk levels current:
//! fetch readings, score them, detect escalations, and swap the new
//! snapshot into the store.
//!
//! # Modules
//!
//! - [`conditions`] -- Descriptive humidity, wind, and rain categories.
//! - [`config`] -- Configuration loading from `firewatch-config.yaml` into
//!   strongly-typed structs.
//! - [`control`] -- Enable, disable, and stop control for the refresh loop.
//! - [`escalation`] -- Snapshot diffing into [`EscalationEvent`]s.
//! - [`evacuation`] -- Route planning over a [`RouteCatalogSource`].
//! - [`prediction`] -- One-off predictions for arbitrary locations.
//! - [`scheduler`] -- The single-flight refresh cycle and its loop.
//! - [`scoring`] -- Composite risk score and band classification.
//! - [`source`] -- External reading and route source traits.
//! - [`store`] -- The zone store holding the current snapshot.
//!
//! [`EscalationEvent`]: firewatch_types::EscalationEvent
//! [`RouteCatalogSource`]: source::RouteCatalogSource

pub mod conditions;
pub mod config;
pub mod control;
pub mod escalation;
pub mod evacuation;
pub mod prediction;
pub mod scheduler;
pub mod scoring;
pub mod source;
pub mod store;

pub use config::{ApiConfig, ConfigError, MonitorConfig};
pub use control::{MonitorControl, MonitorStatus};
pub use escalation::detect_escalations;
pub use evacuation::{EvacuationPlanner, PlanError, RouteOption};
pub use prediction::{predict, predict_report};
pub use scheduler::{
    CycleReport, NoOpCallback, RefreshCallback, RefreshError, RefreshOutcome, RefreshScheduler,
    RefreshStats,
};
pub use scoring::{RiskAssessment, RiskScorer, ScoringError};
pub use source::{
    FetchError, RouteCatalogSource, StaticReadingSource, StaticRouteCatalog, ZoneReadingSource,
};
pub use store::ZoneStore;
