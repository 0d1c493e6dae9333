//! Enumeration types for the Firewatch monitor.
//!
//! [`RiskLevel`] is the discrete classification produced by risk scoring.
//! The condition enums are descriptive categories for the presentation
//! layer and never feed into the score.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Risk Level
// ---------------------------------------------------------------------------

/// Discrete fire risk classification of a zone.
///
/// Variants are declared in ascending severity, so the derived [`Ord`]
/// gives the total order `Low < Medium < High < Extreme` that escalation
/// detection relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum RiskLevel {
    /// Minimal fire risk.
    Low,
    /// Moderate fire risk.
    Medium,
    /// High fire risk.
    High,
    /// Extreme fire danger.
    Extreme,
}

impl RiskLevel {
    /// All levels in ascending severity.
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::Extreme];

    /// Lowercase wire name of the level.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Extreme => "extreme",
        }
    }

    /// Whether zones at this level should raise an operator alert.
    pub const fn is_alerting(self) -> bool {
        matches!(self, Self::High | Self::Extreme)
    }

    /// One-line guidance shown alongside the level.
    pub const fn description(self) -> &'static str {
        match self {
            Self::Low => "Minimal fire risk. Regular monitoring recommended.",
            Self::Medium => "Moderate fire risk. Increased vigilance required.",
            Self::High => "High fire risk. Take preventive measures immediately.",
            Self::Extreme => "Extreme danger! Evacuation may be necessary.",
        }
    }

    /// Recommended actions for alerting levels; empty below [`RiskLevel::High`].
    pub const fn recommended_actions(self) -> &'static [&'static str] {
        const ALERT: &[&str] = &[
            "Increase monitoring frequency",
            "Alert local fire departments",
            "Prepare evacuation routes",
        ];
        const EXTREME: &[&str] = &[
            "Increase monitoring frequency",
            "Alert local fire departments",
            "Prepare evacuation routes",
            "Consider immediate evacuation",
        ];
        match self {
            Self::Low | Self::Medium => &[],
            Self::High => ALERT,
            Self::Extreme => EXTREME,
        }
    }
}

impl core::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Condition Categories
// ---------------------------------------------------------------------------

/// Coarse humidity category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub enum HumidityCondition {
    /// Relative humidity below 30%.
    Dry,
    /// Relative humidity from 30% to 60% inclusive.
    NotDry,
    /// Relative humidity above 60%.
    Wet,
}

/// Coarse wind category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub enum WindCondition {
    /// Below 10.8 km/h.
    Low,
    /// From 10.8 km/h to 21.6 km/h inclusive.
    Moderate,
    /// Above 21.6 km/h.
    Strong,
}

/// Coarse rainfall category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub enum RainCondition {
    /// No precipitation.
    None,
    /// Below 2 mm/h.
    Light,
    /// 2 mm/h or more.
    Heavy,
}
