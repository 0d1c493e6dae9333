//! Configuration loading and typed config structures for the Firewatch monitor.
//!
//! The canonical configuration lives in `firewatch-config.yaml` at the
//! working directory root. This module defines strongly-typed structs that
//! mirror the YAML structure, a loader that reads the file, and validation
//! for values the scorer and scheduler cannot run with.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The configuration parsed but holds unusable values.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level monitor configuration.
///
/// Mirrors the structure of `firewatch-config.yaml`. Every field has a
/// default, so an empty document is a valid configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MonitorConfig {
    /// Risk scoring constants and band thresholds.
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Refresh loop timing.
    #[serde(default)]
    pub refresh: RefreshConfig,

    /// Locations of the reading and route data sources.
    #[serde(default)]
    pub sources: SourcesConfig,

    /// HTTP API server.
    #[serde(default)]
    pub api: ApiConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl MonitorConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `FIREWATCH_READINGS_PATH` overrides `sources.readings_path`
    /// - `FIREWATCH_ROUTES_PATH` overrides `sources.routes_path`
    /// - `FIREWATCH_REFRESH_INTERVAL_MS` overrides `refresh.interval_ms`
    /// - `FIREWATCH_API_PORT` overrides `api.port`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value fails validation.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Self = serde_yml::from_str(&contents)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value fails validation.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(val) = std::env::var("FIREWATCH_READINGS_PATH") {
            self.sources.readings_path = PathBuf::from(val);
        }
        if let Ok(val) = std::env::var("FIREWATCH_ROUTES_PATH") {
            self.sources.routes_path = PathBuf::from(val);
        }
        if let Ok(val) = std::env::var("FIREWATCH_REFRESH_INTERVAL_MS") {
            self.refresh.interval_ms = val.parse().map_err(|e| ConfigError::Invalid {
                reason: format!("FIREWATCH_REFRESH_INTERVAL_MS is not an integer: {e}"),
            })?;
        }
        if let Ok(val) = std::env::var("FIREWATCH_API_PORT") {
            self.api.port = val.parse().map_err(|e| ConfigError::Invalid {
                reason: format!("FIREWATCH_API_PORT is not a valid port: {e}"),
            })?;
        }
        Ok(())
    }

    /// Check every section for values the monitor cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.scoring.validate()?;
        self.refresh.validate()
    }
}

/// Risk scoring constants.
///
/// The composite score is
/// `w * (T / t_max) + w * ((100 - H) / 100) + w * (W / w_max)` where `w` is
/// [`factor_weight`](Self::factor_weight). With the defaults each factor
/// contributes at most about 10 points, giving a 0--30 range.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScoringConfig {
    /// Temperature in °C that contributes a full factor weight.
    #[serde(default = "default_temperature_max_c")]
    pub temperature_max_c: f64,

    /// Wind speed in km/h that contributes a full factor weight.
    #[serde(default = "default_wind_speed_max_kmh")]
    pub wind_speed_max_kmh: f64,

    /// Points contributed by each factor at its reference value.
    #[serde(default = "default_factor_weight")]
    pub factor_weight: f64,

    /// Lower (exclusive) score bounds of each risk band.
    #[serde(default)]
    pub thresholds: RiskThresholds,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            temperature_max_c: default_temperature_max_c(),
            wind_speed_max_kmh: default_wind_speed_max_kmh(),
            factor_weight: default_factor_weight(),
            thresholds: RiskThresholds::default(),
        }
    }
}

impl ScoringConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("scoring.temperature_max_c", self.temperature_max_c),
            ("scoring.wind_speed_max_kmh", self.wind_speed_max_kmh),
            ("scoring.factor_weight", self.factor_weight),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid {
                    reason: format!("{name} must be a positive number, got {value}"),
                });
            }
        }
        self.thresholds.validate()
    }
}

/// Score thresholds separating the risk bands.
///
/// A score belongs to a band when it is strictly greater than the band's
/// threshold and not greater than the next one: a score exactly on a
/// threshold falls into the lower band.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct RiskThresholds {
    /// Scores above this are at least medium.
    #[serde(default = "default_medium_threshold")]
    pub medium: f64,

    /// Scores above this are at least high.
    #[serde(default = "default_high_threshold")]
    pub high: f64,

    /// Scores above this are extreme.
    #[serde(default = "default_extreme_threshold")]
    pub extreme: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            medium: default_medium_threshold(),
            high: default_high_threshold(),
            extreme: default_extreme_threshold(),
        }
    }
}

impl RiskThresholds {
    fn validate(&self) -> Result<(), ConfigError> {
        let ordered = self.medium.is_finite()
            && self.high.is_finite()
            && self.extreme.is_finite()
            && self.medium < self.high
            && self.high < self.extreme;
        if ordered {
            Ok(())
        } else {
            Err(ConfigError::Invalid {
                reason: format!(
                    "scoring.thresholds must be strictly increasing, got medium={} high={} extreme={}",
                    self.medium, self.high, self.extreme
                ),
            })
        }
    }
}

/// Refresh loop configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RefreshConfig {
    /// Milliseconds between scheduled refresh ticks.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Milliseconds a fetch may take before the cycle is abandoned.
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,

    /// Whether scheduled refreshes run from startup.
    #[serde(default = "default_true")]
    pub enabled_on_start: bool,

    /// Buffered escalation events per subscriber before it lags.
    #[serde(default = "default_escalation_channel_capacity")]
    pub escalation_channel_capacity: usize,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            fetch_timeout_ms: default_fetch_timeout_ms(),
            enabled_on_start: true,
            escalation_channel_capacity: default_escalation_channel_capacity(),
        }
    }
}

impl RefreshConfig {
    /// The refresh interval as a [`Duration`].
    pub const fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// The fetch timeout as a [`Duration`].
    pub const fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.interval_ms == 0 {
            return Err(ConfigError::Invalid {
                reason: "refresh.interval_ms must be at least 1".to_owned(),
            });
        }
        if self.fetch_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                reason: "refresh.fetch_timeout_ms must be at least 1".to_owned(),
            });
        }
        if self.escalation_channel_capacity == 0 {
            return Err(ConfigError::Invalid {
                reason: "refresh.escalation_channel_capacity must be at least 1".to_owned(),
            });
        }
        Ok(())
    }
}

/// Data source locations.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SourcesConfig {
    /// YAML file of zone readings, re-read on every refresh.
    #[serde(default = "default_readings_path")]
    pub readings_path: PathBuf,

    /// YAML file holding the evacuation route catalog.
    #[serde(default = "default_routes_path")]
    pub routes_path: PathBuf,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            readings_path: default_readings_path(),
            routes_path: default_routes_path(),
        }
    }
}

/// HTTP API server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiConfig {
    /// Whether the monitor serves the HTTP API.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Address to bind to.
    #[serde(default = "default_api_host")]
    pub host: String,

    /// TCP port to listen on.
    #[serde(default = "default_api_port")]
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            host: default_api_host(),
            port: default_api_port(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default `tracing` filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

const fn default_temperature_max_c() -> f64 {
    40.0
}

const fn default_wind_speed_max_kmh() -> f64 {
    30.0
}

const fn default_factor_weight() -> f64 {
    10.0
}

const fn default_medium_threshold() -> f64 {
    10.0
}

const fn default_high_threshold() -> f64 {
    15.0
}

const fn default_extreme_threshold() -> f64 {
    20.0
}

const fn default_interval_ms() -> u64 {
    30_000
}

const fn default_fetch_timeout_ms() -> u64 {
    10_000
}

const fn default_true() -> bool {
    true
}

const fn default_escalation_channel_capacity() -> usize {
    256
}

fn default_readings_path() -> PathBuf {
    PathBuf::from("fixtures/zones.yaml")
}

fn default_routes_path() -> PathBuf {
    PathBuf::from("fixtures/routes.yaml")
}

fn default_api_host() -> String {
    "0.0.0.0".to_owned()
}

const fn default_api_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = MonitorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.refresh.interval_ms, 30_000);
        assert_eq!(config.refresh.interval(), Duration::from_secs(30));
        assert!(config.refresh.enabled_on_start);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn empty_document_uses_defaults() {
        let config = MonitorConfig::parse("{}");
        assert_eq!(config.ok(), Some(MonitorConfig::default()));
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
scoring:
  temperature_max_c: 45.0
  wind_speed_max_kmh: 35.0
  factor_weight: 10.0
  thresholds:
    medium: 9.0
    high: 14.0
    extreme: 21.0

refresh:
  interval_ms: 5000
  fetch_timeout_ms: 2000
  enabled_on_start: false
  escalation_channel_capacity: 16

sources:
  readings_path: "data/zones.yaml"
  routes_path: "data/routes.yaml"

api:
  enabled: false
  port: 9090

logging:
  level: "debug"
"#;
        let config = MonitorConfig::parse(yaml);
        assert!(config.is_ok());
        let config = config.ok().unwrap_or_default();

        assert!((config.scoring.temperature_max_c - 45.0).abs() < f64::EPSILON);
        assert!((config.scoring.thresholds.extreme - 21.0).abs() < f64::EPSILON);
        assert_eq!(config.refresh.interval_ms, 5000);
        assert!(!config.refresh.enabled_on_start);
        assert_eq!(config.refresh.escalation_channel_capacity, 16);
        assert_eq!(config.sources.readings_path, PathBuf::from("data/zones.yaml"));
        assert!(!config.api.enabled);
        assert_eq!(config.api.port, 9090);
        assert_eq!(config.api.host, "0.0.0.0");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config = MonitorConfig::parse("refresh:\n  interval_ms: 1000\n");
        let config = config.ok().unwrap_or_default();
        assert_eq!(config.refresh.interval_ms, 1000);
        assert_eq!(config.refresh.fetch_timeout_ms, 10_000);
        assert_eq!(config.scoring, ScoringConfig::default());
    }

    #[test]
    fn rejects_unordered_thresholds() {
        let yaml = "scoring:\n  thresholds:\n    medium: 10.0\n    high: 10.0\n    extreme: 20.0\n";
        assert!(matches!(
            MonitorConfig::parse(yaml),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn rejects_non_positive_reference_values() {
        let yaml = "scoring:\n  wind_speed_max_kmh: 0.0\n";
        assert!(matches!(
            MonitorConfig::parse(yaml),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn rejects_zero_interval() {
        let yaml = "refresh:\n  interval_ms: 0\n";
        assert!(matches!(
            MonitorConfig::parse(yaml),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn invalid_yaml_is_a_parse_error() {
        assert!(matches!(
            MonitorConfig::parse("refresh: [unclosed"),
            Err(ConfigError::Yaml { .. })
        ));
    }
}
