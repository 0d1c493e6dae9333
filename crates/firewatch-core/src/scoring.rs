//! Risk scoring: environmental factors to a discrete [`RiskLevel`].
//!
//! The composite score sums three normalized contributions:
//!
//! ```text
//! score = w * (temperature / t_max)
//!       + w * ((100 - humidity) / 100)
//!       + w * (wind_speed / w_max)
//! ```
//!
//! With the default constants (`w = 10`, `t_max = 40 °C`, `w_max = 30 km/h`)
//! the score lies roughly in `0..=30` and maps onto the bands below. Each
//! band is open at its lower bound and closed at its upper bound.
//!
//! | Score            | Level     |
//! |------------------|-----------|
//! | `> 20`           | extreme   |
//! | `> 15` and `<= 20` | high    |
//! | `> 10` and `<= 15` | medium  |
//! | `<= 10`          | low       |
//!
//! Out-of-range readings are rejected with [`ScoringError::InvalidInput`]
//! before scoring. Nothing is clamped.

use firewatch_types::{EnvironmentalFactors, RiskLevel};

use crate::config::{RiskThresholds, ScoringConfig};

/// Physically plausible air temperatures in °C.
pub const TEMPERATURE_RANGE_C: (f64, f64) = (-90.0, 70.0);

/// Valid relative humidity in percent.
pub const HUMIDITY_RANGE_PCT: (f64, f64) = (0.0, 100.0);

/// Valid wind speeds in km/h.
pub const WIND_SPEED_RANGE_KMH: (f64, f64) = (0.0, 500.0);

/// Errors raised while validating or scoring a reading.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    /// A factor was non-finite or outside its valid range.
    #[error("invalid {field}: {value} ({reason})")]
    InvalidInput {
        /// Name of the rejected field.
        field: &'static str,
        /// The rejected value.
        value: f64,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Check that `value` is finite and inside `[min, max]`.
pub(crate) fn check_range(
    field: &'static str,
    value: f64,
    (min, max): (f64, f64),
) -> Result<(), ScoringError> {
    if !value.is_finite() {
        return Err(ScoringError::InvalidInput {
            field,
            value,
            reason: "not a finite number".to_owned(),
        });
    }
    if !(min..=max).contains(&value) {
        return Err(ScoringError::InvalidInput {
            field,
            value,
            reason: format!("expected {min} to {max}"),
        });
    }
    Ok(())
}

/// Validate all three factors of a reading.
pub fn validate_factors(factors: &EnvironmentalFactors) -> Result<(), ScoringError> {
    check_range("temperature", factors.temperature, TEMPERATURE_RANGE_C)?;
    check_range("humidity", factors.humidity, HUMIDITY_RANGE_PCT)?;
    check_range("windSpeed", factors.wind_speed, WIND_SPEED_RANGE_KMH)
}

/// A reading's composite score together with its classification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskAssessment {
    /// Composite score.
    pub score: f64,
    /// Band the score falls into.
    pub level: RiskLevel,
}

/// Pure, deterministic risk scorer parameterized by [`ScoringConfig`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RiskScorer {
    config: ScoringConfig,
}

impl RiskScorer {
    /// Create a scorer from validated scoring configuration.
    pub const fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// The configuration this scorer applies.
    pub const fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Compute the composite score of a reading.
    pub fn composite_score(&self, factors: &EnvironmentalFactors) -> Result<f64, ScoringError> {
        validate_factors(factors)?;
        let w = self.config.factor_weight;
        let heat = w * (factors.temperature / self.config.temperature_max_c);
        let dryness = w * ((100.0 - factors.humidity) / 100.0);
        let wind = w * (factors.wind_speed / self.config.wind_speed_max_kmh);
        Ok(heat + dryness + wind)
    }

    /// Map a composite score onto a risk band.
    pub const fn classify(&self, score: f64) -> RiskLevel {
        classify(score, &self.config.thresholds)
    }

    /// Classify a reading.
    pub fn score(&self, factors: &EnvironmentalFactors) -> Result<RiskLevel, ScoringError> {
        self.assess(factors).map(|a| a.level)
    }

    /// Score and classify a reading in one pass.
    pub fn assess(&self, factors: &EnvironmentalFactors) -> Result<RiskAssessment, ScoringError> {
        let score = self.composite_score(factors)?;
        Ok(RiskAssessment {
            score,
            level: self.classify(score),
        })
    }
}

/// Map a score onto a band; a score equal to a threshold stays in the lower band.
pub const fn classify(score: f64, thresholds: &RiskThresholds) -> RiskLevel {
    if score > thresholds.extreme {
        RiskLevel::Extreme
    } else if score > thresholds.high {
        RiskLevel::High
    } else if score > thresholds.medium {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factors(temperature: f64, humidity: f64, wind_speed: f64) -> EnvironmentalFactors {
        EnvironmentalFactors {
            temperature,
            humidity,
            wind_speed,
        }
    }

    fn scorer() -> RiskScorer {
        RiskScorer::default()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 0.01
    }

    #[test]
    fn hottest_driest_windiest_reference_is_extreme() {
        let assessment = scorer().assess(&factors(40.0, 0.0, 30.0));
        let assessment = assessment.ok();
        assert!(assessment.is_some_and(|a| a.score > 20.0));
        assert_eq!(assessment.map(|a| a.level), Some(RiskLevel::Extreme));
    }

    #[test]
    fn cold_saturated_calm_reading_scores_zero() {
        let assessment = scorer().assess(&factors(0.0, 100.0, 0.0)).ok();
        assert!(assessment.is_some_and(|a| approx(a.score, 0.0)));
        assert_eq!(assessment.map(|a| a.level), Some(RiskLevel::Low));
    }

    #[test]
    fn heatwave_reading_is_extreme() {
        // 10.75 + 8 + 6.67 = 25.42
        let assessment = scorer().assess(&factors(43.0, 20.0, 20.0)).ok();
        assert!(assessment.is_some_and(|a| approx(a.score, 25.42)));
        assert_eq!(assessment.map(|a| a.level), Some(RiskLevel::Extreme));
    }

    #[test]
    fn mild_reading_is_medium() {
        // 6.25 + 4 + 3.33 = 13.58
        let assessment = scorer().assess(&factors(25.0, 60.0, 10.0)).ok();
        assert!(assessment.is_some_and(|a| approx(a.score, 13.58)));
        assert_eq!(assessment.map(|a| a.level), Some(RiskLevel::Medium));
    }

    #[test]
    fn thresholds_are_open_below_closed_above() {
        let s = scorer();
        assert_eq!(s.classify(20.0), RiskLevel::High);
        assert_eq!(s.classify(20.001), RiskLevel::Extreme);
        assert_eq!(s.classify(15.0), RiskLevel::Medium);
        assert_eq!(s.classify(15.001), RiskLevel::High);
        assert_eq!(s.classify(10.0), RiskLevel::Low);
        assert_eq!(s.classify(10.001), RiskLevel::Medium);
        assert_eq!(s.classify(-1.0), RiskLevel::Low);
    }

    #[test]
    fn exact_boundary_reading_stays_in_lower_band() {
        // 10 * (40/40) + 10 * (50/100) + 10 * (15/30) = 10 + 5 + 5 = 20
        assert_eq!(scorer().score(&factors(40.0, 50.0, 15.0)).ok(), Some(RiskLevel::High));
    }

    #[test]
    fn score_is_monotonic_in_each_factor() {
        let s = scorer();
        let score = |t: f64, h: f64, w: f64| s.composite_score(&factors(t, h, w)).ok();

        for step in 0..20_i32 {
            let x = f64::from(step);
            let next = f64::from(step + 1);
            assert!(score(x * 2.0, 50.0, 10.0) <= score(next * 2.0, 50.0, 10.0));
            assert!(score(30.0, 50.0, x * 2.0) <= score(30.0, 50.0, next * 2.0));
            assert!(score(30.0, x * 5.0, 10.0) >= score(30.0, next * 5.0, 10.0));
        }
    }

    #[test]
    fn level_is_monotonic_in_temperature() {
        let s = scorer();
        let mut previous = RiskLevel::Low;
        for t in -10..=60_i32 {
            let level = s.score(&factors(f64::from(t), 30.0, 15.0)).ok();
            assert!(level.is_some_and(|l| l >= previous));
            previous = level.unwrap_or(previous);
        }
    }

    #[test]
    fn rejects_negative_humidity() {
        let err = scorer().score(&factors(30.0, -5.0, 10.0));
        assert!(matches!(
            err,
            Err(ScoringError::InvalidInput { field: "humidity", .. })
        ));
    }

    #[test]
    fn rejects_humidity_over_100() {
        assert!(scorer().score(&factors(30.0, 100.5, 10.0)).is_err());
    }

    #[test]
    fn rejects_negative_wind_speed() {
        let err = scorer().score(&factors(30.0, 40.0, -1.0));
        assert!(matches!(
            err,
            Err(ScoringError::InvalidInput { field: "windSpeed", .. })
        ));
    }

    #[test]
    fn rejects_non_finite_temperature() {
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = scorer().score(&factors(bad, 40.0, 10.0));
            assert!(matches!(
                err,
                Err(ScoringError::InvalidInput { field: "temperature", .. })
            ));
        }
    }

    #[test]
    fn custom_thresholds_shift_bands() {
        let config = ScoringConfig {
            thresholds: RiskThresholds {
                medium: 5.0,
                high: 8.0,
                extreme: 12.0,
            },
            ..ScoringConfig::default()
        };
        let s = RiskScorer::new(config);
        assert_eq!(s.classify(13.58), RiskLevel::Extreme);
        assert_eq!(s.classify(6.0), RiskLevel::Medium);
    }
}
