//! Descriptive condition categories for dashboards and reports.
//!
//! These bands summarize a reading in words ("dry", "strong wind") and are
//! independent of the risk score. Wind bands are expressed in km/h.

use firewatch_types::{
    ConditionSummary, EnvironmentalFactors, HumidityCondition, RainCondition, WindCondition,
};

use crate::scoring::{ScoringError, check_range, validate_factors};

/// Humidity below this percentage is dry.
pub const DRY_BELOW_PCT: f64 = 30.0;

/// Humidity above this percentage is wet.
pub const WET_ABOVE_PCT: f64 = 60.0;

/// Wind below this speed in km/h is low.
pub const MODERATE_WIND_FROM_KMH: f64 = 10.8;

/// Wind above this speed in km/h is strong.
pub const STRONG_WIND_ABOVE_KMH: f64 = 21.6;

/// Rainfall at or above this rate in mm/h is heavy.
pub const HEAVY_RAIN_FROM_MM: f64 = 2.0;

/// Valid precipitation rates in mm/h.
pub const PRECIPITATION_RANGE_MM: (f64, f64) = (0.0, 500.0);

/// Categorize a humidity percentage.
pub const fn humidity_condition(humidity: f64) -> HumidityCondition {
    if humidity < DRY_BELOW_PCT {
        HumidityCondition::Dry
    } else if humidity <= WET_ABOVE_PCT {
        HumidityCondition::NotDry
    } else {
        HumidityCondition::Wet
    }
}

/// Categorize a wind speed in km/h.
pub const fn wind_condition(wind_speed: f64) -> WindCondition {
    if wind_speed < MODERATE_WIND_FROM_KMH {
        WindCondition::Low
    } else if wind_speed <= STRONG_WIND_ABOVE_KMH {
        WindCondition::Moderate
    } else {
        WindCondition::Strong
    }
}

/// Categorize a precipitation rate in mm/h.
pub const fn rain_condition(precipitation: f64) -> RainCondition {
    if precipitation <= 0.0 {
        RainCondition::None
    } else if precipitation < HEAVY_RAIN_FROM_MM {
        RainCondition::Light
    } else {
        RainCondition::Heavy
    }
}

/// Summarize a reading, with rainfall when a precipitation rate is known.
pub fn summarize(
    factors: &EnvironmentalFactors,
    precipitation: Option<f64>,
) -> Result<ConditionSummary, ScoringError> {
    validate_factors(factors)?;
    let rain = match precipitation {
        Some(mm) => {
            check_range("precipitation", mm, PRECIPITATION_RANGE_MM)?;
            Some(rain_condition(mm))
        }
        None => None,
    };
    Ok(ConditionSummary {
        humidity: humidity_condition(factors.humidity),
        wind: wind_condition(factors.wind_speed),
        rain,
    })
}
