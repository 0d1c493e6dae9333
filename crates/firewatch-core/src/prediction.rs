//! One-off risk predictions for an arbitrary location.
//!
//! A prediction scores a single [`WeatherData`] record outside the refresh
//! schedule. It never touches the zone store.

use firewatch_types::{FireRiskData, PredictionId, PredictionReport, WeatherData};
use tracing::debug;

use crate::conditions::{PRECIPITATION_RANGE_MM, summarize};
use crate::scoring::{RiskScorer, ScoringError, check_range};

/// Valid cloud cover in percent.
pub const CLOUD_COVER_RANGE_PCT: (f64, f64) = (0.0, 100.0);

/// Valid wind direction in degrees from north.
pub const WIND_DIRECTION_RANGE_DEG: (f64, f64) = (0.0, 360.0);

/// Validate the parts of a weather record that scoring does not cover.
fn validate_weather(weather: &WeatherData) -> Result<(), ScoringError> {
    check_range("latitude", weather.latitude, (-90.0, 90.0))?;
    check_range("longitude", weather.longitude, (-180.0, 180.0))?;
    check_range("cloudCover", weather.cloud_cover, CLOUD_COVER_RANGE_PCT)?;
    check_range("precipitation", weather.precipitation, PRECIPITATION_RANGE_MM)?;
    check_range("windDirection", weather.wind_direction, WIND_DIRECTION_RANGE_DEG)
}

/// Classify a weather record as a dashboard-ready [`FireRiskData`].
pub fn predict(scorer: &RiskScorer, weather: &WeatherData) -> Result<FireRiskData, ScoringError> {
    predict_report(scorer, weather).map(|report| report.result)
}

/// Classify a weather record and explain the result.
pub fn predict_report(
    scorer: &RiskScorer,
    weather: &WeatherData,
) -> Result<PredictionReport, ScoringError> {
    validate_weather(weather)?;
    let factors = weather.factors();
    let assessment = scorer.assess(&factors)?;
    let conditions = summarize(&factors, Some(weather.precipitation))?;

    let id = PredictionId::generate();
    debug!(
        id = %id,
        location = %weather.location_name,
        score = assessment.score,
        level = %assessment.level,
        "Prediction computed"
    );

    Ok(PredictionReport {
        result: FireRiskData {
            id: id.as_str().to_owned(),
            latitude: weather.latitude,
            longitude: weather.longitude,
            risk_level: assessment.level,
            name: format!("Prediction for {}", weather.location_name),
            factors,
        },
        id,
        score: assessment.score,
        conditions,
        description: assessment.level.description().to_owned(),
        recommended_actions: assessment
            .level
            .recommended_actions()
            .iter()
            .map(|&action| action.to_owned())
            .collect(),
    })
}
