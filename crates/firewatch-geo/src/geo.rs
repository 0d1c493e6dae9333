//! Great-circle distance and coordinate validation.
//!
//! Distances use the haversine formula on a spherical Earth. Route
//! resolution only compares distances against each other, so the choice of
//! radius does not affect results as long as one function is used
//! throughout.

use firewatch_types::GeoPoint;

use crate::error::GeoError;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Valid latitude range in degrees.
const LAT_RANGE: (f64, f64) = (-90.0, 90.0);

/// Valid longitude range in degrees.
const LNG_RANGE: (f64, f64) = (-180.0, 180.0);

/// Great-circle distance between two points in kilometres.
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat_a = a.lat.to_radians();
    let lat_b = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lng / 2.0).sin().powi(2);
    // Rounding can push h a hair past 1 for antipodal points.
    let c = 2.0 * h.clamp(0.0, 1.0).sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Check that a point has finite coordinates inside the WGS84 ranges.
pub fn validate_point(point: GeoPoint) -> Result<(), GeoError> {
    check_range("lat", point.lat, LAT_RANGE)?;
    check_range("lng", point.lng, LNG_RANGE)
}

fn check_range(field: &'static str, value: f64, (min, max): (f64, f64)) -> Result<(), GeoError> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(GeoError::InvalidCoordinate {
            field,
            value,
            min,
            max,
        })
    }
}
