//! Sanity checks and normalization for incoming origins

use crate::algorithms::geomath::{normalize_heading, normalize_longitude};
use crate::core::Origin;
use crate::validation::error::{TriangulationError, TriangulationResult};

fn invalid(field: &str, value: f64) -> TriangulationError {
    TriangulationError::InvalidOrigin {
        field: field.to_string(),
        value,
    }
}

/// Check that a position can take part in the geometry
pub fn check_position(latitude: f64, longitude: f64) -> TriangulationResult<()> {
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err(invalid("latitude", latitude));
    }
    if !longitude.is_finite() {
        return Err(invalid("longitude", longitude));
    }
    Ok(())
}

/// Check every numeric field of an origin
pub fn check_origin(origin: &Origin) -> TriangulationResult<()> {
    check_position(origin.latitude, origin.longitude)?;
    if !origin.heading.is_finite() {
        return Err(invalid("heading", origin.heading));
    }
    if !origin.tilt_angle.is_finite() {
        return Err(invalid("tilt_angle", origin.tilt_angle));
    }
    Ok(())
}

/// Validate and bring heading into [0, 360) and longitude into [-180, 180)
pub fn normalize_origin(mut origin: Origin) -> TriangulationResult<Origin> {
    check_origin(&origin)?;
    origin.heading = normalize_heading(origin.heading);
    origin.longitude = normalize_longitude(origin.longitude);
    Ok(origin)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_origin_is_normalized() {
        let origin = normalize_origin(Origin::new(10.0, 190.0, -45.0, 3.0)).unwrap();
        assert_eq!(origin.heading, 315.0);
        assert_eq!(origin.longitude, -170.0);
        assert_eq!(origin.latitude, 10.0);
        assert_eq!(origin.tilt_angle, 3.0);
    }

    #[test]
    fn test_rejects_bad_latitude() {
        let result = normalize_origin(Origin::new(91.0, 0.0, 0.0, 0.0));
        match result {
            Err(TriangulationError::InvalidOrigin { field, .. }) => assert_eq!(field, "latitude"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_rejects_non_finite_fields() {
        assert!(check_origin(&Origin::new(0.0, f64::INFINITY, 0.0, 0.0)).is_err());
        assert!(check_origin(&Origin::new(0.0, 0.0, f64::NAN, 0.0)).is_err());
        assert!(check_origin(&Origin::new(0.0, 0.0, 0.0, f64::NAN)).is_err());
        assert!(check_position(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_tilt_out_of_range_is_accepted() {
        // Excluded from elevation later, but still a usable bearing
        assert!(check_origin(&Origin::new(0.0, 0.0, 0.0, 120.0)).is_ok());
    }
}
