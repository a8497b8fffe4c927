//! Target height from camera tilt and horizontal range

use serde::{Deserialize, Serialize};

use crate::algorithms::geomath::{deg2rad, distance_and_bearing_with_radius, rad2deg};
use crate::core::{GeoPoint, Origin};
use crate::utils::TriangulationConfig;

/// Device orientation in the W3C `deviceorientation` convention, degrees.
///
/// `alpha` rotates about the screen normal (yaw), `beta` about the device's
/// short axis (front/back pitch), `gamma` about its long axis (roll).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeviceOrientation {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

impl DeviceOrientation {
    pub fn new(alpha: f64, beta: f64, gamma: f64) -> Self {
        Self { alpha, beta, gamma }
    }

    /// Elevation of the rear camera's optical axis above the horizon, degrees.
    ///
    /// Lying flat the camera looks straight down (-90); held upright it looks
    /// at the horizon (0). Yaw has no effect.
    pub fn camera_elevation_deg(&self) -> f64 {
        let up = -deg2rad(self.beta).cos() * deg2rad(self.gamma).cos();
        rad2deg(up.clamp(-1.0, 1.0).asin())
    }
}

/// Height estimate for the whole target plus each origin's contribution
#[derive(Debug, Clone, PartialEq)]
pub struct ElevationEstimate {
    /// Mean of the admissible per-origin heights, meters
    pub mean_height_m: Option<f64>,
    /// Aligned with the origin list; `None` where the origin was excluded
    pub per_origin: Vec<Option<f64>>,
}

#[derive(Debug, Clone)]
pub struct ElevationEstimator {
    max_tilt_deg: f64,
    earth_radius_m: f64,
}

impl Default for ElevationEstimator {
    fn default() -> Self {
        Self::new(&TriangulationConfig::default())
    }
}

impl ElevationEstimator {
    pub fn new(config: &TriangulationConfig) -> Self {
        Self {
            max_tilt_deg: config.max_tilt_deg,
            earth_radius_m: config.earth_radius_m,
        }
    }

    /// Height of `target` above `origin` seen at the origin's tilt, if admissible
    pub fn origin_height(&self, origin: &Origin, target: &GeoPoint) -> Option<f64> {
        if !origin.tilt_angle.is_finite() || origin.tilt_angle.abs() >= self.max_tilt_deg {
            return None;
        }
        let (distance, _) =
            distance_and_bearing_with_radius(&origin.position(), target, self.earth_radius_m);
        if !(distance > 0.0) {
            return None;
        }
        Some(distance * deg2rad(origin.tilt_angle).tan())
    }

    pub fn estimate(&self, origins: &[Origin], target: &GeoPoint) -> ElevationEstimate {
        let per_origin: Vec<Option<f64>> = origins
            .iter()
            .map(|origin| self.origin_height(origin, target))
            .collect();

        let heights: Vec<f64> = per_origin.iter().flatten().copied().collect();
        let mean_height_m = if heights.is_empty() {
            None
        } else {
            Some(heights.iter().sum::<f64>() / heights.len() as f64)
        };

        ElevationEstimate {
            mean_height_m,
            per_origin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::geomath::destination_point;

    #[test]
    fn test_height_from_tilt() {
        let origin = Origin::new(40.0, -74.0, 0.0, 45.0);
        let target = destination_point(&origin.position(), 0.0, 100.0);
        let height = ElevationEstimator::default()
            .origin_height(&origin, &target)
            .unwrap();
        assert!((height - 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_negative_tilt_gives_negative_height() {
        let origin = Origin::new(40.0, -74.0, 90.0, -10.0);
        let target = destination_point(&origin.position(), 90.0, 500.0);
        let height = ElevationEstimator::default()
            .origin_height(&origin, &target)
            .unwrap();
        assert!((height - 500.0 * (-10.0f64).to_radians().tan()).abs() < 1e-6);
    }

    #[test]
    fn test_excluded_origins() {
        let target = GeoPoint::new(40.001, -74.0);
        let estimator = ElevationEstimator::default();

        let vertical = Origin::new(40.0, -74.0, 0.0, 90.0);
        assert!(estimator.origin_height(&vertical, &target).is_none());

        let on_target = Origin::new(40.001, -74.0, 0.0, 10.0);
        assert!(estimator.origin_height(&on_target, &target).is_none());

        let nan_tilt = Origin::new(40.0, -74.0, 0.0, f64::NAN);
        assert!(estimator.origin_height(&nan_tilt, &target).is_none());
    }

    #[test]
    fn test_mean_skips_excluded_origins() {
        let target = GeoPoint::new(0.0, 0.0);
        let south = destination_point(&target, 180.0, 200.0);
        let west = destination_point(&target, 270.0, 100.0);
        let origins = vec![
            Origin::new(south.latitude, south.longitude, 0.0, 5.0),
            Origin::new(west.latitude, west.longitude, 90.0, 10.0),
            Origin::new(west.latitude, west.longitude, 90.0, -95.0),
        ];

        let estimate = ElevationEstimator::default().estimate(&origins, &target);
        let expected_south = 200.0 * 5.0f64.to_radians().tan();
        let expected_west = 100.0 * 10.0f64.to_radians().tan();

        assert_eq!(estimate.per_origin.len(), 3);
        assert!(estimate.per_origin[2].is_none());
        let mean = estimate.mean_height_m.unwrap();
        assert!((mean - (expected_south + expected_west) / 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_no_admissible_origin() {
        let origins = vec![Origin::new(1.0, 1.0, 0.0, 90.0)];
        let estimate = ElevationEstimator::default().estimate(&origins, &GeoPoint::new(1.1, 1.0));
        assert!(estimate.mean_height_m.is_none());
    }

    #[test]
    fn test_camera_elevation_from_orientation() {
        let flat = DeviceOrientation::new(0.0, 0.0, 0.0);
        assert!((flat.camera_elevation_deg() + 90.0).abs() < 1e-9);

        let upright = DeviceOrientation::new(123.0, 90.0, 0.0);
        assert!(upright.camera_elevation_deg().abs() < 1e-9);

        let tipped_back = DeviceOrientation::new(0.0, 120.0, 0.0);
        assert!((tipped_back.camera_elevation_deg() - 30.0).abs() < 1e-9);

        let rolled = DeviceOrientation::new(0.0, 180.0, 60.0);
        assert!((rolled.camera_elevation_deg() - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_yaw_does_not_change_elevation() {
        let a = DeviceOrientation::new(0.0, 100.0, 15.0);
        let b = DeviceOrientation::new(270.0, 100.0, 15.0);
        assert_eq!(a.camera_elevation_deg(), b.camera_elevation_deg());
    }
}
