//! Spherical-earth geodesic primitives
//!
//! Positions are handled as unit vectors in an Earth-centred frame (x toward
//! lat 0/lon 0, z toward the north pole). A bearing ray is the great circle
//! through the origin whose tangent at the origin points along the heading.

use nalgebra::Vector3;

use crate::core::{
    GeoPoint, COINCIDENT_TOLERANCE_DEG, EARTH_MEAN_RADIUS_M, FORWARD_TOLERANCE,
    PARALLEL_TOLERANCE,
};
use crate::utils::TriangulationConfig;

/// Degeneracy thresholds for [`ray_intersect_with`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayTolerances {
    pub parallel: f64,
    pub coincident_deg: f64,
    pub forward: f64,
}

impl Default for RayTolerances {
    fn default() -> Self {
        Self {
            parallel: PARALLEL_TOLERANCE,
            coincident_deg: COINCIDENT_TOLERANCE_DEG,
            forward: FORWARD_TOLERANCE,
        }
    }
}

impl From<&TriangulationConfig> for RayTolerances {
    fn from(config: &TriangulationConfig) -> Self {
        Self {
            parallel: config.parallel_tolerance,
            coincident_deg: config.coincident_tolerance_deg,
            forward: config.forward_tolerance,
        }
    }
}

pub fn deg2rad(deg: f64) -> f64 {
    deg.to_radians()
}

pub fn rad2deg(rad: f64) -> f64 {
    rad.to_degrees()
}

/// Wrap a heading into [0, 360)
pub fn normalize_heading(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Wrap a longitude into [-180, 180)
pub fn normalize_longitude(deg: f64) -> f64 {
    let wrapped = (deg + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped >= 180.0 {
        -180.0
    } else {
        wrapped
    }
}

/// Round to 6 decimal places (~0.1 m) for display-stable output
pub fn round6(x: f64) -> f64 {
    let rounded = (x * 1e6).round() / 1e6;
    // Never surface a negative zero
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

pub fn to_unit_vector(point: &GeoPoint) -> Vector3<f64> {
    let lat = deg2rad(point.latitude);
    let lon = deg2rad(point.longitude);
    Vector3::new(lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin())
}

/// Convert a (not necessarily unit) vector back to lat/lon.
///
/// Returns `None` for a vector too short to carry a direction.
pub fn from_vector(v: &Vector3<f64>) -> Option<GeoPoint> {
    let norm = v.norm();
    if !norm.is_finite() || norm < 1e-12 {
        return None;
    }
    let u = v / norm;
    let latitude = rad2deg(u.z.atan2((u.x * u.x + u.y * u.y).sqrt()));
    let longitude = rad2deg(u.y.atan2(u.x));
    Some(GeoPoint::new(latitude, normalize_longitude(longitude)))
}

/// Unit tangent at `point` pointing along `heading_deg`
pub fn heading_vector(point: &GeoPoint, heading_deg: f64) -> Vector3<f64> {
    let lat = deg2rad(point.latitude);
    let lon = deg2rad(point.longitude);
    let theta = deg2rad(heading_deg);

    let north = Vector3::new(-lat.sin() * lon.cos(), -lat.sin() * lon.sin(), lat.cos());
    let east = Vector3::new(-lon.sin(), lon.cos(), 0.0);

    north * theta.cos() + east * theta.sin()
}

/// Central angle between two points in degrees (haversine)
pub fn central_angle_deg(p1: &GeoPoint, p2: &GeoPoint) -> f64 {
    rad2deg(central_angle_rad(p1, p2))
}

fn central_angle_rad(p1: &GeoPoint, p2: &GeoPoint) -> f64 {
    let lat1 = deg2rad(p1.latitude);
    let lat2 = deg2rad(p2.latitude);
    let dlat = lat2 - lat1;
    let dlon = deg2rad(p2.longitude - p1.longitude);

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * a.sqrt().atan2((1.0 - a).max(0.0).sqrt())
}

/// Haversine distance (meters) and initial bearing (degrees) from `p1` to `p2`
pub fn distance_and_bearing(p1: &GeoPoint, p2: &GeoPoint) -> (f64, f64) {
    distance_and_bearing_with_radius(p1, p2, EARTH_MEAN_RADIUS_M)
}

pub fn distance_and_bearing_with_radius(p1: &GeoPoint, p2: &GeoPoint, radius_m: f64) -> (f64, f64) {
    let distance = radius_m * central_angle_rad(p1, p2);

    let lat1 = deg2rad(p1.latitude);
    let lat2 = deg2rad(p2.latitude);
    let dlon = deg2rad(p2.longitude - p1.longitude);
    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();
    let bearing = normalize_heading(rad2deg(y.atan2(x)));

    (distance, bearing)
}

/// Point reached by travelling `distance_m` from `start` along `bearing_deg`
pub fn destination_point(start: &GeoPoint, bearing_deg: f64, distance_m: f64) -> GeoPoint {
    let lat1 = deg2rad(start.latitude);
    let lon1 = deg2rad(start.longitude);
    let theta = deg2rad(bearing_deg);
    let delta = distance_m / EARTH_MEAN_RADIUS_M;

    let lat2 = (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * theta.cos()).asin();
    let lon2 = lon1
        + (theta.sin() * delta.sin() * lat1.cos()).atan2(delta.cos() - lat1.sin() * lat2.sin());

    GeoPoint::new(rad2deg(lat2), normalize_longitude(rad2deg(lon2)))
}

/// Intersection of two bearing rays with default tolerances
pub fn ray_intersect(a: &GeoPoint, heading_a: f64, b: &GeoPoint, heading_b: f64) -> Option<GeoPoint> {
    ray_intersect_with(a, heading_a, b, heading_b, &RayTolerances::default())
}

/// Intersection of the great circles through `a` and `b` along their headings.
///
/// Of the two antipodal crossings, the one ahead of both rays (positive dot
/// product with each heading tangent) is returned. `None` when the origins
/// coincide, the bearings are parallel or antiparallel, or the rays do not
/// agree on a single forward crossing.
pub fn ray_intersect_with(
    a: &GeoPoint,
    heading_a: f64,
    b: &GeoPoint,
    heading_b: f64,
    tolerances: &RayTolerances,
) -> Option<GeoPoint> {
    if central_angle_deg(a, b) < tolerances.coincident_deg {
        return None;
    }

    let determinant = deg2rad(heading_a - heading_b).sin();
    if !determinant.is_finite() || determinant.abs() < tolerances.parallel {
        return None;
    }

    let pa = to_unit_vector(a);
    let pb = to_unit_vector(b);
    let da = heading_vector(a, heading_a);
    let db = heading_vector(b, heading_b);

    let normal_a = pa.cross(&da);
    let normal_b = pb.cross(&db);
    let crossing = normal_a.cross(&normal_b);
    let norm = crossing.norm();
    if !norm.is_finite() || norm < tolerances.parallel {
        return None;
    }
    let crossing = crossing / norm;

    let is_forward = |x: &Vector3<f64>| {
        da.dot(x) > -tolerances.forward && db.dot(x) > -tolerances.forward
    };

    let candidate = -crossing;
    match (is_forward(&crossing), is_forward(&candidate)) {
        (true, false) => from_vector(&crossing),
        (false, true) => from_vector(&candidate),
        _ => None,
    }
}
