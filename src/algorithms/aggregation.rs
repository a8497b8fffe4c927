//! Robust aggregation of intersection points into one position estimate
//!
//! Points are averaged as unit vectors (cartesian mean, renormalized), which
//! keeps the mean well defined across the antimeridian and near the poles.
//! Pools large enough get a single median-based outlier pass.

use log::debug;
use nalgebra::Vector3;

use crate::algorithms::geomath::{distance_and_bearing_with_radius, from_vector, to_unit_vector};
use crate::core::GeoPoint;
use crate::utils::TriangulationConfig;

/// Aggregated position with the bookkeeping of how it was obtained
#[derive(Debug, Clone, PartialEq)]
pub struct Estimate {
    pub position: GeoPoint,
    /// Points that contributed to the final mean
    pub used_points: usize,
    /// Indices into the input pool that were dropped as outliers
    pub rejected: Vec<usize>,
    /// RMS distance of the contributing points from `position` (meters)
    pub spread_m: f64,
}

#[derive(Debug, Clone)]
pub struct Aggregator {
    outlier_k: f64,
    min_points_for_rejection: usize,
    earth_radius_m: f64,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(&TriangulationConfig::default())
    }
}

impl Aggregator {
    pub fn new(config: &TriangulationConfig) -> Self {
        Self {
            outlier_k: config.outlier_k,
            min_points_for_rejection: config.min_points_for_rejection,
            earth_radius_m: config.earth_radius_m,
        }
    }

    /// Combine valid intersection points; `None` for an empty pool or one
    /// whose points cancel out (e.g. two antipodal points)
    pub fn aggregate(&self, points: &[GeoPoint]) -> Option<Estimate> {
        let initial = spherical_mean(points.iter())?;

        if points.len() < self.min_points_for_rejection {
            return Some(self.finish(initial, points.iter(), Vec::new()));
        }

        let distances: Vec<f64> = points
            .iter()
            .map(|p| self.distance_m(p, &initial))
            .collect();
        let threshold = self.outlier_k * median(&distances);

        let rejected: Vec<usize> = distances
            .iter()
            .enumerate()
            .filter(|(_, d)| **d > threshold)
            .map(|(index, _)| index)
            .collect();

        if rejected.is_empty() {
            return Some(self.finish(initial, points.iter(), rejected));
        }

        debug!(
            "Rejecting {} of {} intersection points beyond {:.1} m",
            rejected.len(),
            points.len(),
            threshold
        );

        let retained: Vec<GeoPoint> = points
            .iter()
            .enumerate()
            .filter(|(index, _)| !rejected.contains(index))
            .map(|(_, p)| *p)
            .collect();
        match spherical_mean(retained.iter()) {
            Some(refined) => Some(self.finish(refined, retained.iter(), rejected)),
            None => {
                // Nothing usable survived; keep the unfiltered mean
                debug!("Outlier pass left no usable points, keeping all {}", points.len());
                Some(self.finish(initial, points.iter(), Vec::new()))
            }
        }
    }

    fn finish<'a>(
        &self,
        position: GeoPoint,
        used: impl Iterator<Item = &'a GeoPoint>,
        rejected: Vec<usize>,
    ) -> Estimate {
        let squared: Vec<f64> = used.map(|p| self.distance_m(p, &position).powi(2)).collect();
        let spread_m = if squared.is_empty() {
            0.0
        } else {
            (squared.iter().sum::<f64>() / squared.len() as f64).sqrt()
        };

        Estimate {
            position,
            used_points: squared.len(),
            rejected,
            spread_m,
        }
    }

    fn distance_m(&self, a: &GeoPoint, b: &GeoPoint) -> f64 {
        distance_and_bearing_with_radius(a, b, self.earth_radius_m).0
    }
}

/// Renormalized cartesian mean of points on the unit sphere
pub fn spherical_mean<'a>(points: impl Iterator<Item = &'a GeoPoint>) -> Option<GeoPoint> {
    let mut count = 0usize;
    let sum = points.fold(Vector3::zeros(), |acc, p| {
        count += 1;
        acc + to_unit_vector(p)
    });
    if count == 0 {
        return None;
    }
    from_vector(&(sum / count as f64))
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    match sorted.len() {
        0 => 0.0,
        n if n % 2 == 0 => (sorted[mid - 1] + sorted[mid]) / 2.0,
        _ => sorted[mid],
    }
}
