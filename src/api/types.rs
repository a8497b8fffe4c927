//! Read-only views of a target for display collaborators

use serde::{Deserialize, Serialize};

use crate::algorithms::geomath::{distance_and_bearing, round6};
use crate::core::{GeoPoint, Target, TargetState};

/// Snapshot of a target with every surfaced coordinate rounded to 6 decimals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetReport {
    pub id: String,
    pub title: String,
    pub state: TargetState,
    pub is_measured: bool,
    pub estimated_position: Option<GeoPoint>,
    /// Meters relative to the mean origin elevation
    pub estimated_elevation_m: Option<f64>,
    pub origins: Vec<OriginReport>,
    pub pairs: Vec<PairReport>,
    pub diagnostics: EstimateDiagnostics,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OriginReport {
    pub index: usize,
    pub title: String,
    pub timestamp: String,
    pub position: GeoPoint,
    pub heading_deg: f64,
    pub tilt_deg: f64,
    /// Horizontal range to the estimate, once there is one
    pub range_m: Option<f64>,
    /// Initial bearing toward the estimate; compare with `heading_deg`
    pub bearing_to_estimate_deg: Option<f64>,
    pub height_m: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairReport {
    pub i: usize,
    pub j: usize,
    /// `None` for a degenerate pair
    pub intersection: Option<GeoPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateDiagnostics {
    pub valid_intersections: usize,
    pub degenerate_pairs: usize,
    pub used_points: usize,
    pub rejected_points: Vec<usize>,
    pub spread_m: Option<f64>,
}

fn rounded(point: &GeoPoint) -> GeoPoint {
    GeoPoint::new(round6(point.latitude), round6(point.longitude))
}

impl TargetReport {
    pub fn from_target(target: &Target) -> Self {
        let estimate = target.estimated_position();

        let origins = target
            .origins()
            .iter()
            .enumerate()
            .map(|(index, origin)| {
                let range = estimate.map(|e| distance_and_bearing(&origin.position(), &e));
                OriginReport {
                    index,
                    title: origin.title.clone(),
                    timestamp: origin.timestamp.clone(),
                    position: rounded(&origin.position()),
                    heading_deg: round6(origin.heading),
                    tilt_deg: round6(origin.tilt_angle),
                    range_m: range.map(|(d, _)| round6(d)),
                    bearing_to_estimate_deg: range.map(|(_, b)| round6(b)),
                    height_m: target.origin_heights().get(index).copied().flatten().map(round6),
                }
            })
            .collect();

        let pairs = target
            .pairs()
            .iter()
            .zip(target.intersections())
            .map(|(pair, hit)| PairReport {
                i: pair.i,
                j: pair.j,
                intersection: hit.as_ref().map(rounded),
            })
            .collect();

        let valid_intersections = target.intersections().iter().flatten().count();

        Self {
            id: target.id.clone(),
            title: target.title.clone(),
            state: target.state(),
            is_measured: target.is_measured(),
            estimated_position: estimate.as_ref().map(rounded),
            estimated_elevation_m: target.estimated_elevation().map(round6),
            origins,
            pairs,
            diagnostics: EstimateDiagnostics {
                valid_intersections,
                degenerate_pairs: target.pairs().len() - valid_intersections,
                used_points: target.used_points(),
                rejected_points: target.rejected_points().to_vec(),
                spread_m: target.spread_m().map(round6),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Origin;
    use crate::processing::TriangulationEngine;

    #[test]
    fn test_report_of_measured_target() {
        let engine = TriangulationEngine::default();
        let mut target = Target::new("t1", "Mast");
        engine.add_origin(&mut target, Origin::new(0.0, 0.0, 90.0, 1.0).with_title("A")).unwrap();
        engine.add_origin(&mut target, Origin::new(0.0, 1.0, 180.0, 1.0).with_title("B")).unwrap();
        engine.add_origin(&mut target, Origin::new(0.0, 0.5, 90.0, 1.0).with_title("C")).unwrap();

        let report = TargetReport::from_target(&target);
        assert_eq!(report.state, TargetState::Measured);
        assert!(report.is_measured);
        assert_eq!(report.pairs.len(), 3);
        assert_eq!(report.origins.len(), 3);
        assert_eq!(report.origins[1].title, "B");
        // A and C share a heading
        assert!(report.pairs[1].intersection.is_none());
        assert_eq!(report.diagnostics.degenerate_pairs, 1);
        assert_eq!(report.diagnostics.valid_intersections, 2);

        let position = report.estimated_position.unwrap();
        assert_eq!(position.latitude, round6(position.latitude));
        assert!((position.longitude - 1.0).abs() < 1e-6);
        assert!(report.origins[0].range_m.unwrap() > 111_000.0);
        assert!((report.origins[0].bearing_to_estimate_deg.unwrap() - 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_report_of_empty_target() {
        let report = TargetReport::from_target(&Target::new("t2", "Nothing yet"));
        assert_eq!(report.state, TargetState::Empty);
        assert!(report.estimated_position.is_none());
        assert!(report.pairs.is_empty());
        assert_eq!(report.diagnostics.degenerate_pairs, 0);
    }
}
