//! Triangulation engine: edits a target's origins and rebuilds everything derived from them
//!
//! Each mutator validates its input, applies the edit, then recomputes in order:
//! pair list, pairwise intersections, aggregated position, elevation. Nothing
//! is patched incrementally, so no pairing can outlive the edit that made it
//! stale. All work is synchronous and finished before the call returns.

use log::{debug, info, warn};

use crate::algorithms::{all_pairs, Aggregator, BearingIntersection, ElevationEstimator};
use crate::algorithms::geomath::normalize_longitude;
use crate::core::{GeoPoint, Origin, Target};
use crate::utils::TriangulationConfig;
use crate::validation::{check_position, normalize_origin, TriangulationError, TriangulationResult};

#[derive(Debug, Clone)]
pub struct TriangulationEngine {
    config: TriangulationConfig,
    intersection: BearingIntersection,
    aggregator: Aggregator,
    elevation: ElevationEstimator,
}

impl Default for TriangulationEngine {
    fn default() -> Self {
        Self::new(TriangulationConfig::default())
    }
}

impl TriangulationEngine {
    pub fn new(config: TriangulationConfig) -> Self {
        Self {
            intersection: BearingIntersection::new(&config),
            aggregator: Aggregator::new(&config),
            elevation: ElevationEstimator::new(&config),
            config,
        }
    }

    pub fn config(&self) -> &TriangulationConfig {
        &self.config
    }

    /// Append an origin and recompute; returns the new origin's index
    pub fn add_origin(&self, target: &mut Target, origin: Origin) -> TriangulationResult<usize> {
        let origin = normalize_origin(origin).map_err(|e| {
            warn!("Rejected origin for target '{}': {}", target.id, e);
            e
        })?;

        target.origins.push(origin);
        self.recompute(target);
        Ok(target.origins.len() - 1)
    }

    /// Replace an origin's position, keeping its heading and tilt
    pub fn move_origin(
        &self,
        target: &mut Target,
        index: usize,
        latitude: f64,
        longitude: f64,
    ) -> TriangulationResult<()> {
        self.check_index(target, index)?;
        check_position(latitude, longitude).map_err(|e| {
            warn!("Rejected move of origin {} on target '{}': {}", index, target.id, e);
            e
        })?;

        if let Some(origin) = target.origins.get_mut(index) {
            origin.latitude = latitude;
            origin.longitude = normalize_longitude(longitude);
        }
        self.recompute(target);
        Ok(())
    }

    /// Remove an origin; later origins shift down by one index
    pub fn remove_origin(&self, target: &mut Target, index: usize) -> TriangulationResult<Origin> {
        self.check_index(target, index)?;

        let removed = target.origins.remove(index);
        self.recompute(target);
        Ok(removed)
    }

    /// Rebuild every derived field of `target` from its origin list
    pub fn recompute(&self, target: &mut Target) {
        let previous_state = target.state();

        target.pairs = all_pairs(target.origins.len());
        target.intersections = self.intersection.intersect_all(&target.origins, &target.pairs);

        let pool: Vec<GeoPoint> = target.intersections.iter().flatten().copied().collect();
        let estimate = if target.has_enough_origins() {
            self.aggregator.aggregate(&pool)
        } else {
            None
        };

        match estimate {
            Some(estimate) => {
                let elevation = self.elevation.estimate(&target.origins, &estimate.position);
                target.estimated_position = Some(estimate.position);
                target.estimated_elevation = elevation.mean_height_m;
                target.origin_heights = elevation.per_origin;
                target.used_points = estimate.used_points;
                target.rejected_points = estimate.rejected;
                target.spread_m = Some(estimate.spread_m);
            }
            None => {
                target.estimated_position = None;
                target.estimated_elevation = None;
                target.origin_heights = vec![None; target.origins.len()];
                target.used_points = 0;
                target.rejected_points.clear();
                target.spread_m = None;
            }
        }

        debug!(
            "Target '{}': {} origins, {} pairs, {} usable intersections",
            target.id,
            target.origins.len(),
            target.pairs.len(),
            pool.len()
        );

        let state = target.state();
        if state != previous_state {
            info!("Target '{}' {:?} -> {:?}", target.id, previous_state, state);
        }
    }

    fn check_index(&self, target: &Target, index: usize) -> TriangulationResult<()> {
        if index < target.origins.len() {
            return Ok(());
        }
        let err = TriangulationError::InvalidOriginIndex {
            index,
            len: target.origins.len(),
        };
        warn!("Ignoring edit on target '{}': {}", target.id, err);
        Err(err)
    }
}
