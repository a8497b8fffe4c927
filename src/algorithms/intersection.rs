//! Pairwise bearing intersection over a target's origins

use crate::algorithms::geomath::{ray_intersect_with, RayTolerances};
use crate::core::{GeoPoint, Origin, OriginPair};
use crate::utils::TriangulationConfig;

/// Every unordered pair of indices below `n`, ascending `i` then ascending `j`
pub fn all_pairs(n: usize) -> Vec<OriginPair> {
    let mut pairs = Vec::with_capacity(n * n.saturating_sub(1) / 2);
    for i in 0..n {
        for j in (i + 1)..n {
            pairs.push(OriginPair { i, j });
        }
    }
    pairs
}

/// Intersects origin bearing rays pair by pair
#[derive(Debug, Clone, Default)]
pub struct BearingIntersection {
    tolerances: RayTolerances,
}

impl BearingIntersection {
    pub fn new(config: &TriangulationConfig) -> Self {
        Self {
            tolerances: RayTolerances::from(config),
        }
    }

    pub fn intersect_pair(&self, a: &Origin, b: &Origin) -> Option<GeoPoint> {
        ray_intersect_with(&a.position(), a.heading, &b.position(), b.heading, &self.tolerances)
    }

    /// One entry per pair in the same order; degenerate pairs stay in place as `None`
    pub fn intersect_all(&self, origins: &[Origin], pairs: &[OriginPair]) -> Vec<Option<GeoPoint>> {
        pairs
            .iter()
            .map(|pair| match (origins.get(pair.i), origins.get(pair.j)) {
                (Some(a), Some(b)) => self.intersect_pair(a, b),
                _ => None,
            })
            .collect()
    }
}
