//! Triangulation algorithms

pub mod geomath;
pub mod intersection;
pub mod aggregation;
pub mod elevation;

pub use aggregation::{Aggregator, Estimate};
pub use elevation::{DeviceOrientation, ElevationEstimate, ElevationEstimator};
pub use intersection::{all_pairs, BearingIntersection};
