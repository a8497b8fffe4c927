//! Bearing Triangulation
//!
//! Estimates the position of a distant landmark from compass bearings taken
//! at two or more observation points, and its height from the camera tilt
//! recorded with each bearing.

pub mod core;
pub mod algorithms;
pub mod processing;
pub mod validation;
pub mod utils;
pub mod api;

// Re-export commonly used types
pub use core::{GeoPoint, Origin, OriginPair, Target, TargetState, EARTH_MEAN_RADIUS_M};
pub use algorithms::{
    Aggregator, BearingIntersection, DeviceOrientation, ElevationEstimate, ElevationEstimator,
    Estimate,
};
pub use algorithms::geomath::{destination_point, distance_and_bearing, ray_intersect};
pub use processing::TriangulationEngine;
pub use validation::{TriangulationError, TriangulationResult};
pub use utils::{ConfigError, TriangulationConfig};
pub use api::{
    formatter_for, CsvFormatter, JsonFormatter, OutputFormat, ReportFormatter, TargetCollection,
    TargetRecord, TargetReport, TextFormatter,
};
