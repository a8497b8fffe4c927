//! Physical constants and numeric tolerances

/// Mean Earth radius (IUGG), meters
pub const EARTH_MEAN_RADIUS_M: f64 = 6_371_008.8;

/// Below this the bearing system determinant counts as parallel/antiparallel
pub const PARALLEL_TOLERANCE: f64 = 1e-10;

/// Origins closer than this central angle (degrees) are coincident
pub const COINCIDENT_TOLERANCE_DEG: f64 = 1e-6;

/// Slack on the forward-direction test so an intersection may sit on an origin
pub const FORWARD_TOLERANCE: f64 = 1e-12;

/// Outlier rejection multiplier applied to the median distance
pub const DEFAULT_OUTLIER_K: f64 = 3.0;

/// Smallest intersection pool that gets an outlier rejection pass
pub const DEFAULT_MIN_POINTS_FOR_REJECTION: usize = 4;

/// Tilts at or beyond this magnitude (degrees) are excluded from elevation
pub const MAX_TILT_DEG: f64 = 90.0;
