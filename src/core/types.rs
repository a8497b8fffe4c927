//! Core data types for bearing triangulation

use serde::{Deserialize, Serialize};

/// Point on the Earth's surface in WGS84 degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// One field observation: where the operator stood and where the device pointed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Origin {
    pub title: String,
    /// Reference to the captured photo; opaque to the math
    pub photo_url: String,
    /// Capture time as recorded by the capture device
    pub timestamp: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Compass bearing toward the target, degrees clockwise from true north
    pub heading: f64,
    /// Camera elevation angle at capture, degrees, positive looking upward
    pub tilt_angle: f64,
}

impl Origin {
    /// Create an observation without provenance metadata
    pub fn new(latitude: f64, longitude: f64, heading: f64, tilt_angle: f64) -> Self {
        Self {
            title: String::new(),
            photo_url: String::new(),
            timestamp: String::new(),
            latitude,
            longitude,
            heading,
            tilt_angle,
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn with_photo_url(mut self, photo_url: &str) -> Self {
        self.photo_url = photo_url.to_string();
        self
    }

    pub fn with_timestamp(mut self, timestamp: &str) -> Self {
        self.timestamp = timestamp.to_string();
        self
    }

    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// Unordered pair of origin indices, stored with `i < j`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OriginPair {
    pub i: usize,
    pub j: usize,
}

/// Where a target sits in its measurement lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetState {
    /// No origins yet
    Empty,
    /// A single origin; nothing to intersect
    Underdetermined,
    /// At least two origins and a usable position estimate
    Measured,
    /// At least two origins but every pair is degenerate
    Indeterminate,
}

/// One triangulation subject and everything derived from its origins.
///
/// Derived fields are rebuilt as a whole by the engine after every edit of
/// the origin list and are read-only from outside the crate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Target {
    pub id: String,
    pub title: String,
    pub(crate) origins: Vec<Origin>,
    pub(crate) pairs: Vec<OriginPair>,
    pub(crate) intersections: Vec<Option<GeoPoint>>,
    pub(crate) estimated_position: Option<GeoPoint>,
    pub(crate) estimated_elevation: Option<f64>,
    pub(crate) origin_heights: Vec<Option<f64>>,
    pub(crate) used_points: usize,
    pub(crate) rejected_points: Vec<usize>,
    pub(crate) spread_m: Option<f64>,
}

impl Target {
    /// Create an empty target
    pub fn new(id: &str, title: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            origins: Vec::new(),
            pairs: Vec::new(),
            intersections: Vec::new(),
            estimated_position: None,
            estimated_elevation: None,
            origin_heights: Vec::new(),
            used_points: 0,
            rejected_points: Vec::new(),
            spread_m: None,
        }
    }

    pub fn origins(&self) -> &[Origin] {
        &self.origins
    }

    pub fn pairs(&self) -> &[OriginPair] {
        &self.pairs
    }

    /// One entry per pair, `None` where the pair is degenerate
    pub fn intersections(&self) -> &[Option<GeoPoint>] {
        &self.intersections
    }

    pub fn estimated_position(&self) -> Option<GeoPoint> {
        self.estimated_position
    }

    /// Target height in meters relative to the mean origin elevation
    pub fn estimated_elevation(&self) -> Option<f64> {
        self.estimated_elevation
    }

    /// Height estimate contributed by each origin, aligned with `origins()`
    pub fn origin_heights(&self) -> &[Option<f64>] {
        &self.origin_heights
    }

    /// Number of intersection points the estimate was averaged from
    pub fn used_points(&self) -> usize {
        self.used_points
    }

    /// Positions within the valid intersection pool dropped as outliers
    pub fn rejected_points(&self) -> &[usize] {
        &self.rejected_points
    }

    /// RMS distance in meters of the retained points from the estimate
    pub fn spread_m(&self) -> Option<f64> {
        self.spread_m
    }

    pub fn has_enough_origins(&self) -> bool {
        self.origins.len() >= 2
    }

    pub fn has_estimate(&self) -> bool {
        self.estimated_position.is_some()
    }

    pub fn is_measured(&self) -> bool {
        self.has_enough_origins() && self.has_estimate()
    }

    pub fn state(&self) -> TargetState {
        match self.origins.len() {
            0 => TargetState::Empty,
            1 => TargetState::Underdetermined,
            _ if self.has_estimate() => TargetState::Measured,
            _ => TargetState::Indeterminate,
        }
    }
}
