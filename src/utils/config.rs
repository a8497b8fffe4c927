use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::{
    COINCIDENT_TOLERANCE_DEG, DEFAULT_MIN_POINTS_FOR_REJECTION, DEFAULT_OUTLIER_K,
    EARTH_MEAN_RADIUS_M, FORWARD_TOLERANCE, MAX_TILT_DEG, PARALLEL_TOLERANCE,
};

/// Tunable parameters of the triangulation pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriangulationConfig {
    /// Sphere radius used for distances (meters)
    pub earth_radius_m: f64,
    /// Determinant threshold below which two bearings count as parallel
    pub parallel_tolerance: f64,
    /// Origins closer than this central angle (degrees) are coincident
    pub coincident_tolerance_deg: f64,
    /// Slack on the forward-direction dot product
    pub forward_tolerance: f64,
    /// Points farther than `outlier_k * median` from the first mean are dropped
    pub outlier_k: f64,
    /// Pool size at which the outlier pass runs
    pub min_points_for_rejection: usize,
    /// Tilt magnitude (degrees) at or beyond which an origin is ignored for elevation
    pub max_tilt_deg: f64,
}

impl Default for TriangulationConfig {
    fn default() -> Self {
        Self {
            earth_radius_m: EARTH_MEAN_RADIUS_M,
            parallel_tolerance: PARALLEL_TOLERANCE,
            coincident_tolerance_deg: COINCIDENT_TOLERANCE_DEG,
            forward_tolerance: FORWARD_TOLERANCE,
            outlier_k: DEFAULT_OUTLIER_K,
            min_points_for_rejection: DEFAULT_MIN_POINTS_FOR_REJECTION,
            max_tilt_deg: MAX_TILT_DEG,
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Invalid parameter value
    InvalidParameter { parameter: String, value: String, reason: String },
    /// Configuration file I/O error
    IoError { message: String },
    /// JSON serialization/deserialization error
    SerializationError { message: String },
}

impl TriangulationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and validate a configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
            message: format!("Failed to read config file '{}': {}", path_str, e),
        })?;

        let config: TriangulationConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::SerializationError {
                message: format!("Failed to parse config file '{}': {}", path_str, e),
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration as pretty-printed JSON
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = serde_json::to_string_pretty(self).map_err(|e| {
            ConfigError::SerializationError {
                message: format!("Failed to serialize config: {}", e),
            }
        })?;

        fs::write(&path, content).map_err(|e| ConfigError::IoError {
            message: format!("Failed to write config file '{}': {}", path_str, e),
        })
    }

    pub fn with_outlier_k(mut self, outlier_k: f64) -> Self {
        self.outlier_k = outlier_k;
        self
    }

    pub fn with_min_points_for_rejection(mut self, min_points: usize) -> Self {
        self.min_points_for_rejection = min_points;
        self
    }

    pub fn with_parallel_tolerance(mut self, tolerance: f64) -> Self {
        self.parallel_tolerance = tolerance;
        self
    }

    /// Check every parameter, reporting the first offending one
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("earth_radius_m", self.earth_radius_m),
            ("parallel_tolerance", self.parallel_tolerance),
            ("coincident_tolerance_deg", self.coincident_tolerance_deg),
            ("forward_tolerance", self.forward_tolerance),
            ("outlier_k", self.outlier_k),
        ];
        for (parameter, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidParameter {
                    parameter: parameter.to_string(),
                    value: value.to_string(),
                    reason: "must be a positive finite number".to_string(),
                });
            }
        }

        // Below 1 every point can sit beyond k times the median
        if self.outlier_k < 1.0 {
            return Err(ConfigError::InvalidParameter {
                parameter: "outlier_k".to_string(),
                value: self.outlier_k.to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        // The median needs at least three points to outvote a single outlier
        if self.min_points_for_rejection < 3 {
            return Err(ConfigError::InvalidParameter {
                parameter: "min_points_for_rejection".to_string(),
                value: self.min_points_for_rejection.to_string(),
                reason: "must be at least 3".to_string(),
            });
        }

        if !(self.max_tilt_deg > 0.0 && self.max_tilt_deg <= 90.0) {
            return Err(ConfigError::InvalidParameter {
                parameter: "max_tilt_deg".to_string(),
                value: self.max_tilt_deg.to_string(),
                reason: "must be within (0, 90]".to_string(),
            });
        }

        Ok(())
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidParameter { parameter, value, reason } => {
                write!(f, "Invalid parameter '{}' = '{}': {}", parameter, value, reason)
            }
            ConfigError::IoError { message } => {
                write!(f, "I/O error: {}", message)
            }
            ConfigError::SerializationError { message } => {
                write!(f, "Serialization error: {}", message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("{}_{}.json", name, std::process::id()))
    }

    #[test]
    fn test_default_config_values() {
        let config = TriangulationConfig::default();
        assert_eq!(config.outlier_k, 3.0);
        assert_eq!(config.min_points_for_rejection, 4);
        assert_eq!(config.parallel_tolerance, 1e-10);
        assert_eq!(config.coincident_tolerance_deg, 1e-6);
        assert_eq!(config.forward_tolerance, 1e-12);
        assert_eq!(config.max_tilt_deg, 90.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_outlier_k() {
        let config = TriangulationConfig::new().with_outlier_k(0.0);
        match config.validate() {
            Err(ConfigError::InvalidParameter { parameter, .. }) => {
                assert_eq!(parameter, "outlier_k")
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_outlier_k_below_one_is_rejected() {
        let config = TriangulationConfig::new().with_outlier_k(0.5);
        match config.validate() {
            Err(ConfigError::InvalidParameter { parameter, reason, .. }) => {
                assert_eq!(parameter, "outlier_k");
                assert_eq!(reason, "must be at least 1");
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(TriangulationConfig::new().with_outlier_k(1.0).validate().is_ok());
    }

    #[test]
    fn test_invalid_rejection_count() {
        let config = TriangulationConfig::new().with_min_points_for_rejection(2);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_tilt_limit() {
        let mut config = TriangulationConfig::new();
        config.max_tilt_deg = 120.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_file_round_trip() {
        let path = temp_path("triangulation_config");
        let config = TriangulationConfig::new()
            .with_outlier_k(2.5)
            .with_min_points_for_rejection(5);

        config.save_to_file(&path).unwrap();
        let loaded = TriangulationConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_partial_config_file_uses_defaults() {
        let path = temp_path("triangulation_partial");
        fs::write(&path, r#"{ "outlier_k": 4.0 }"#).unwrap();

        let loaded = TriangulationConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.outlier_k, 4.0);
        assert_eq!(loaded.min_points_for_rejection, 4);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = TriangulationConfig::load_from_file("/nonexistent/dir/config.json");
        assert!(matches!(result, Err(ConfigError::IoError { .. })));
    }
}
