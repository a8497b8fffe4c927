use std::fmt;

/// Errors surfaced by the triangulation engine and target collection.
///
/// Geometric degeneracy is not an error: degenerate pairs are `None`
/// intersections and an all-degenerate target is `TargetState::Indeterminate`.
#[derive(Debug, Clone, PartialEq)]
pub enum TriangulationError {
    /// Origin index outside the target's origin list
    InvalidOriginIndex { index: usize, len: usize },
    /// Numeric origin field that cannot take part in the geometry
    InvalidOrigin { field: String, value: f64 },
    /// No target with this id in the collection
    TargetNotFound { id: String },
    /// A target with this id already exists in the collection
    DuplicateTarget { id: String },
    /// Reading or writing stored targets failed
    Persistence { message: String },
}

impl TriangulationError {
    /// True for mistakes of the caller (stale index, unknown id) rather than bad data
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            TriangulationError::InvalidOriginIndex { .. }
                | TriangulationError::TargetNotFound { .. }
                | TriangulationError::DuplicateTarget { .. }
        )
    }
}

impl fmt::Display for TriangulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriangulationError::InvalidOriginIndex { index, len } => {
                write!(f, "Origin index {} out of range for {} origins", index, len)
            }
            TriangulationError::InvalidOrigin { field, value } => {
                write!(f, "Invalid origin {}: {}", field, value)
            }
            TriangulationError::TargetNotFound { id } => {
                write!(f, "Target '{}' not found", id)
            }
            TriangulationError::DuplicateTarget { id } => {
                write!(f, "Target '{}' already exists", id)
            }
            TriangulationError::Persistence { message } => {
                write!(f, "Persistence error: {}", message)
            }
        }
    }
}

impl std::error::Error for TriangulationError {}

/// Result type for triangulation operations
pub type TriangulationResult<T> = Result<T, TriangulationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contract_violations() {
        assert!(TriangulationError::InvalidOriginIndex { index: 3, len: 2 }.is_contract_violation());
        assert!(TriangulationError::TargetNotFound { id: "x".into() }.is_contract_violation());
        assert!(!TriangulationError::InvalidOrigin { field: "heading".into(), value: f64::NAN }
            .is_contract_violation());
        assert!(!TriangulationError::Persistence { message: "disk".into() }.is_contract_violation());
    }

    #[test]
    fn test_display() {
        let err = TriangulationError::InvalidOriginIndex { index: 5, len: 2 };
        assert_eq!(err.to_string(), "Origin index 5 out of range for 2 origins");
        let err = TriangulationError::DuplicateTarget { id: "tower".into() };
        assert_eq!(err.to_string(), "Target 'tower' already exists");
    }
}
