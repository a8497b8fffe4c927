//! Input validation and error types

pub mod data;
pub mod error;

pub use data::{check_origin, check_position, normalize_origin};
pub use error::{TriangulationError, TriangulationResult};
