//! Recompute lifecycle of a target

pub mod engine;

pub use engine::TriangulationEngine;
