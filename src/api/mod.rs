//! Collection management and read-only output for targets
//!
//! Display collaborators work from [`TargetReport`] snapshots and never touch
//! the engine's derived state directly.

pub mod collection;
pub mod types;
pub mod formatting;

pub use collection::{TargetCollection, TargetRecord};
pub use types::{EstimateDiagnostics, OriginReport, PairReport, TargetReport};
pub use formatting::{
    formatter_for, CsvFormatter, JsonFormatter, OutputFormat, ReportFormatter, TextFormatter,
};
