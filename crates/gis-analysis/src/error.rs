//! Analysis error types for gis-analysis.
//!
//! Missing or incomplete project data is never an error here: detectors and
//! analyzers return `None`. Errors are reserved for inconsistent reference data
//! and invalid parameters.

/// Errors from the compatibility engine and clustering parameters.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// The project type is not in the reference data.
    #[error("project type not found: {0}")]
    ProjectTypeNotFound(String),

    /// A zone code could not be normalized.
    #[error("unknown zone code: {0}")]
    UnknownZoneCode(String),

    /// A numeric parameter is out of range.
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}
