//! Database error types for gis-db.

use gis_core::enums::BudgetRequestStatus;
use thiserror::Error;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed or a column could not be decoded.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// The requested operation does not fit the stored data.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Lookup by id returned nothing.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A budget request left `pending` already.
    #[error("budget request {id} already decided ({status})")]
    AlreadyDecided {
        id: String,
        status: BudgetRequestStatus,
    },

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Reference data could not answer the request.
    #[error(transparent)]
    Analysis(#[from] gis_analysis::AnalysisError),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DatabaseError {
    pub(crate) fn not_found(entity: &'static str, id: &str) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}
