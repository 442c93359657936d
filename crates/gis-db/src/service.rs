//! Service layer orchestrating database mutations with audit and observers.
//!
//! `GisService` wraps `GisDb` (raw database access) and the registered
//! [`ProjectWriteObserver`]s. All repo methods are implemented as
//! `impl GisService`.

use std::sync::Arc;

use crate::GisDb;
use crate::error::DatabaseError;
use crate::observer::{ProjectWrite, ProjectWriteObserver, TracingObserver};

/// Orchestrates database mutations with the audit trail.
///
/// Every mutation method follows this protocol:
/// 1. Execute SQL (inside a transaction when more than one table changes)
/// 2. Append audit entry
/// 3. Commit
/// 4. Notify project write observers (project writes only)
pub struct GisService {
    db: GisDb,
    observers: Vec<Arc<dyn ProjectWriteObserver>>,
}

impl GisService {
    /// Open a local database and wrap it with the default observer.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or migrated.
    pub async fn open_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = GisDb::open_local(db_path).await?;
        Ok(Self::from_db(db))
    }

    /// Create from an existing `GisDb`. Registers [`TracingObserver`].
    #[must_use]
    pub fn from_db(db: GisDb) -> Self {
        Self {
            db,
            observers: vec![Arc::new(TracingObserver)],
        }
    }

    #[must_use]
    pub const fn db(&self) -> &GisDb {
        &self.db
    }

    pub fn add_observer(&mut self, observer: Arc<dyn ProjectWriteObserver>) {
        self.observers.push(observer);
    }

    pub(crate) fn notify(&self, write: &ProjectWrite<'_>) {
        for observer in &self.observers {
            observer.on_project_written(write);
        }
    }
}
