//! Entity structs for all tracker domain objects.
//!
//! Each entity maps to a table in the libSQL database (see
//! `gis-db/migrations/001_initial.sql`). All structs derive `Serialize`,
//! `Deserialize`, and `JsonSchema` for JSON roundtrip and schema validation.

mod audit;
mod budget;
mod clustering;
mod progress;
mod project;
mod reference;
mod suitability;
mod zone;

pub use audit::AuditEntry;
pub use budget::{BudgetRequest, BudgetRequestStatusHistory};
pub use clustering::{AlgorithmMetrics, ClusteringComparison};
pub use progress::{CostEntry, ProgressUpdate};
pub use project::{EngineerProjectView, FinanceProjectView, Project};
pub use reference::{BarangayProfile, ProjectType, ZoneAllowedUse};
pub use suitability::{FactorScores, LandSuitabilityAnalysis, RiskFlags};
pub use zone::ZoningZone;
