mod analytics;
mod budget;
mod cluster;
mod compat;
mod project;
mod suitability;
mod zone;

pub use analytics::AnalyticsCommands;
pub use budget::BudgetCommands;
pub use cluster::ClusterCommands;
pub use compat::CompatCommands;
pub use project::{CostCommands, ProgressCommands, ProjectCommands, ProjectFieldArgs, ProjectRole};
pub use suitability::{AnalyzeArgs, SuitabilityCommands};
pub use zone::ZoneCommands;
