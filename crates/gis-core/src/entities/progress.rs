use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::CostType;

/// A dated progress report filed by an engineer.
///
/// The latest report by `date` drives the project's `progress` column and
/// the delayed-project check.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub id: String,
    pub project_id: String,
    pub date: NaiveDate,
    /// 0–100.
    pub percentage_complete: u8,
    pub description: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

/// One itemized expense against a project.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct CostEntry {
    pub id: String,
    pub project_id: String,
    pub date: NaiveDate,
    pub cost_type: CostType,
    pub description: Option<String>,
    pub amount: f64,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}
