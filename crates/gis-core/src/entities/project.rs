use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::ProjectStatus;

/// An infrastructure project.
///
/// There is one project record; engineering and finance screens read it
/// through [`EngineerProjectView`] and [`FinanceProjectView`].
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Project {
    pub id: String,
    /// Project Reference Number, unique when present.
    pub prn: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub barangay: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub project_cost: Option<f64>,
    pub source_of_funds: Option<String>,
    pub status: ProjectStatus,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Completion percentage, 0–100.
    pub progress: u8,
    pub project_type: Option<String>,
    pub engineers: Vec<String>,
    pub zone_type: Option<String>,
    pub zone_validated: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Coordinates when both are present and inside the valid range.
    ///
    /// `(0, 0)` is treated as "not geocoded".
    #[must_use]
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        let (lat, lng) = (self.latitude?, self.longitude?);
        let in_range = (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng);
        let is_origin = lat.abs() < f64::EPSILON && lng.abs() < f64::EPSILON;
        (in_range && !is_origin).then_some((lat, lng))
    }

    /// Free text the zone detector matches against.
    #[must_use]
    pub fn detection_text(&self) -> String {
        format!("{} {}", self.name, self.description.as_deref().unwrap_or_default())
    }
}

/// Engineering read of a project.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct EngineerProjectView {
    pub id: String,
    pub prn: Option<String>,
    pub name: String,
    pub barangay: Option<String>,
    pub status: ProjectStatus,
    pub progress: u8,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub engineers: Vec<String>,
    pub zone_type: Option<String>,
    pub zone_validated: bool,
}

impl From<&Project> for EngineerProjectView {
    fn from(p: &Project) -> Self {
        Self {
            id: p.id.clone(),
            prn: p.prn.clone(),
            name: p.name.clone(),
            barangay: p.barangay.clone(),
            status: p.status,
            progress: p.progress,
            start_date: p.start_date,
            end_date: p.end_date,
            engineers: p.engineers.clone(),
            zone_type: p.zone_type.clone(),
            zone_validated: p.zone_validated,
        }
    }
}

/// Finance read of a project.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct FinanceProjectView {
    pub id: String,
    pub prn: Option<String>,
    pub name: String,
    pub status: ProjectStatus,
    pub project_cost: Option<f64>,
    pub source_of_funds: Option<String>,
    pub pending_budget_requests: u32,
}

impl FinanceProjectView {
    #[must_use]
    pub fn new(p: &Project, pending_budget_requests: u32) -> Self {
        Self {
            id: p.id.clone(),
            prn: p.prn.clone(),
            name: p.name.clone(),
            status: p.status,
            project_cost: p.project_cost,
            source_of_funds: p.source_of_funds.clone(),
            pending_budget_requests,
        }
    }
}
