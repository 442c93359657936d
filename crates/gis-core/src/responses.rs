//! CLI response types returned as JSON by `gis` commands.
//!
//! These structs define the shape of batch summaries and analytics reports
//! printed by `gis suitability analyze`, `gis zone detect`, `gis budget
//! approve`, `gis project cost`, and the `gis analytics` family.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{BudgetRequest, BudgetRequestStatusHistory, CostEntry};
use crate::enums::{CostType, SuitabilityCategory};

/// Aggregate outcome of a suitability batch run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SuitabilityBatchSummary {
    /// Projects the analyzer produced a result for.
    pub analyzed: u32,
    pub saved: u32,
    /// Projects skipped because an analysis already existed.
    pub skipped: u32,
    /// Projects without usable coordinates.
    pub no_coordinates: u32,
    pub errors: u32,
    pub by_category: BTreeMap<SuitabilityCategory, u32>,
}

impl SuitabilityBatchSummary {
    pub fn record_category(&mut self, category: SuitabilityCategory) {
        *self.by_category.entry(category).or_default() += 1;
    }
}

/// Aggregate outcome of a batch zone detection run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ZoneDetectBatchSummary {
    pub processed: u32,
    pub detected: u32,
    /// Detections written back to the project.
    pub applied: u32,
    pub unmatched: u32,
    /// Projects whose zone was already validated by an engineer.
    pub skipped_validated: u32,
    pub errors: u32,
}

/// Response from `gis budget approve` / `gis budget reject`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct BudgetDecisionResponse {
    pub request: BudgetRequest,
    pub history: BudgetRequestStatusHistory,
    /// Project cost after the decision.
    pub project_cost: Option<f64>,
}

/// One row of `gis analytics zones`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ZoneAnalyticsRow {
    pub zone_type: String,
    pub display_name: String,
    pub total_projects: u32,
    pub completed: u32,
    pub in_progress: u32,
    pub planned: u32,
    pub delayed: u32,
    pub total_cost: f64,
}

/// One row of `gis analytics barangays`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct BarangayAnalyticsRow {
    pub barangay: String,
    pub project_count: u32,
    pub analyzed_count: u32,
    /// Mean overall suitability of analyzed projects, 2 dp.
    pub average_suitability: Option<f64>,
    pub by_category: BTreeMap<SuitabilityCategory, u32>,
}

/// Response from `gis zone stats`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ZoneStatistics {
    pub total: u32,
    pub by_type: BTreeMap<String, u32>,
    pub by_barangay: BTreeMap<String, u32>,
}

/// Response from `gis project cost list`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ProjectCostReport {
    pub project_id: String,
    pub entries: Vec<CostEntry>,
    pub total_cost: f64,
    pub by_type: BTreeMap<CostType, f64>,
    /// Spent share of `project_cost` in percent, 2 dp. `None` without a budget.
    pub budget_utilization: Option<f64>,
}

/// Response from `gis project flag-delayed`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct DelayedFlagSummary {
    /// In-progress projects past their end date.
    pub overdue: u32,
    pub flagged: u32,
    pub flagged_ids: Vec<String>,
}
