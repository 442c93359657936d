//! Typed audit detail payloads.
//!
//! Each audit action can carry a structured `detail` JSON blob. These types
//! provide schema validation for the most common detail shapes.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Detail for `AuditAction::StatusChanged`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StatusChangedDetail {
    pub from: String,
    pub to: String,
}

/// Detail for `AuditAction::ZoneDetected`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ZoneDetectedDetail {
    pub zone_type: String,
    pub confidence: f64,
    pub matched_zone_id: Option<String>,
}

/// Detail for `AuditAction::ZoneValidated`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ZoneValidatedDetail {
    pub zone_type: String,
    pub validated_by: String,
}

/// Detail for `AuditAction::Analyzed` on a suitability result.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct AnalyzedDetail {
    pub overall_score: f64,
    pub category: String,
}

/// Detail for `AuditAction::Decided` on a budget request.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct BudgetDecidedDetail {
    pub from: String,
    pub to: String,
    pub approved_amount: Option<f64>,
    pub project_id: String,
}
