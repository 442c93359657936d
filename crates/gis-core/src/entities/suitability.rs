use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::SuitabilityCategory;

/// Per-factor scores, each within 0–100.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct FactorScores {
    pub zoning_compliance: f64,
    pub flood_risk: f64,
    pub terrain: f64,
    pub accessibility: f64,
    pub environmental: f64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RiskFlags {
    pub has_flood_risk: bool,
    pub has_slope_risk: bool,
    pub has_zoning_conflict: bool,
    pub has_infrastructure_gap: bool,
    pub has_environmental_concern: bool,
}

impl RiskFlags {
    #[must_use]
    pub const fn any(self) -> bool {
        self.has_flood_risk
            || self.has_slope_risk
            || self.has_zoning_conflict
            || self.has_infrastructure_gap
            || self.has_environmental_concern
    }
}

/// Stored land-suitability result. At most one per project.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct LandSuitabilityAnalysis {
    pub project_id: String,
    pub overall_score: f64,
    pub category: SuitabilityCategory,
    pub factors: FactorScores,
    pub risks: RiskFlags,
    pub recommendations: Vec<String>,
    pub analyzed_at: DateTime<Utc>,
}
