//! Status enums, ordinal categories, entity types, and actions.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.
//! Status enums with state machines provide `allowed_next_states()` to enforce
//! valid transitions at the application layer.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// ProjectStatus
// ---------------------------------------------------------------------------

/// Lifecycle status of an infrastructure project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Planned,
    InProgress,
    Completed,
    Delayed,
    Cancelled,
}

impl ProjectStatus {
    pub const ALL: [Self; 5] = [
        Self::Planned,
        Self::InProgress,
        Self::Completed,
        Self::Delayed,
        Self::Cancelled,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Delayed => "delayed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// BudgetRequestStatus
// ---------------------------------------------------------------------------

/// Status of a budget-increase request.
///
/// ```text
/// pending → approved
///         → rejected
/// ```
///
/// Both decisions are terminal: a request is decided exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum BudgetRequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl BudgetRequestStatus {
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Approved, Self::Rejected],
            Self::Approved | Self::Rejected => &[],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    /// Whether a finance reviewer has already acted on the request.
    #[must_use]
    pub const fn is_decided(self) -> bool {
        !matches!(self, Self::Pending)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for BudgetRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SuitabilityCategory
// ---------------------------------------------------------------------------

/// Ordinal label derived from a 0–100 land-suitability score.
///
/// Variants are declared from worst to best so the derived `Ord` follows
/// the score.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum SuitabilityCategory {
    NotSuitable,
    MarginallySuitable,
    ModeratelySuitable,
    Suitable,
    HighlySuitable,
}

impl SuitabilityCategory {
    pub const HIGHLY_SUITABLE_MIN: f64 = 80.0;
    pub const SUITABLE_MIN: f64 = 60.0;
    pub const MODERATELY_SUITABLE_MIN: f64 = 40.0;
    pub const MARGINALLY_SUITABLE_MIN: f64 = 20.0;

    /// All categories from best to worst (report order).
    pub const ALL: [Self; 5] = [
        Self::HighlySuitable,
        Self::Suitable,
        Self::ModeratelySuitable,
        Self::MarginallySuitable,
        Self::NotSuitable,
    ];

    /// Map an overall score onto its category.
    ///
    /// Thresholds are inclusive lower bounds: 80 is highly suitable, 79.99 is
    /// suitable. Scores outside 0–100 are clamped first; NaN maps to the lowest
    /// category.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        let score = if score.is_nan() { 0.0 } else { score.clamp(0.0, 100.0) };
        if score >= Self::HIGHLY_SUITABLE_MIN {
            Self::HighlySuitable
        } else if score >= Self::SUITABLE_MIN {
            Self::Suitable
        } else if score >= Self::MODERATELY_SUITABLE_MIN {
            Self::ModeratelySuitable
        } else if score >= Self::MARGINALLY_SUITABLE_MIN {
            Self::MarginallySuitable
        } else {
            Self::NotSuitable
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotSuitable => "not_suitable",
            Self::MarginallySuitable => "marginally_suitable",
            Self::ModeratelySuitable => "moderately_suitable",
            Self::Suitable => "suitable",
            Self::HighlySuitable => "highly_suitable",
        }
    }

    /// Human-readable label with the score band.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NotSuitable => "Not Suitable (0-19)",
            Self::MarginallySuitable => "Marginally Suitable (20-39)",
            Self::ModeratelySuitable => "Moderately Suitable (40-59)",
            Self::Suitable => "Suitable (60-79)",
            Self::HighlySuitable => "Highly Suitable (80-100)",
        }
    }
}

impl fmt::Display for SuitabilityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// UseClass
// ---------------------------------------------------------------------------

/// How a zone type treats a given project type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum UseClass {
    Primary,
    Conditional,
    Prohibited,
}

impl UseClass {
    /// Primary and conditional uses are permitted; prohibited is not.
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Primary | Self::Conditional)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Conditional => "conditional",
            Self::Prohibited => "prohibited",
        }
    }
}

impl fmt::Display for UseClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// FloodSusceptibility
// ---------------------------------------------------------------------------

/// Flood susceptibility rating of a barangay (hazard-map classes).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum FloodSusceptibility {
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl FloodSusceptibility {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
            Self::VeryHigh => "very_high",
        }
    }
}

impl fmt::Display for FloodSusceptibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ClusteringAlgorithm
// ---------------------------------------------------------------------------

/// Clustering strategies compared by the clustering comparator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ClusteringAlgorithm {
    Administrative,
    Kmeans,
    Dbscan,
    Hierarchical,
}

impl ClusteringAlgorithm {
    /// Run order; also the final tie-breaker when ranking.
    pub const ALL: [Self; 4] = [
        Self::Administrative,
        Self::Kmeans,
        Self::Dbscan,
        Self::Hierarchical,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Administrative => "administrative",
            Self::Kmeans => "kmeans",
            Self::Dbscan => "dbscan",
            Self::Hierarchical => "hierarchical",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Administrative => "Administrative (Barangay)",
            Self::Kmeans => "K-Means",
            Self::Dbscan => "DBSCAN",
            Self::Hierarchical => "Hierarchical",
        }
    }
}

impl fmt::Display for ClusteringAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CostType
// ---------------------------------------------------------------------------

/// Category of an itemized project expense.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum CostType {
    Material,
    Labor,
    Equipment,
    Other,
}

impl CostType {
    pub const ALL: [Self; 4] = [Self::Material, Self::Labor, Self::Equipment, Self::Other];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Material => "material",
            Self::Labor => "labor",
            Self::Equipment => "equipment",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for CostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AuditAction
// ---------------------------------------------------------------------------

/// Action recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Created,
    Updated,
    Deleted,
    StatusChanged,
    ZoneDetected,
    ZoneValidated,
    Analyzed,
    Decided,
}

impl AuditAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
            Self::StatusChanged => "status_changed",
            Self::ZoneDetected => "zone_detected",
            Self::ZoneValidated => "zone_validated",
            Self::Analyzed => "analyzed",
            Self::Decided => "decided",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EntityType
// ---------------------------------------------------------------------------

/// Persisted entity kinds referenced by audit entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Project,
    Zone,
    Suitability,
    BudgetRequest,
    Clustering,
    ProgressUpdate,
    CostEntry,
}

impl EntityType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Zone => "zone",
            Self::Suitability => "suitability",
            Self::BudgetRequest => "budget_request",
            Self::Clustering => "clustering",
            Self::ProgressUpdate => "progress_update",
            Self::CostEntry => "cost_entry",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_serde_roundtrip {
        ($name:ident, $ty:ty, $variant:expr, $expected_str:expr) => {
            #[test]
            fn $name() {
                let val = $variant;
                let json = serde_json::to_string(&val).unwrap();
                assert_eq!(json, format!("\"{}\"", $expected_str));
                let recovered: $ty = serde_json::from_str(&json).unwrap();
                assert_eq!(recovered, val);
            }
        };
    }

    test_serde_roundtrip!(
        project_in_progress,
        ProjectStatus,
        ProjectStatus::InProgress,
        "in_progress"
    );
    test_serde_roundtrip!(
        project_cancelled,
        ProjectStatus,
        ProjectStatus::Cancelled,
        "cancelled"
    );
    test_serde_roundtrip!(
        budget_approved,
        BudgetRequestStatus,
        BudgetRequestStatus::Approved,
        "approved"
    );
    test_serde_roundtrip!(
        category_moderately,
        SuitabilityCategory,
        SuitabilityCategory::ModeratelySuitable,
        "moderately_suitable"
    );
    test_serde_roundtrip!(use_conditional, UseClass, UseClass::Conditional, "conditional");
    test_serde_roundtrip!(
        flood_very_high,
        FloodSusceptibility,
        FloodSusceptibility::VeryHigh,
        "very_high"
    );
    test_serde_roundtrip!(
        algo_dbscan,
        ClusteringAlgorithm,
        ClusteringAlgorithm::Dbscan,
        "dbscan"
    );
    test_serde_roundtrip!(cost_equipment, CostType, CostType::Equipment, "equipment");
    test_serde_roundtrip!(
        entity_progress_update,
        EntityType,
        EntityType::ProgressUpdate,
        "progress_update"
    );
    test_serde_roundtrip!(
        audit_zone_validated,
        AuditAction,
        AuditAction::ZoneValidated,
        "zone_validated"
    );
    test_serde_roundtrip!(
        entity_budget_request,
        EntityType,
        EntityType::BudgetRequest,
        "budget_request"
    );

    // --- Transition tests ---

    #[test]
    fn budget_pending_can_be_decided() {
        assert!(BudgetRequestStatus::Pending.can_transition_to(BudgetRequestStatus::Approved));
        assert!(BudgetRequestStatus::Pending.can_transition_to(BudgetRequestStatus::Rejected));
    }

    #[test]
    fn budget_decisions_are_terminal() {
        assert!(BudgetRequestStatus::Approved.allowed_next_states().is_empty());
        assert!(BudgetRequestStatus::Rejected.allowed_next_states().is_empty());
        assert!(!BudgetRequestStatus::Approved.can_transition_to(BudgetRequestStatus::Rejected));
        assert!(!BudgetRequestStatus::Rejected.can_transition_to(BudgetRequestStatus::Pending));
        assert!(BudgetRequestStatus::Approved.is_decided());
        assert!(!BudgetRequestStatus::Pending.is_decided());
    }

    // --- Category thresholds ---

    #[test]
    fn category_thresholds() {
        assert_eq!(SuitabilityCategory::from_score(80.0), SuitabilityCategory::HighlySuitable);
        assert_eq!(SuitabilityCategory::from_score(79.99), SuitabilityCategory::Suitable);
        assert_eq!(SuitabilityCategory::from_score(60.0), SuitabilityCategory::Suitable);
        assert_eq!(SuitabilityCategory::from_score(59.0), SuitabilityCategory::ModeratelySuitable);
        assert_eq!(SuitabilityCategory::from_score(40.0), SuitabilityCategory::ModeratelySuitable);
        assert_eq!(SuitabilityCategory::from_score(39.0), SuitabilityCategory::MarginallySuitable);
        assert_eq!(SuitabilityCategory::from_score(20.0), SuitabilityCategory::MarginallySuitable);
        assert_eq!(SuitabilityCategory::from_score(19.99), SuitabilityCategory::NotSuitable);
        assert_eq!(SuitabilityCategory::from_score(0.0), SuitabilityCategory::NotSuitable);
    }

    #[test]
    fn category_is_monotonic_in_score() {
        let mut previous = SuitabilityCategory::from_score(0.0);
        for step in 0..=1000 {
            let score = f64::from(step) / 10.0;
            let current = SuitabilityCategory::from_score(score);
            assert!(current >= previous, "category dropped at score {score}");
            previous = current;
        }
    }

    #[test]
    fn category_clamps_out_of_range() {
        assert_eq!(SuitabilityCategory::from_score(150.0), SuitabilityCategory::HighlySuitable);
        assert_eq!(SuitabilityCategory::from_score(-3.0), SuitabilityCategory::NotSuitable);
        assert_eq!(SuitabilityCategory::from_score(f64::NAN), SuitabilityCategory::NotSuitable);
    }

    #[test]
    fn use_class_allowed() {
        assert!(UseClass::Primary.is_allowed());
        assert!(UseClass::Conditional.is_allowed());
        assert!(!UseClass::Prohibited.is_allowed());
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(format!("{}", ProjectStatus::InProgress), "in_progress");
        assert_eq!(format!("{}", BudgetRequestStatus::Rejected), "rejected");
        assert_eq!(
            format!("{}", SuitabilityCategory::HighlySuitable),
            "highly_suitable"
        );
        assert_eq!(format!("{}", UseClass::Prohibited), "prohibited");
        assert_eq!(format!("{}", FloodSusceptibility::Moderate), "moderate");
        assert_eq!(format!("{}", ClusteringAlgorithm::Hierarchical), "hierarchical");
        assert_eq!(format!("{}", AuditAction::StatusChanged), "status_changed");
        assert_eq!(format!("{}", EntityType::Suitability), "suitability");
        assert_eq!(format!("{}", EntityType::CostEntry), "cost_entry");
        assert_eq!(format!("{}", CostType::Labor), "labor");
    }
}
