//! Project-type vs zone-type compatibility.
//!
//! Rules come from the `zone_allowed_uses` reference table: per (project type,
//! zone type) a use class of primary, conditional, or prohibited. A pair with
//! no rule is treated as not allowed.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use gis_core::entities::{ProjectType, ZoneAllowedUse, ZoningZone};
use gis_core::enums::UseClass;
use gis_core::zone_code::{ZoneType, display_zone_code, normalize_zone_code};

use crate::error::AnalysisError;

pub const PRIMARY_BASE_SCORE: u32 = 100;
pub const CONDITIONAL_BASE_SCORE: u32 = 60;
/// Bonus when the zone type appears in the registry at all.
pub const REGISTRY_PRESENCE_BONUS: u32 = 10;
/// Bonus per active registry zone of the type, capped at [`MAX_AVAILABILITY_BONUS`].
pub const PER_ZONE_BONUS: u32 = 2;
pub const MAX_AVAILABILITY_BONUS: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub project_type: String,
    pub zone_type: String,
    pub is_allowed: bool,
    pub use_class: Option<UseClass>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZoneRecommendation {
    pub zone_type: String,
    pub display_name: String,
    pub use_class: UseClass,
    pub score: u32,
    pub active_zones: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecommendationSet {
    pub project_type: String,
    pub recommendations: Vec<ZoneRecommendation>,
    /// Set when there is nothing to recommend.
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllowedZone {
    pub zone_type: String,
    pub use_class: UseClass,
}

/// Registry counts for one zone type.
#[derive(Debug, Clone, Copy, Default)]
struct RegistryCount {
    total: usize,
    active: usize,
}

/// In-memory view of the project-type rules plus registry availability.
#[derive(Debug, Clone, Default)]
pub struct CompatibilityEngine {
    project_types: BTreeMap<String, ProjectType>,
    // project type -> zone type -> use class
    rules: HashMap<String, BTreeMap<String, UseClass>>,
    registry: HashMap<String, RegistryCount>,
}

impl CompatibilityEngine {
    #[must_use]
    pub fn new(
        project_types: Vec<ProjectType>,
        rules: &[ZoneAllowedUse],
        registry: &[ZoningZone],
    ) -> Self {
        let project_types = project_types
            .into_iter()
            .map(|pt| (pt.code.clone(), pt))
            .collect();

        let mut rule_map: HashMap<String, BTreeMap<String, UseClass>> = HashMap::new();
        for rule in rules {
            rule_map
                .entry(rule.project_type.clone())
                .or_default()
                .insert(canonical(&rule.zone_type), rule.use_class);
        }

        let mut counts: HashMap<String, RegistryCount> = HashMap::new();
        for zone in registry {
            let entry = counts.entry(canonical(&zone.zone_type)).or_default();
            entry.total += 1;
            if zone.is_active {
                entry.active += 1;
            }
        }

        Self {
            project_types,
            rules: rule_map,
            registry: counts,
        }
    }

    #[must_use]
    pub fn project_type(&self, code: &str) -> Option<&ProjectType> {
        self.project_types.get(code)
    }

    pub fn project_types(&self) -> impl Iterator<Item = &ProjectType> {
        self.project_types.values()
    }

    /// Use class for a pair; `None` when either side is unknown or no rule exists.
    #[must_use]
    pub fn use_class(&self, project_type: &str, zone_type: &str) -> Option<UseClass> {
        self.rules
            .get(project_type)?
            .get(&canonical(zone_type))
            .copied()
    }

    /// Whether `project_type` may be built in `zone_type`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::ProjectTypeNotFound`] for an unknown project type.
    pub fn validate(
        &self,
        project_type: &str,
        zone_type: &str,
    ) -> Result<ValidationResult, AnalysisError> {
        let pt = self.require(project_type)?;
        let zone = canonical(zone_type);
        let label = display_zone_code(&zone);
        let use_class = self.use_class(project_type, &zone);

        let message = match use_class {
            Some(UseClass::Primary) => format!("{} is a primary use in {label}", pt.name),
            Some(UseClass::Conditional) => format!(
                "{} is a conditional use in {label}; a special use permit is required",
                pt.name
            ),
            Some(UseClass::Prohibited) => format!("{} is prohibited in {label}", pt.name),
            None => format!("No zoning rule allows {} in {label}", pt.name),
        };

        Ok(ValidationResult {
            project_type: project_type.to_string(),
            zone_type: zone,
            is_allowed: use_class.is_some_and(UseClass::is_allowed),
            use_class,
            message,
        })
    }

    /// Allowed zones for a project type: primary first, then conditional.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::ProjectTypeNotFound`] for an unknown project type.
    pub fn allowed_zones(&self, project_type: &str) -> Result<Vec<AllowedZone>, AnalysisError> {
        self.require(project_type)?;
        let mut zones: Vec<AllowedZone> = self
            .rules
            .get(project_type)
            .into_iter()
            .flatten()
            .filter(|(_, class)| class.is_allowed())
            .map(|(zone_type, class)| AllowedZone {
                zone_type: zone_type.clone(),
                use_class: *class,
            })
            .collect();
        zones.sort_by(|a, b| {
            class_rank(a.use_class)
                .cmp(&class_rank(b.use_class))
                .then_with(|| zone_order(&a.zone_type).cmp(&zone_order(&b.zone_type)))
        });
        Ok(zones)
    }

    /// Top `limit` zones for a project type.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::ProjectTypeNotFound`] for an unknown project type.
    pub fn recommend(
        &self,
        project_type: &str,
        limit: usize,
    ) -> Result<RecommendationSet, AnalysisError> {
        let allowed = self.allowed_zones(project_type)?;

        let mut recommendations: Vec<ZoneRecommendation> = allowed
            .into_iter()
            .map(|allowed| {
                let counts = self
                    .registry
                    .get(&allowed.zone_type)
                    .copied()
                    .unwrap_or_default();
                ZoneRecommendation {
                    display_name: display_zone_code(&allowed.zone_type),
                    score: score_zone(allowed.use_class, counts),
                    active_zones: counts.active,
                    zone_type: allowed.zone_type,
                    use_class: allowed.use_class,
                }
            })
            .collect();

        recommendations.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| zone_order(&a.zone_type).cmp(&zone_order(&b.zone_type)))
        });
        let message = recommendations
            .is_empty()
            .then(|| format!("No zone allows project type {project_type}"));
        recommendations.truncate(limit);

        Ok(RecommendationSet {
            project_type: project_type.to_string(),
            recommendations,
            message,
        })
    }

    fn require(&self, project_type: &str) -> Result<&ProjectType, AnalysisError> {
        self.project_types
            .get(project_type)
            .ok_or_else(|| AnalysisError::ProjectTypeNotFound(project_type.to_string()))
    }
}

fn score_zone(use_class: UseClass, counts: RegistryCount) -> u32 {
    let base = match use_class {
        UseClass::Primary => PRIMARY_BASE_SCORE,
        UseClass::Conditional => CONDITIONAL_BASE_SCORE,
        UseClass::Prohibited => 0,
    };
    let presence = if counts.total > 0 {
        REGISTRY_PRESENCE_BONUS
    } else {
        0
    };
    let active = u32::try_from(counts.active).unwrap_or(u32::MAX);
    let availability = active.saturating_mul(PER_ZONE_BONUS).min(MAX_AVAILABILITY_BONUS);
    base + presence + availability
}

const fn class_rank(class: UseClass) -> u8 {
    match class {
        UseClass::Primary => 0,
        UseClass::Conditional => 1,
        UseClass::Prohibited => 2,
    }
}

/// Ordinance order for known codes, then alphabetical for custom ones.
fn zone_order(code: &str) -> (usize, &str) {
    let index = ZoneType::ALL
        .iter()
        .position(|z| z.code() == code)
        .unwrap_or(ZoneType::ALL.len());
    (index, code)
}

/// Canonical code when known, otherwise the trimmed input.
fn canonical(zone_type: &str) -> String {
    normalize_zone_code(zone_type).map_or_else(|| zone_type.trim().to_string(), str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn pt(code: &str, name: &str) -> ProjectType {
        ProjectType {
            code: code.into(),
            name: name.into(),
            description: None,
        }
    }

    fn rule(project_type: &str, zone_type: &str, use_class: UseClass) -> ZoneAllowedUse {
        ZoneAllowedUse {
            project_type: project_type.into(),
            zone_type: zone_type.into(),
            use_class,
        }
    }

    fn zone(zone_type: &str, is_active: bool) -> ZoningZone {
        ZoningZone {
            id: format!("zon-{zone_type}"),
            zone_type: zone_type.into(),
            barangay: "Apokon".into(),
            location_description: None,
            keywords: vec![],
            is_active,
            created_at: Utc::now(),
        }
    }

    fn engine() -> CompatibilityEngine {
        CompatibilityEngine::new(
            vec![pt("school", "School Building"), pt("warehouse", "Warehouse"), pt("kiosk", "Kiosk")],
            &[
                rule("school", "INS-1", UseClass::Primary),
                rule("school", "R-1", UseClass::Conditional),
                rule("school", "R-2", UseClass::Conditional),
                rule("school", "I-1", UseClass::Prohibited),
                rule("warehouse", "I-2", UseClass::Primary),
                rule("warehouse", "C-2", UseClass::Conditional),
                rule("warehouse", "R-1", UseClass::Prohibited),
                rule("kiosk", "R-1", UseClass::Prohibited),
            ],
            &[
                zone("INS-1", true),
                zone("R-2", true),
                zone("R-2", true),
                zone("R-2", true),
                zone("R-2", true),
                zone("R-2", true),
                zone("R-2", true),
                zone("R-1", false),
            ],
        )
    }

    #[rstest]
    #[case("INS-1", true, Some(UseClass::Primary))]
    #[case("r1", true, Some(UseClass::Conditional))]
    #[case("I-1", false, Some(UseClass::Prohibited))]
    #[case("PARKS", false, None)]
    fn validate_cases(
        #[case] zone: &str,
        #[case] allowed: bool,
        #[case] class: Option<UseClass>,
    ) {
        let result = engine().validate("school", zone).unwrap();
        assert_eq!(result.is_allowed, allowed);
        assert_eq!(result.use_class, class);
        assert!(result.message.contains("School Building"));
    }

    #[test]
    fn validate_unknown_project_type_is_an_error() {
        let err = engine().validate("spaceport", "R-1").unwrap_err();
        assert!(matches!(err, AnalysisError::ProjectTypeNotFound(ref code) if code == "spaceport"));
    }

    #[test]
    fn allowed_zones_primary_first() {
        let zones = engine().allowed_zones("school").unwrap();
        let codes: Vec<_> = zones.iter().map(|z| z.zone_type.as_str()).collect();
        assert_eq!(codes, vec!["INS-1", "R-1", "R-2"]);
        assert_eq!(zones[0].use_class, UseClass::Primary);
    }

    #[test]
    fn recommend_scores_and_ranks() {
        let set = engine().recommend("school", 10).unwrap();
        let ranked: Vec<_> = set
            .recommendations
            .iter()
            .map(|r| (r.zone_type.as_str(), r.score))
            .collect();
        // INS-1: 100 + 10 + 2; R-2: 60 + 10 + min(10, 12); R-1: 60 + 10 + 0 (inactive)
        assert_eq!(ranked, vec![("INS-1", 112), ("R-2", 80), ("R-1", 70)]);
        assert!(set.message.is_none());
    }

    #[test]
    fn recommend_ties_break_by_zone_order() {
        let set = engine().recommend("warehouse", 5).unwrap();
        // Neither I-2 nor C-2 is in the registry.
        let ranked: Vec<_> = set
            .recommendations
            .iter()
            .map(|r| (r.zone_type.as_str(), r.score))
            .collect();
        assert_eq!(ranked, vec![("I-2", 100), ("C-2", 60)]);
    }

    #[test]
    fn recommend_respects_limit() {
        let set = engine().recommend("school", 1).unwrap();
        assert_eq!(set.recommendations.len(), 1);
        assert_eq!(set.recommendations[0].zone_type, "INS-1");
    }

    #[test]
    fn recommend_with_no_allowed_zones() {
        let set = engine().recommend("kiosk", 5).unwrap();
        assert!(set.recommendations.is_empty());
        assert!(set.message.is_some());
    }

    #[test]
    fn zero_limit_keeps_allowed_zones_message_empty() {
        let set = engine().recommend("school", 0).unwrap();
        assert!(set.recommendations.is_empty());
        assert_eq!(set.message, None);
    }

    #[test]
    fn recommend_unknown_type() {
        assert!(matches!(
            engine().recommend("spaceport", 5),
            Err(AnalysisError::ProjectTypeNotFound(_))
        ));
    }

    #[test]
    fn use_class_lookup_normalizes_zone_code() {
        let engine = engine();
        assert_eq!(engine.use_class("school", "ins1"), Some(UseClass::Primary));
        assert_eq!(engine.use_class("school", "AGRO"), None);
        assert_eq!(engine.use_class("nope", "R-1"), None);
    }
}
