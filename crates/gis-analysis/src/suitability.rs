//! Land-suitability scoring.
//!
//! Five independent factors, each scored 0–100, are combined with fixed
//! weights into an overall score that maps onto a [`SuitabilityCategory`].
//!
//! | factor | weight |
//! |---|---|
//! | zoning compliance | [`WEIGHT_ZONING_COMPLIANCE`] |
//! | flood risk | [`WEIGHT_FLOOD_RISK`] |
//! | terrain | [`WEIGHT_TERRAIN`] |
//! | accessibility | [`WEIGHT_ACCESSIBILITY`] |
//! | environmental | [`WEIGHT_ENVIRONMENTAL`] |
//!
//! Missing inputs score a neutral value rather than failing. A project
//! without usable coordinates gets no result at all.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use gis_core::entities::{BarangayProfile, FactorScores, LandSuitabilityAnalysis, Project, RiskFlags};
use gis_core::enums::{FloodSusceptibility, SuitabilityCategory, UseClass};

use crate::compatibility::CompatibilityEngine;
use crate::geo::haversine_km;

pub const WEIGHT_ZONING_COMPLIANCE: f64 = 0.30;
pub const WEIGHT_FLOOD_RISK: f64 = 0.25;
pub const WEIGHT_TERRAIN: f64 = 0.15;
pub const WEIGHT_ACCESSIBILITY: f64 = 0.20;
pub const WEIGHT_ENVIRONMENTAL: f64 = 0.10;

/// Factor score at or below which the matching risk flag is raised.
pub const RISK_THRESHOLD: f64 = 30.0;
/// Accessibility and environmental flags use a looser threshold.
pub const CONCERN_THRESHOLD: f64 = 40.0;

const UNKNOWN_ZONING: f64 = 50.0;
const UNKNOWN_FLOOD: f64 = 50.0;
const UNKNOWN_TERRAIN: f64 = 50.0;
const UNKNOWN_ENVIRONMENTAL: f64 = 70.0;

/// (max slope %, score), checked in order.
const SLOPE_BANDS: [(f64, f64); 4] = [(3.0, 100.0), (8.0, 80.0), (18.0, 55.0), (30.0, 30.0)];
const STEEP_SLOPE_SCORE: f64 = 10.0;

/// (max km to the city centre, score), checked in order.
const DISTANCE_BANDS: [(f64, f64); 4] = [(2.0, 100.0), (5.0, 80.0), (10.0, 60.0), (20.0, 40.0)];
const REMOTE_SCORE: f64 = 20.0;

pub const REC_FLOOD: &str =
    "High flood susceptibility: raise floor levels and include drainage works in the design.";
pub const REC_SLOPE: &str = "Steep terrain: budget for slope protection and earthworks.";
pub const REC_ZONING: &str =
    "Project type is prohibited in this zone: secure a zoning variance or relocate the project.";
pub const REC_INFRASTRUCTURE: &str =
    "Far from the city centre: plan access roads and utility connections.";
pub const REC_ENVIRONMENTAL: &str =
    "Environmentally sensitive area: an environmental compliance certificate is required.";
pub const REC_CLEAN: &str = "Site is suitable for development; no major risks identified.";

/// Analyzer output before it is attached to a project and timestamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuitabilityResult {
    pub overall_score: f64,
    pub category: SuitabilityCategory,
    pub factors: FactorScores,
    pub risks: RiskFlags,
    pub recommendations: Vec<String>,
}

impl SuitabilityResult {
    #[must_use]
    pub fn into_analysis(self, project_id: &str, analyzed_at: DateTime<Utc>) -> LandSuitabilityAnalysis {
        LandSuitabilityAnalysis {
            project_id: project_id.to_string(),
            overall_score: self.overall_score,
            category: self.category,
            factors: self.factors,
            risks: self.risks,
            recommendations: self.recommendations,
            analyzed_at,
        }
    }
}

/// Reference data the analyzer reads.
pub struct SuitabilityAnalyzer<'a> {
    profiles: HashMap<String, &'a BarangayProfile>,
    compatibility: &'a CompatibilityEngine,
    city_center: (f64, f64),
}

impl<'a> SuitabilityAnalyzer<'a> {
    #[must_use]
    pub fn new(
        profiles: &'a [BarangayProfile],
        compatibility: &'a CompatibilityEngine,
        city_center: (f64, f64),
    ) -> Self {
        let profiles = profiles
            .iter()
            .map(|p| (barangay_key(&p.barangay), p))
            .collect();
        Self {
            profiles,
            compatibility,
            city_center,
        }
    }

    /// Score one project. `None` when it has no usable coordinates.
    #[must_use]
    pub fn analyze(&self, project: &Project) -> Option<SuitabilityResult> {
        let (lat, lng) = project.coordinates()?;
        let profile = project
            .barangay
            .as_deref()
            .and_then(|b| self.profiles.get(&barangay_key(b)).copied());

        let use_class = match (project.project_type.as_deref(), project.zone_type.as_deref()) {
            (Some(pt), Some(zone)) => self.compatibility.use_class(pt, zone),
            _ => None,
        };

        let distance_km = haversine_km(lat, lng, self.city_center.0, self.city_center.1);

        let factors = FactorScores {
            zoning_compliance: zoning_score(use_class),
            flood_risk: flood_score(profile.and_then(|p| p.flood_susceptibility)),
            terrain: terrain_score(profile.and_then(|p| p.mean_slope_pct)),
            accessibility: accessibility_score(distance_km),
            environmental: environmental_score(profile.and_then(|p| p.environmentally_sensitive)),
        };

        let overall_score = overall(&factors);
        let risks = RiskFlags {
            has_flood_risk: factors.flood_risk <= RISK_THRESHOLD,
            has_slope_risk: factors.terrain <= RISK_THRESHOLD,
            has_zoning_conflict: use_class == Some(UseClass::Prohibited),
            has_infrastructure_gap: factors.accessibility <= CONCERN_THRESHOLD,
            has_environmental_concern: factors.environmental <= CONCERN_THRESHOLD,
        };

        tracing::debug!(
            project_id = %project.id,
            overall_score,
            distance_km,
            "suitability scored"
        );

        Some(SuitabilityResult {
            overall_score,
            category: SuitabilityCategory::from_score(overall_score),
            factors,
            risks,
            recommendations: recommendations(risks),
        })
    }
}

/// Weighted sum rounded to 2 dp and clamped to `0..=100`.
#[must_use]
pub fn overall(factors: &FactorScores) -> f64 {
    let raw = factors.zoning_compliance * WEIGHT_ZONING_COMPLIANCE
        + factors.flood_risk * WEIGHT_FLOOD_RISK
        + factors.terrain * WEIGHT_TERRAIN
        + factors.accessibility * WEIGHT_ACCESSIBILITY
        + factors.environmental * WEIGHT_ENVIRONMENTAL;
    ((raw * 100.0).round() / 100.0).clamp(0.0, 100.0)
}

#[must_use]
pub const fn zoning_score(use_class: Option<UseClass>) -> f64 {
    match use_class {
        Some(UseClass::Primary) => 100.0,
        Some(UseClass::Conditional) => 65.0,
        Some(UseClass::Prohibited) => 10.0,
        None => UNKNOWN_ZONING,
    }
}

#[must_use]
pub const fn flood_score(susceptibility: Option<FloodSusceptibility>) -> f64 {
    match susceptibility {
        Some(FloodSusceptibility::Low) => 100.0,
        Some(FloodSusceptibility::Moderate) => 60.0,
        Some(FloodSusceptibility::High) => 30.0,
        Some(FloodSusceptibility::VeryHigh) => 10.0,
        None => UNKNOWN_FLOOD,
    }
}

#[must_use]
pub fn terrain_score(mean_slope_pct: Option<f64>) -> f64 {
    let Some(slope) = mean_slope_pct.filter(|s| s.is_finite() && *s >= 0.0) else {
        return UNKNOWN_TERRAIN;
    };
    banded(slope, &SLOPE_BANDS, STEEP_SLOPE_SCORE)
}

#[must_use]
pub fn accessibility_score(distance_km: f64) -> f64 {
    banded(distance_km, &DISTANCE_BANDS, REMOTE_SCORE)
}

#[must_use]
pub const fn environmental_score(sensitive: Option<bool>) -> f64 {
    match sensitive {
        Some(true) => 40.0,
        Some(false) => 100.0,
        None => UNKNOWN_ENVIRONMENTAL,
    }
}

fn banded(value: f64, bands: &[(f64, f64)], otherwise: f64) -> f64 {
    bands
        .iter()
        .find(|(max, _)| value <= *max)
        .map_or(otherwise, |(_, score)| *score)
}

fn recommendations(risks: RiskFlags) -> Vec<String> {
    let mut out = Vec::new();
    if risks.has_flood_risk {
        out.push(REC_FLOOD.to_string());
    }
    if risks.has_slope_risk {
        out.push(REC_SLOPE.to_string());
    }
    if risks.has_zoning_conflict {
        out.push(REC_ZONING.to_string());
    }
    if risks.has_infrastructure_gap {
        out.push(REC_INFRASTRUCTURE.to_string());
    }
    if risks.has_environmental_concern {
        out.push(REC_ENVIRONMENTAL.to_string());
    }
    if out.is_empty() {
        out.push(REC_CLEAN.to_string());
    }
    out
}

fn barangay_key(name: &str) -> String {
    name.trim().to_lowercase()
}
