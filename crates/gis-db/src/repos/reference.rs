//! Reference data repository: project types, allowed-use rules, barangay
//! profiles, and the in-memory snapshot the analyzers run against.

use gis_analysis::compatibility::CompatibilityEngine;
use gis_analysis::detector::ZoneDetector;
use gis_analysis::suitability::SuitabilityAnalyzer;
use gis_core::entities::{BarangayProfile, ProjectType, ZoneAllowedUse, ZoningZone};
use gis_core::zone_code::normalize_zone_code;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_bool, get_opt_string, parse_enum};
use crate::service::GisService;

/// Everything the detector, analyzer, and compatibility engine read.
///
/// Loaded once per batch run; a failure here aborts the run.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub zones: Vec<ZoningZone>,
    pub project_types: Vec<ProjectType>,
    pub rules: Vec<ZoneAllowedUse>,
    pub profiles: Vec<BarangayProfile>,
}

impl ReferenceData {
    #[must_use]
    pub fn compatibility(&self) -> CompatibilityEngine {
        CompatibilityEngine::new(self.project_types.clone(), &self.rules, &self.zones)
    }

    #[must_use]
    pub fn detector(&self) -> ZoneDetector<'_> {
        ZoneDetector::new(&self.zones)
    }

    #[must_use]
    pub fn analyzer<'a>(
        &'a self,
        compatibility: &'a CompatibilityEngine,
        city_center: (f64, f64),
    ) -> SuitabilityAnalyzer<'a> {
        SuitabilityAnalyzer::new(&self.profiles, compatibility, city_center)
    }
}

fn row_to_profile(row: &libsql::Row) -> Result<BarangayProfile, DatabaseError> {
    Ok(BarangayProfile {
        barangay: row.get(0)?,
        flood_susceptibility: get_opt_string(row, 1)?
            .map(|s| parse_enum(&s))
            .transpose()?,
        mean_slope_pct: row.get::<Option<f64>>(2)?,
        environmentally_sensitive: get_opt_bool(row, 3)?,
    })
}

impl GisService {
    /// Insert or replace a project type.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the write fails.
    pub async fn upsert_project_type(&self, project_type: &ProjectType) -> Result<(), DatabaseError> {
        self.db()
            .conn()
            .execute(
                "INSERT INTO project_types (code, name, description) VALUES (?1, ?2, ?3)
                 ON CONFLICT(code) DO UPDATE SET name = excluded.name, description = excluded.description",
                libsql::params![
                    project_type.code.as_str(),
                    project_type.name.as_str(),
                    project_type.description.as_deref()
                ],
            )
            .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_project_types(&self) -> Result<Vec<ProjectType>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query("SELECT code, name, description FROM project_types ORDER BY code", ())
            .await?;
        let mut types = Vec::new();
        while let Some(row) = rows.next().await? {
            types.push(ProjectType {
                code: row.get(0)?,
                name: row.get(1)?,
                description: get_opt_string(&row, 2)?,
            });
        }
        Ok(types)
    }

    /// Set the use class of a (project type, zone type) pair.
    ///
    /// The zone code is stored in canonical form.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Analysis` for an unknown zone code and
    /// `DatabaseError::NotFound` when the project type does not exist.
    pub async fn set_allowed_use(&self, rule: &ZoneAllowedUse) -> Result<(), DatabaseError> {
        let zone_type = normalize_zone_code(&rule.zone_type).ok_or_else(|| {
            gis_analysis::AnalysisError::UnknownZoneCode(rule.zone_type.clone())
        })?;

        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT 1 FROM project_types WHERE code = ?1",
                [rule.project_type.as_str()],
            )
            .await?;
        if rows.next().await?.is_none() {
            return Err(DatabaseError::not_found("project type", &rule.project_type));
        }

        self.db()
            .conn()
            .execute(
                "INSERT INTO zone_allowed_uses (project_type, zone_type, use_class) VALUES (?1, ?2, ?3)
                 ON CONFLICT(project_type, zone_type) DO UPDATE SET use_class = excluded.use_class",
                libsql::params![
                    rule.project_type.as_str(),
                    zone_type,
                    rule.use_class.as_str()
                ],
            )
            .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_allowed_uses(&self) -> Result<Vec<ZoneAllowedUse>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT project_type, zone_type, use_class FROM zone_allowed_uses
                 ORDER BY project_type, zone_type",
                (),
            )
            .await?;
        let mut rules = Vec::new();
        while let Some(row) = rows.next().await? {
            rules.push(ZoneAllowedUse {
                project_type: row.get(0)?,
                zone_type: row.get(1)?,
                use_class: parse_enum(&row.get::<String>(2)?)?,
            });
        }
        Ok(rules)
    }

    /// Insert or replace the hazard profile of a barangay.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the write fails.
    pub async fn upsert_barangay_profile(&self, profile: &BarangayProfile) -> Result<(), DatabaseError> {
        self.db()
            .conn()
            .execute(
                "INSERT INTO barangay_profiles (barangay, flood_susceptibility, mean_slope_pct, environmentally_sensitive)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(barangay) DO UPDATE SET
                    flood_susceptibility = excluded.flood_susceptibility,
                    mean_slope_pct = excluded.mean_slope_pct,
                    environmentally_sensitive = excluded.environmentally_sensitive",
                libsql::params![
                    profile.barangay.trim(),
                    profile.flood_susceptibility.map(|f| f.as_str()),
                    profile.mean_slope_pct,
                    profile.environmentally_sensitive.map(i64::from)
                ],
            )
            .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_barangay_profiles(&self) -> Result<Vec<BarangayProfile>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT barangay, flood_susceptibility, mean_slope_pct, environmentally_sensitive
                 FROM barangay_profiles ORDER BY barangay",
                (),
            )
            .await?;
        let mut profiles = Vec::new();
        while let Some(row) = rows.next().await? {
            profiles.push(row_to_profile(&row)?);
        }
        Ok(profiles)
    }

    /// Load the full reference snapshot: zones in registry order, types,
    /// rules, and profiles.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if any of the reads fail.
    pub async fn load_reference(&self) -> Result<ReferenceData, DatabaseError> {
        Ok(ReferenceData {
            zones: self.list_zones(true).await?,
            project_types: self.list_project_types().await?,
            rules: self.list_allowed_uses().await?,
            profiles: self.list_barangay_profiles().await?,
        })
    }
}
