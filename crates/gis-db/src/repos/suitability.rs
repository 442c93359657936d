//! Land-suitability repository and batch analysis.
//!
//! One stored analysis per project; saving again overwrites it.

use chrono::Utc;

use gis_core::audit_detail::AnalyzedDetail;
use gis_core::entities::{FactorScores, LandSuitabilityAnalysis, Project, RiskFlags};
use gis_core::enums::{AuditAction, EntityType};
use gis_core::responses::SuitabilityBatchSummary;

use crate::error::DatabaseError;
use crate::helpers::{get_bool, parse_datetime, parse_enum, parse_json};
use crate::repos::project::ProjectFilter;
use crate::service::GisService;

const SELECT_COLS: &str = "project_id, overall_score, category, \
     zoning_compliance_score, flood_risk_score, terrain_score, accessibility_score, environmental_score, \
     has_flood_risk, has_slope_risk, has_zoning_conflict, has_infrastructure_gap, has_environmental_concern, \
     recommendations, analyzed_at";

/// Which projects a batch run covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisScope {
    Project(String),
    Barangay(String),
    All,
}

/// Batch run options.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    pub scope: AnalysisScope,
    /// Persist each result.
    pub save: bool,
    /// Leave projects that already have a stored analysis alone.
    pub skip_existing: bool,
    pub city_center: (f64, f64),
}

/// Result of a batch run. `results` holds every analysis produced, saved or not.
#[derive(Debug, Clone, Default)]
pub struct AnalysisRun {
    pub summary: SuitabilityBatchSummary,
    pub results: Vec<LandSuitabilityAnalysis>,
}

fn row_to_analysis(row: &libsql::Row) -> Result<LandSuitabilityAnalysis, DatabaseError> {
    Ok(LandSuitabilityAnalysis {
        project_id: row.get(0)?,
        overall_score: row.get(1)?,
        category: parse_enum(&row.get::<String>(2)?)?,
        factors: FactorScores {
            zoning_compliance: row.get(3)?,
            flood_risk: row.get(4)?,
            terrain: row.get(5)?,
            accessibility: row.get(6)?,
            environmental: row.get(7)?,
        },
        risks: RiskFlags {
            has_flood_risk: get_bool(row, 8)?,
            has_slope_risk: get_bool(row, 9)?,
            has_zoning_conflict: get_bool(row, 10)?,
            has_infrastructure_gap: get_bool(row, 11)?,
            has_environmental_concern: get_bool(row, 12)?,
        },
        recommendations: parse_json(&row.get::<String>(13)?)?,
        analyzed_at: parse_datetime(&row.get::<String>(14)?)?,
    })
}

impl GisService {
    /// Insert or overwrite the analysis of a project.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the write fails; the caller decides whether
    /// to continue.
    pub async fn save_analysis(
        &self,
        actor: &str,
        analysis: &LandSuitabilityAnalysis,
    ) -> Result<(), DatabaseError> {
        let recommendations = serde_json::to_string(&analysis.recommendations)
            .map_err(|e| DatabaseError::Other(e.into()))?;
        let f = &analysis.factors;
        let r = &analysis.risks;

        let tx = self.db().conn().transaction().await?;
        tx.execute(
            &format!(
                "INSERT INTO land_suitability_analyses ({SELECT_COLS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
                 ON CONFLICT(project_id) DO UPDATE SET
                    overall_score = excluded.overall_score,
                    category = excluded.category,
                    zoning_compliance_score = excluded.zoning_compliance_score,
                    flood_risk_score = excluded.flood_risk_score,
                    terrain_score = excluded.terrain_score,
                    accessibility_score = excluded.accessibility_score,
                    environmental_score = excluded.environmental_score,
                    has_flood_risk = excluded.has_flood_risk,
                    has_slope_risk = excluded.has_slope_risk,
                    has_zoning_conflict = excluded.has_zoning_conflict,
                    has_infrastructure_gap = excluded.has_infrastructure_gap,
                    has_environmental_concern = excluded.has_environmental_concern,
                    recommendations = excluded.recommendations,
                    analyzed_at = excluded.analyzed_at"
            ),
            libsql::params![
                analysis.project_id.as_str(),
                analysis.overall_score,
                analysis.category.as_str(),
                f.zoning_compliance,
                f.flood_risk,
                f.terrain,
                f.accessibility,
                f.environmental,
                i64::from(r.has_flood_risk),
                i64::from(r.has_slope_risk),
                i64::from(r.has_zoning_conflict),
                i64::from(r.has_infrastructure_gap),
                i64::from(r.has_environmental_concern),
                recommendations,
                analysis.analyzed_at.to_rfc3339()
            ],
        )
        .await?;

        let detail = AnalyzedDetail {
            overall_score: analysis.overall_score,
            category: analysis.category.as_str().to_string(),
        };
        self.record_audit(
            EntityType::Suitability,
            &analysis.project_id,
            AuditAction::Analyzed,
            actor,
            Some(&detail),
        )
        .await?;
        tx.commit().await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn get_analysis(
        &self,
        project_id: &str,
    ) -> Result<Option<LandSuitabilityAnalysis>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM land_suitability_analyses WHERE project_id = ?1"),
                [project_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_analysis(&row)?)),
            None => Ok(None),
        }
    }

    /// Stored analyses, best score first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_analyses(
        &self,
        limit: Option<u32>,
    ) -> Result<Vec<LandSuitabilityAnalysis>, DatabaseError> {
        let limit_clause = limit.map(|l| format!("LIMIT {l}")).unwrap_or_default();
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM land_suitability_analyses
                     ORDER BY overall_score DESC, project_id {limit_clause}"
                ),
                (),
            )
            .await?;
        let mut analyses = Vec::new();
        while let Some(row) = rows.next().await? {
            analyses.push(row_to_analysis(&row)?);
        }
        Ok(analyses)
    }

    async fn has_analysis(&self, project_id: &str) -> Result<bool, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT 1 FROM land_suitability_analyses WHERE project_id = ?1",
                [project_id],
            )
            .await?;
        Ok(rows.next().await?.is_some())
    }

    async fn projects_in_scope(&self, scope: &AnalysisScope) -> Result<Vec<Project>, DatabaseError> {
        match scope {
            AnalysisScope::Project(id) => Ok(vec![self.get_project(id).await?]),
            AnalysisScope::Barangay(barangay) => {
                self.list_projects(&ProjectFilter {
                    barangay: Some(barangay.clone()),
                    ..ProjectFilter::default()
                })
                .await
            }
            AnalysisScope::All => self.list_projects(&ProjectFilter::default()).await,
        }
    }

    /// Score every project in scope.
    ///
    /// Failing to load the projects or the reference snapshot aborts the run.
    /// A failed save is logged and counted, and the run continues.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` when the scope or reference data cannot be
    /// loaded, or `DatabaseError::NotFound` for an unknown single project.
    pub async fn analyze_projects(
        &self,
        actor: &str,
        options: &AnalysisOptions,
    ) -> Result<AnalysisRun, DatabaseError> {
        let projects = self.projects_in_scope(&options.scope).await?;
        let reference = self.load_reference().await?;
        let compatibility = reference.compatibility();
        let analyzer = reference.analyzer(&compatibility, options.city_center);

        let mut run = AnalysisRun::default();
        for project in &projects {
            if options.skip_existing {
                match self.has_analysis(&project.id).await {
                    Ok(true) => {
                        run.summary.skipped += 1;
                        continue;
                    }
                    Ok(false) => {}
                    Err(e) => {
                        tracing::warn!(project = %project.id, error = %e, "existing analysis lookup failed");
                        run.summary.errors += 1;
                        continue;
                    }
                }
            }

            let Some(result) = analyzer.analyze(project) else {
                run.summary.no_coordinates += 1;
                continue;
            };
            let analysis = result.into_analysis(&project.id, Utc::now());
            run.summary.analyzed += 1;
            run.summary.record_category(analysis.category);

            if options.save {
                match self.save_analysis(actor, &analysis).await {
                    Ok(()) => run.summary.saved += 1,
                    Err(e) => {
                        tracing::warn!(project = %project.id, error = %e, "saving analysis failed");
                        run.summary.errors += 1;
                    }
                }
            }
            run.results.push(analysis);
        }

        tracing::info!(
            analyzed = run.summary.analyzed,
            saved = run.summary.saved,
            skipped = run.summary.skipped,
            no_coordinates = run.summary.no_coordinates,
            errors = run.summary.errors,
            "suitability batch finished"
        );
        Ok(run)
    }
}
