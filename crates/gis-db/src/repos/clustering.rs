//! Clustering comparison runs and their stored snapshots.

use chrono::Utc;

use gis_analysis::clustering::{self, ClusterPoint, ClusteringParams, ComparisonOutcome};
use gis_core::entities::ClusteringComparison;
use gis_core::enums::{AuditAction, EntityType};
use gis_core::ids::PREFIX_CLUSTERING;

use crate::error::DatabaseError;
use crate::helpers::{parse_datetime, parse_enum, parse_json};
use crate::repos::project::ProjectFilter;
use crate::service::GisService;

const SELECT_COLS: &str = "id, total_projects, valid_projects, best_algorithm, metrics, created_at";

/// A comparison as run, plus the snapshot id when it was saved.
#[derive(Debug, Clone)]
pub struct ClusteringReport {
    /// All tracked projects, located or not.
    pub total_projects: usize,
    pub outcome: ComparisonOutcome,
    pub snapshot: Option<ClusteringComparison>,
}

fn to_count(value: i64, column: &str) -> Result<usize, DatabaseError> {
    usize::try_from(value).map_err(|e| DatabaseError::Query(format!("{column} {value}: {e}")))
}

fn row_to_comparison(row: &libsql::Row) -> Result<ClusteringComparison, DatabaseError> {
    Ok(ClusteringComparison {
        id: row.get(0)?,
        total_projects: to_count(row.get::<i64>(1)?, "total_projects")?,
        valid_projects: to_count(row.get::<i64>(2)?, "valid_projects")?,
        best_algorithm: parse_enum(&row.get::<String>(3)?)?,
        metrics: parse_json(&row.get::<String>(4)?)?,
        created_at: parse_datetime(&row.get::<String>(5)?)?,
    })
}

impl GisService {
    /// Cluster every project with valid coordinates and rank the algorithms.
    ///
    /// `Ok(None)` when fewer than two projects are located. With `save` the
    /// metrics are stored as a snapshot.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Analysis` for invalid parameters and
    /// `DatabaseError` when loading projects or saving fails.
    pub async fn run_clustering_comparison(
        &self,
        actor: &str,
        params: &ClusteringParams,
        save: bool,
    ) -> Result<Option<ClusteringReport>, DatabaseError> {
        let projects = self
            .list_projects(&ProjectFilter {
                with_coordinates: true,
                ..ProjectFilter::default()
            })
            .await?;
        let points = ClusterPoint::from_projects(&projects);

        let Some(outcome) = clustering::compare(&points, params)? else {
            tracing::info!(located = points.len(), "not enough located projects to cluster");
            return Ok(None);
        };

        let total_projects = self.count_all_projects().await?;
        let snapshot = if save {
            Some(
                self.save_clustering_comparison(actor, total_projects, &outcome)
                    .await?,
            )
        } else {
            None
        };
        Ok(Some(ClusteringReport {
            total_projects,
            outcome,
            snapshot,
        }))
    }

    async fn count_all_projects(&self) -> Result<usize, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query("SELECT COUNT(*) FROM projects", ())
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        to_count(row.get::<i64>(0)?, "project count")
    }

    async fn save_clustering_comparison(
        &self,
        actor: &str,
        total_projects: usize,
        outcome: &ComparisonOutcome,
    ) -> Result<ClusteringComparison, DatabaseError> {
        let id = self.db().generate_id(PREFIX_CLUSTERING).await?;
        let comparison = ClusteringComparison {
            id: id.clone(),
            total_projects,
            valid_projects: outcome.valid_projects,
            best_algorithm: outcome.best_algorithm,
            metrics: outcome.metrics(),
            created_at: Utc::now(),
        };
        let metrics = serde_json::to_string(&comparison.metrics)
            .map_err(|e| DatabaseError::Other(e.into()))?;
        let total = i64::try_from(comparison.total_projects)
            .map_err(|e| DatabaseError::Query(format!("total_projects: {e}")))?;
        let valid = i64::try_from(comparison.valid_projects)
            .map_err(|e| DatabaseError::Query(format!("valid_projects: {e}")))?;

        let tx = self.db().conn().transaction().await?;
        tx.execute(
            &format!(
                "INSERT INTO clustering_comparisons ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)"
            ),
            libsql::params![
                id.as_str(),
                total,
                valid,
                comparison.best_algorithm.as_str(),
                metrics,
                comparison.created_at.to_rfc3339()
            ],
        )
        .await?;

        let detail = serde_json::json!({
            "total_projects": comparison.total_projects,
            "valid_projects": comparison.valid_projects,
            "best_algorithm": comparison.best_algorithm,
        });
        self.record_audit(EntityType::Clustering, &id, AuditAction::Created, actor, Some(&detail))
            .await?;
        tx.commit().await?;

        Ok(comparison)
    }

    /// Stored snapshots, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_clustering_comparisons(
        &self,
        limit: u32,
    ) -> Result<Vec<ClusteringComparison>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM clustering_comparisons
                     ORDER BY created_at DESC, rowid DESC LIMIT {limit}"
                ),
                (),
            )
            .await?;
        let mut comparisons = Vec::new();
        while let Some(row) = rows.next().await? {
            comparisons.push(row_to_comparison(&row)?);
        }
        Ok(comparisons)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn latest_clustering_comparison(
        &self,
    ) -> Result<Option<ClusteringComparison>, DatabaseError> {
        Ok(self.list_clustering_comparisons(1).await?.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{ACTOR, new_project, test_service};
    use gis_core::enums::ClusteringAlgorithm;
    use pretty_assertions::assert_eq;

    async fn located(svc: &GisService, points: &[(&str, &str, f64, f64)]) {
        for (name, barangay, lat, lng) in points {
            svc.create_project(ACTOR, new_project(name, barangay, *lat, *lng))
                .await
                .unwrap();
        }
    }

    fn small_params() -> ClusteringParams {
        ClusteringParams {
            kmeans_k: 2,
            hierarchical_clusters: 2,
            dbscan_min_samples: 2,
            ..ClusteringParams::default()
        }
    }

    #[tokio::test]
    async fn fewer_than_two_located_projects_is_none() {
        let svc = test_service().await;
        located(&svc, &[("Covered Court", "Apokon", 7.45, 125.80)]).await;
        svc.create_project(ACTOR, new_project("Origin Road", "Apokon", 0.0, 0.0))
            .await
            .unwrap();

        let report = svc
            .run_clustering_comparison(ACTOR, &ClusteringParams::default(), true)
            .await
            .unwrap();
        assert!(report.is_none());
        assert!(svc.latest_clustering_comparison().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn saved_snapshot_round_trips() {
        let svc = test_service().await;
        located(
            &svc,
            &[
                ("Road A", "Apokon", 7.440, 125.800),
                ("Road B", "Apokon", 7.441, 125.801),
                ("Road C", "Apokon", 7.442, 125.799),
                ("Road D", "Bincungan", 7.530, 125.750),
                ("Road E", "Bincungan", 7.531, 125.751),
                ("Road F", "Bincungan", 7.529, 125.749),
            ],
        )
        .await;

        let report = svc
            .run_clustering_comparison(ACTOR, &small_params(), true)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(report.outcome.valid_projects, 6);
        assert_eq!(report.total_projects, 6);
        assert_eq!(report.outcome.runs.len(), ClusteringAlgorithm::ALL.len());

        let snapshot = report.snapshot.unwrap();
        assert!(snapshot.id.starts_with("clu-"));
        let latest = svc.latest_clustering_comparison().await.unwrap().unwrap();
        assert_eq!(latest.id, snapshot.id);
        assert_eq!(latest.best_algorithm, report.outcome.best_algorithm);
        assert_eq!(latest.metrics.len(), ClusteringAlgorithm::ALL.len());
        assert_eq!(latest.total_projects, 6);
        assert_eq!(latest.valid_projects, 6);
    }

    #[tokio::test]
    async fn snapshot_counts_unlocated_projects_separately() {
        let svc = test_service().await;
        located(
            &svc,
            &[
                ("Road A", "Apokon", 7.440, 125.800),
                ("Road B", "Apokon", 7.441, 125.801),
                ("Road C", "Bincungan", 7.530, 125.750),
                ("Road D", "Bincungan", 7.531, 125.751),
            ],
        )
        .await;
        svc.create_project(ACTOR, new_project("Origin Drainage", "Apokon", 0.0, 0.0))
            .await
            .unwrap();

        let report = svc
            .run_clustering_comparison(ACTOR, &small_params(), true)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(report.total_projects, 5);
        assert_eq!(report.outcome.valid_projects, 4);

        let latest = svc.latest_clustering_comparison().await.unwrap().unwrap();
        assert_eq!((latest.total_projects, latest.valid_projects), (5, 4));
    }

    #[tokio::test]
    async fn saved_snapshot_and_audit_row_land_together() {
        let svc = test_service().await;
        located(
            &svc,
            &[
                ("Road A", "Apokon", 7.440, 125.800),
                ("Road B", "Bincungan", 7.530, 125.750),
                ("Road C", "Bincungan", 7.531, 125.751),
            ],
        )
        .await;

        let snapshot = svc
            .run_clustering_comparison(ACTOR, &small_params(), true)
            .await
            .unwrap()
            .unwrap()
            .snapshot
            .unwrap();

        let mut rows = svc
            .db()
            .conn()
            .query(
                "SELECT COUNT(*) FROM audit_trail WHERE entity_type = 'clustering' AND entity_id = ?1",
                [snapshot.id.as_str()],
            )
            .await
            .unwrap();
        let row = rows.next().await.unwrap().unwrap();
        assert_eq!(row.get::<i64>(0).unwrap(), 1);
    }

    #[tokio::test]
    async fn unsaved_run_leaves_no_snapshot() {
        let svc = test_service().await;
        located(
            &svc,
            &[
                ("Road A", "Apokon", 7.440, 125.800),
                ("Road B", "Bincungan", 7.530, 125.750),
                ("Road C", "Bincungan", 7.531, 125.751),
            ],
        )
        .await;

        let report = svc
            .run_clustering_comparison(ACTOR, &small_params(), false)
            .await
            .unwrap()
            .unwrap();
        assert!(report.snapshot.is_none());
        assert!(svc.list_clustering_comparisons(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn invalid_params_are_rejected() {
        let svc = test_service().await;
        let params = ClusteringParams {
            kmeans_k: 0,
            ..ClusteringParams::default()
        };
        let result = svc.run_clustering_comparison(ACTOR, &params, false).await;
        assert!(matches!(result, Err(DatabaseError::Analysis(_))));
    }
}
