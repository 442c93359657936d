//! Clustering comparison over project coordinates.
//!
//! Four strategies run over the same point set and are scored with the same
//! metrics; the best one is picked by zoning alignment, then silhouette, then
//! Davies–Bouldin (lower is better), then run order.

mod administrative;
mod dbscan;
mod hierarchical;
mod kmeans;
pub mod metrics;

use std::cmp::Ordering;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use gis_core::entities::{AlgorithmMetrics, Project};
use gis_core::enums::ClusteringAlgorithm;

use crate::error::AnalysisError;
use crate::geo::project_km;

pub use administrative::{UNASSIGNED as UNASSIGNED_BARANGAY, cluster_by_barangay};
pub use dbscan::dbscan;
pub use hierarchical::average_linkage;
pub use kmeans::kmeans;

/// Cluster label per point; `None` marks DBSCAN noise.
pub type Labels = Vec<Option<usize>>;

/// A project reduced to what clustering needs.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterPoint {
    pub project_id: String,
    pub lat: f64,
    pub lng: f64,
    /// Planar kilometres around the set's mean latitude.
    pub x: f64,
    pub y: f64,
    pub barangay: Option<String>,
    pub zone_type: Option<String>,
}

impl ClusterPoint {
    /// Build points from projects with valid coordinates; others are skipped.
    #[must_use]
    pub fn from_projects(projects: &[Project]) -> Vec<Self> {
        let located: Vec<(&Project, (f64, f64))> = projects
            .iter()
            .filter_map(|p| p.coordinates().map(|c| (p, c)))
            .collect();
        if located.is_empty() {
            return Vec::new();
        }

        #[allow(clippy::cast_precision_loss)]
        let mean_lat = located.iter().map(|(_, (lat, _))| lat).sum::<f64>() / located.len() as f64;

        located
            .into_iter()
            .map(|(p, (lat, lng))| {
                let (x, y) = project_km(lat, lng, mean_lat);
                Self {
                    project_id: p.id.clone(),
                    lat,
                    lng,
                    x,
                    y,
                    barangay: p.barangay.clone(),
                    zone_type: p.zone_type.clone(),
                }
            })
            .collect()
    }

    #[must_use]
    pub fn distance_km(&self, other: &Self) -> f64 {
        crate::geo::haversine_km(self.lat, self.lng, other.lat, other.lng)
    }
}

/// Tunables for the partitioning algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClusteringParams {
    pub kmeans_k: usize,
    pub kmeans_max_iterations: usize,
    pub dbscan_eps_km: f64,
    pub dbscan_min_samples: usize,
    pub hierarchical_clusters: usize,
}

impl Default for ClusteringParams {
    fn default() -> Self {
        Self {
            kmeans_k: 5,
            kmeans_max_iterations: 100,
            dbscan_eps_km: 1.0,
            dbscan_min_samples: 3,
            hierarchical_clusters: 5,
        }
    }
}

impl ClusteringParams {
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidParameter`] for zero counts or a
    /// non-positive radius.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        let positive = |name: &'static str, value: usize| {
            if value == 0 {
                Err(AnalysisError::InvalidParameter {
                    name,
                    reason: "must be greater than zero".into(),
                })
            } else {
                Ok(())
            }
        };
        positive("kmeans_k", self.kmeans_k)?;
        positive("kmeans_max_iterations", self.kmeans_max_iterations)?;
        positive("dbscan_min_samples", self.dbscan_min_samples)?;
        positive("hierarchical_clusters", self.hierarchical_clusters)?;
        if !(self.dbscan_eps_km.is_finite() && self.dbscan_eps_km > 0.0) {
            return Err(AnalysisError::InvalidParameter {
                name: "dbscan_eps_km",
                reason: format!("must be a positive distance, got {}", self.dbscan_eps_km),
            });
        }
        Ok(())
    }
}

/// One algorithm's labels and scores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusteringRun {
    pub algorithm: ClusteringAlgorithm,
    pub labels: Labels,
    pub metrics: AlgorithmMetrics,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonOutcome {
    /// Points that were clustered.
    pub valid_projects: usize,
    pub best_algorithm: ClusteringAlgorithm,
    pub runs: Vec<ClusteringRun>,
}

impl ComparisonOutcome {
    #[must_use]
    pub fn metrics(&self) -> Vec<AlgorithmMetrics> {
        self.runs.iter().map(|r| r.metrics.clone()).collect()
    }
}

/// Run every algorithm and rank them. `None` with fewer than two points.
///
/// # Errors
///
/// Returns [`AnalysisError::InvalidParameter`] when `params` fail validation.
pub fn compare(
    points: &[ClusterPoint],
    params: &ClusteringParams,
) -> Result<Option<ComparisonOutcome>, AnalysisError> {
    params.validate()?;
    if points.len() < 2 {
        return Ok(None);
    }

    let runs: Vec<ClusteringRun> = ClusteringAlgorithm::ALL
        .iter()
        .map(|&algorithm| run(algorithm, points, params))
        .collect();

    let best = runs
        .iter()
        .reduce(|best, candidate| {
            if rank(&candidate.metrics, &best.metrics) == Ordering::Greater {
                candidate
            } else {
                best
            }
        })
        .map_or(ClusteringAlgorithm::Administrative, |r| r.algorithm);

    tracing::info!(
        points = points.len(),
        best = %best,
        "clustering comparison finished"
    );

    Ok(Some(ComparisonOutcome {
        valid_projects: points.len(),
        best_algorithm: best,
        runs,
    }))
}

fn run(algorithm: ClusteringAlgorithm, points: &[ClusterPoint], params: &ClusteringParams) -> ClusteringRun {
    let started = Instant::now();
    let labels = match algorithm {
        ClusteringAlgorithm::Administrative => cluster_by_barangay(points),
        ClusteringAlgorithm::Kmeans => kmeans(points, params.kmeans_k, params.kmeans_max_iterations),
        ClusteringAlgorithm::Dbscan => dbscan(points, params.dbscan_eps_km, params.dbscan_min_samples),
        ClusteringAlgorithm::Hierarchical => average_linkage(points, params.hierarchical_clusters),
    };
    let elapsed = started.elapsed().as_secs_f64();

    let metrics = metrics::evaluate(algorithm, points, &labels, elapsed);
    tracing::debug!(
        algorithm = %algorithm,
        clusters = metrics.cluster_count,
        noise = metrics.noise_count,
        "clustering run scored"
    );
    ClusteringRun {
        algorithm,
        labels,
        metrics,
    }
}

/// `Greater` when `a` ranks above `b`. Equal metrics keep run order.
fn rank(a: &AlgorithmMetrics, b: &AlgorithmMetrics) -> Ordering {
    a.zoning_alignment_score
        .total_cmp(&b.zoning_alignment_score)
        .then_with(|| a.silhouette_score.total_cmp(&b.silhouette_score))
        .then_with(|| b.davies_bouldin_score.total_cmp(&a.davies_bouldin_score))
}

/// Renumber labels to `0..k` in order of first appearance.
fn compact_labels(raw: &[Option<usize>]) -> Labels {
    let mut mapping: Vec<(usize, usize)> = Vec::new();
    raw.iter()
        .map(|label| {
            label.map(|l| {
                if let Some(&(_, to)) = mapping.iter().find(|(from, _)| *from == l) {
                    to
                } else {
                    let to = mapping.len();
                    mapping.push((l, to));
                    to
                }
            })
        })
        .collect()
}


#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use gis_core::enums::ProjectStatus;
    use pretty_assertions::assert_eq;

    fn metrics(zas: f64, sil: f64, db: f64) -> AlgorithmMetrics {
        AlgorithmMetrics {
            algorithm: ClusteringAlgorithm::Kmeans,
            silhouette_score: sil,
            zoning_alignment_score: zas,
            calinski_harabasz_score: 0.0,
            davies_bouldin_score: db,
            execution_time_secs: 0.0,
            cluster_count: 2,
            noise_count: 0,
        }
    }

    #[test]
    fn rank_prefers_alignment_then_silhouette_then_lower_db() {
        assert_eq!(rank(&metrics(0.9, 0.1, 5.0), &metrics(0.8, 0.9, 0.1)), Ordering::Greater);
        assert_eq!(rank(&metrics(0.9, 0.5, 5.0), &metrics(0.9, 0.4, 0.1)), Ordering::Greater);
        assert_eq!(rank(&metrics(0.9, 0.5, 0.2), &metrics(0.9, 0.5, 0.3)), Ordering::Greater);
        assert_eq!(rank(&metrics(0.9, 0.5, 0.3), &metrics(0.9, 0.5, 0.3)), Ordering::Equal);
    }

    #[test]
    fn fewer_than_two_points_is_no_result() {
        let params = ClusteringParams::default();
        assert_eq!(compare(&[], &params).unwrap(), None);
        let one = vec![test_points::point("p", 7.44, 125.8, "Apokon", "R-1")];
        assert_eq!(compare(&one, &params).unwrap(), None);
    }

    #[test]
    fn compare_runs_all_algorithms_in_order() {
        let points = test_points::two_blobs();
        let params = ClusteringParams {
            kmeans_k: 2,
            hierarchical_clusters: 2,
            dbscan_eps_km: 1.0,
            dbscan_min_samples: 2,
            ..ClusteringParams::default()
        };
        let outcome = compare(&points, &params).unwrap().unwrap();
        let order: Vec<_> = outcome.runs.iter().map(|r| r.algorithm).collect();
        assert_eq!(order, ClusteringAlgorithm::ALL.to_vec());
        assert_eq!(outcome.valid_projects, 8);
        // Every algorithm recovers the two zoned groups perfectly, so the
        // administrative baseline wins on run order.
        for run in &outcome.runs {
            assert!((run.metrics.zoning_alignment_score - 1.0).abs() < 1e-9, "{:?}", run.algorithm);
            assert_eq!(run.metrics.cluster_count, 2);
        }
        assert_eq!(outcome.best_algorithm, ClusteringAlgorithm::Administrative);
    }

    #[test]
    fn invalid_params_are_rejected() {
        let params = ClusteringParams {
            dbscan_eps_km: 0.0,
            ..ClusteringParams::default()
        };
        assert!(matches!(
            compare(&test_points::two_blobs(), &params),
            Err(AnalysisError::InvalidParameter { name: "dbscan_eps_km", .. })
        ));
        let params = ClusteringParams {
            kmeans_k: 0,
            ..ClusteringParams::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn from_projects_skips_invalid_coordinates() {
        let make = |id: &str, lat: Option<f64>, lng: Option<f64>| Project {
            id: id.into(),
            prn: None,
            name: id.into(),
            description: None,
            barangay: None,
            latitude: lat,
            longitude: lng,
            project_cost: None,
            source_of_funds: None,
            status: ProjectStatus::Planned,
            start_date: None,
            end_date: None,
            progress: 0,
            project_type: None,
            engineers: vec![],
            zone_type: None,
            zone_validated: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let projects = vec![
            make("ok", Some(7.44), Some(125.80)),
            make("origin", Some(0.0), Some(0.0)),
            make("missing", None, Some(125.80)),
            make("bad", Some(7.44), Some(200.0)),
        ];
        let points = ClusterPoint::from_projects(&projects);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].project_id, "ok");
    }

    #[test]
    fn compact_labels_renumbers_by_first_appearance() {
        let raw = vec![Some(7), Some(3), None, Some(7), Some(9)];
        assert_eq!(compact_labels(&raw), vec![Some(0), Some(1), None, Some(0), Some(2)]);
    }
}
