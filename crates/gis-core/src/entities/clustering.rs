use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::ClusteringAlgorithm;

/// Quality metrics of one clustering run.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct AlgorithmMetrics {
    pub algorithm: ClusteringAlgorithm,
    pub silhouette_score: f64,
    /// Size-weighted share of each cluster's majority zone type, 0–1.
    pub zoning_alignment_score: f64,
    pub calinski_harabasz_score: f64,
    pub davies_bouldin_score: f64,
    pub execution_time_secs: f64,
    pub cluster_count: usize,
    pub noise_count: usize,
}

/// Snapshot of one clustering comparison run.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ClusteringComparison {
    pub id: String,
    /// Every project in the tracker when the snapshot was taken.
    pub total_projects: usize,
    /// Projects with usable coordinates, the ones actually clustered.
    pub valid_projects: usize,
    pub best_algorithm: ClusteringAlgorithm,
    pub metrics: Vec<AlgorithmMetrics>,
    pub created_at: DateTime<Utc>,
}
