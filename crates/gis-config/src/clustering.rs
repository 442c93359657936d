//! Clustering comparison configuration.

use serde::{Deserialize, Serialize};

const fn default_kmeans_k() -> usize {
    5
}

const fn default_kmeans_max_iterations() -> usize {
    100
}

const fn default_dbscan_eps_km() -> f64 {
    1.0
}

const fn default_dbscan_min_samples() -> usize {
    3
}

const fn default_hierarchical_clusters() -> usize {
    5
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClusteringConfig {
    #[serde(default = "default_kmeans_k")]
    pub kmeans_k: usize,

    #[serde(default = "default_kmeans_max_iterations")]
    pub kmeans_max_iterations: usize,

    /// DBSCAN neighbourhood radius in kilometres.
    #[serde(default = "default_dbscan_eps_km")]
    pub dbscan_eps_km: f64,

    #[serde(default = "default_dbscan_min_samples")]
    pub dbscan_min_samples: usize,

    #[serde(default = "default_hierarchical_clusters")]
    pub hierarchical_clusters: usize,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            kmeans_k: default_kmeans_k(),
            kmeans_max_iterations: default_kmeans_max_iterations(),
            dbscan_eps_km: default_dbscan_eps_km(),
            dbscan_min_samples: default_dbscan_min_samples(),
            hierarchical_clusters: default_hierarchical_clusters(),
        }
    }
}
