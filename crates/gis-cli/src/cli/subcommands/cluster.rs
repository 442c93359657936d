use clap::Subcommand;

/// Clustering comparison commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ClusterCommands {
    /// Run every algorithm over located projects and rank them.
    Compare {
        /// Store the metrics as a snapshot.
        #[arg(long)]
        save: bool,
        /// K-means cluster count.
        #[arg(long)]
        k: Option<usize>,
        /// DBSCAN radius in kilometres.
        #[arg(long)]
        eps_km: Option<f64>,
        #[arg(long)]
        min_samples: Option<usize>,
        /// Hierarchical target cluster count.
        #[arg(long)]
        clusters: Option<usize>,
        /// Include per-project labels in the output.
        #[arg(long)]
        labels: bool,
    },
    /// Stored comparison snapshots, newest first.
    History {
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Most recent stored snapshot.
    Latest,
}
