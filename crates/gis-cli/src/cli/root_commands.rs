use clap::{Args, Subcommand};

use crate::cli::subcommands::{
    AnalyticsCommands, BudgetCommands, ClusterCommands, CompatCommands, ProjectCommands,
    SuitabilityCommands, ZoneCommands,
};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Create the .gis directory and database for a project root.
    Init(InitArgs),
    /// Load the bundled reference data (project types, rules, profiles, zones).
    Seed,
    /// Infrastructure projects.
    Project {
        #[command(subcommand)]
        action: ProjectCommands,
    },
    /// Zone registry and zone detection.
    Zone {
        #[command(subcommand)]
        action: ZoneCommands,
    },
    /// Land suitability analysis.
    Suitability {
        #[command(subcommand)]
        action: SuitabilityCommands,
    },
    /// Project type vs zone compatibility.
    Compat {
        #[command(subcommand)]
        action: CompatCommands,
    },
    /// Spatial clustering comparison.
    Cluster {
        #[command(subcommand)]
        action: ClusterCommands,
    },
    /// Budget increase requests.
    Budget {
        #[command(subcommand)]
        action: BudgetCommands,
    },
    /// Aggregate reports.
    Analytics {
        #[command(subcommand)]
        action: AnalyticsCommands,
    },
    /// View audit trail.
    Audit(AuditArgs),
}

/// Arguments for `gis init`.
#[derive(Clone, Debug, Args)]
pub struct InitArgs {
    /// Also load the bundled reference data.
    #[arg(long)]
    pub seed: bool,
}

/// Arguments for `gis audit`.
#[derive(Clone, Debug, Args)]
pub struct AuditArgs {
    #[arg(long)]
    pub entity_type: Option<String>,
    #[arg(long)]
    pub entity_id: Option<String>,
    #[arg(long)]
    pub action: Option<String>,
    /// Only entries recorded by this actor.
    #[arg(long = "by")]
    pub by: Option<String>,
}
