use clap::{ArgGroup, Subcommand};

/// Zone registry and detection commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ZoneCommands {
    /// Register a zone.
    Create {
        /// Zone code in any written form (R-1, r1, "Low Density Residential (R-1)").
        zone_type: String,
        #[arg(long)]
        barangay: String,
        #[arg(long)]
        description: Option<String>,
        /// Detection keyword (repeatable).
        #[arg(long)]
        keyword: Vec<String>,
    },
    /// Get a zone by ID.
    Get { id: String },
    /// List zones in registry order.
    List {
        /// Only zones of this barangay, ordered by zone type.
        #[arg(long)]
        barangay: Option<String>,
        /// Include retired zones.
        #[arg(long, conflicts_with = "barangay")]
        all: bool,
    },
    /// Retire a zone; it stays in the registry but is ignored.
    Retire { id: String },
    /// Reactivate a retired zone.
    Activate { id: String },
    /// Zone totals by type and barangay.
    Stats,
    /// Canonical code and display label of a zone code.
    Normalize { code: String },
    /// Run zone detection over stored projects.
    #[command(group(ArgGroup::new("scope").required(true).args(["barangay", "all"])))]
    Detect {
        /// Only projects of this barangay.
        #[arg(long)]
        barangay: Option<String>,
        /// Every project.
        #[arg(long)]
        all: bool,
        /// Write detections back to projects.
        #[arg(long)]
        apply: bool,
    },
    /// Confirm a project's zone so detection no longer changes it.
    Validate {
        project_id: String,
        /// Replace the zone before confirming.
        #[arg(long)]
        zone: Option<String>,
    },
}
