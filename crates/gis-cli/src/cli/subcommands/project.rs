use clap::{Args, Subcommand, ValueEnum};

/// Project commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ProjectCommands {
    /// Create a project. The zone is detected unless --zone is given.
    Create {
        #[arg(long)]
        name: String,
        #[command(flatten)]
        fields: ProjectFieldArgs,
        /// Assigned engineer (repeatable).
        #[arg(long = "engineer")]
        engineers: Vec<String>,
    },
    /// Get a project by ID, or by PRN with --prn.
    Get {
        id: String,
        /// Treat the argument as a Project Reference Number.
        #[arg(long)]
        prn: bool,
        /// Print a role projection instead of the full record.
        #[arg(long)]
        role: Option<ProjectRole>,
    },
    /// List projects.
    List {
        #[arg(long)]
        barangay: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        zone: Option<String>,
        #[arg(long = "type")]
        project_type: Option<String>,
        #[arg(long)]
        engineer: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Update project fields.
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        fields: ProjectFieldArgs,
        /// Remove the zone type (and its validation).
        #[arg(long, conflicts_with = "zone")]
        clear_zone: bool,
    },
    /// Replace the engineers assigned to a project.
    Assign {
        id: String,
        #[arg(long = "engineer", required = true)]
        engineers: Vec<String>,
    },
    /// Dated progress reports.
    Progress {
        #[command(subcommand)]
        action: ProgressCommands,
    },
    /// Itemized cost entries.
    Cost {
        #[command(subcommand)]
        action: CostCommands,
    },
    /// Mark overdue in-progress projects below 98% as delayed.
    FlagDelayed {
        /// Reference date, YYYY-MM-DD. Defaults to today.
        #[arg(long)]
        as_of: Option<String>,
    },
}

#[derive(Clone, Debug, Subcommand)]
pub enum ProgressCommands {
    /// File a progress report; the project's progress follows the latest one.
    Add {
        id: String,
        /// Completion percentage, 0-100.
        #[arg(long)]
        percent: u8,
        /// YYYY-MM-DD, defaults to today.
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Reports for a project, newest first.
    List { id: String },
}

#[derive(Clone, Debug, Subcommand)]
pub enum CostCommands {
    /// Record an expense.
    Add {
        id: String,
        /// material, labor, equipment, other
        #[arg(long = "type")]
        cost_type: String,
        #[arg(long, allow_hyphen_values = true)]
        amount: f64,
        /// YYYY-MM-DD, defaults to today.
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Entries with totals per type and budget utilization.
    List { id: String },
}

/// Optional project fields shared by create and update.
#[derive(Clone, Debug, Default, Args)]
pub struct ProjectFieldArgs {
    /// Project Reference Number.
    #[arg(long)]
    pub prn: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub barangay: Option<String>,
    #[arg(long, requires = "lng", allow_hyphen_values = true)]
    pub lat: Option<f64>,
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lng: Option<f64>,
    #[arg(long)]
    pub cost: Option<f64>,
    #[arg(long)]
    pub funds: Option<String>,
    /// planned, in_progress, completed, delayed, cancelled
    #[arg(long)]
    pub status: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    pub start: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    pub end: Option<String>,
    /// Completion percentage, 0-100.
    #[arg(long)]
    pub progress: Option<u8>,
    /// Project type code (see `gis compat types`).
    #[arg(long = "type")]
    pub project_type: Option<String>,
    /// Zone code set by hand (R-1, C-2, INS-1, ...).
    #[arg(long)]
    pub zone: Option<String>,
}

/// Role projections of a project.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum ProjectRole {
    Engineer,
    Finance,
}
