use clap::{ArgGroup, Args, Subcommand};

/// Land suitability commands.
#[derive(Clone, Debug, Subcommand)]
pub enum SuitabilityCommands {
    /// Score projects and optionally store the results.
    Analyze(AnalyzeArgs),
    /// Stored analysis of one project.
    Get { project_id: String },
    /// Stored analyses, best first.
    List {
        #[arg(long)]
        limit: Option<u32>,
    },
}

#[derive(Clone, Debug, Args)]
#[command(group(
    ArgGroup::new("scope")
        .required(true)
        .args(["project_id", "barangay", "all"])
))]
pub struct AnalyzeArgs {
    /// Analyze one project.
    #[arg(long)]
    pub project_id: Option<String>,
    /// Analyze the projects of one barangay.
    #[arg(long)]
    pub barangay: Option<String>,
    /// Analyze every project.
    #[arg(long)]
    pub all: bool,
    /// Store the results.
    #[arg(long)]
    pub save: bool,
    /// Re-analyze projects that already have a stored analysis.
    #[arg(long)]
    pub force: bool,
}
