use clap::Subcommand;

/// Aggregate report commands.
#[derive(Clone, Debug, Subcommand)]
pub enum AnalyticsCommands {
    /// Project counts by status and total cost per zone type.
    Zones,
    /// Project count and suitability distribution per barangay.
    Barangays,
}
