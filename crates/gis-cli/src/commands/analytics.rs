use crate::cli::GlobalFlags;
use crate::cli::subcommands::AnalyticsCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `gis analytics`.
pub async fn handle(
    action: &AnalyticsCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        AnalyticsCommands::Zones => output(&ctx.service.zone_analytics().await?, flags.format),
        AnalyticsCommands::Barangays => {
            output(&ctx.service.barangay_analytics().await?, flags.format)
        }
    }
}
