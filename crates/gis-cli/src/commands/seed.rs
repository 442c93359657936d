use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

/// Handle `gis seed`.
pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let summary = ctx.service.seed_reference_data().await?;
    output(&summary, flags.format)
}
