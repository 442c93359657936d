use anyhow::anyhow;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ProjectRole;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    id: &str,
    by_prn: bool,
    role: Option<ProjectRole>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let project_id = if by_prn {
        ctx.service
            .get_project_by_prn(id)
            .await?
            .map(|project| project.id)
            .ok_or_else(|| anyhow!("no project with PRN '{id}'"))?
    } else {
        id.to_string()
    };

    match role {
        None => output(&ctx.service.get_project(&project_id).await?, flags.format),
        Some(ProjectRole::Engineer) => {
            output(&ctx.service.engineer_view(&project_id).await?, flags.format)
        }
        Some(ProjectRole::Finance) => {
            output(&ctx.service.finance_view(&project_id).await?, flags.format)
        }
    }
}
