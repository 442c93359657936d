#[path = "project/create.rs"]
mod create;
#[path = "project/get.rs"]
mod get;
#[path = "project/list.rs"]
mod list;
#[path = "project/tracking.rs"]
mod tracking;
#[path = "project/update.rs"]
mod update;

use serde_json::json;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ProjectCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `gis project`.
pub async fn handle(
    action: &ProjectCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        ProjectCommands::Create {
            name,
            fields,
            engineers,
        } => create::run(name, fields, engineers, ctx, flags).await,
        ProjectCommands::Get { id, prn, role } => get::run(id, *prn, *role, ctx, flags).await,
        ProjectCommands::List {
            barangay,
            status,
            zone,
            project_type,
            engineer,
            limit,
        } => {
            let filters = list::ListFilters {
                barangay: barangay.as_deref(),
                status: status.as_deref(),
                zone: zone.as_deref(),
                project_type: project_type.as_deref(),
                engineer: engineer.as_deref(),
                limit: *limit,
            };
            list::run(&filters, ctx, flags).await
        }
        ProjectCommands::Update {
            id,
            name,
            fields,
            clear_zone,
        } => update::run(id, name.as_deref(), fields, *clear_zone, ctx, flags).await,
        ProjectCommands::Assign { id, engineers } => {
            let project = ctx
                .service
                .set_project_engineers(&ctx.actor, id, engineers)
                .await?;
            output(
                &json!({ "project_id": project.id, "engineers": project.engineers }),
                flags.format,
            )
        }
        ProjectCommands::Progress { action } => tracking::progress(action, ctx, flags).await,
        ProjectCommands::Cost { action } => tracking::cost(action, ctx, flags).await,
        ProjectCommands::FlagDelayed { as_of } => {
            tracking::flag_delayed(as_of.as_deref(), ctx, flags).await
        }
    }
}
