use anyhow::anyhow;
use gis_core::zone_code::ZoneType;
use gis_db::repos::project::ProjectFilter;
use serde_json::json;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ZoneCommands;
use crate::context::AppContext;
use crate::output::output;
use crate::progress::Progress;

/// Handle `gis zone`.
pub async fn handle(action: &ZoneCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        ZoneCommands::Create {
            zone_type,
            barangay,
            description,
            keyword,
        } => {
            let zone = ctx
                .service
                .create_zone(&ctx.actor, zone_type, barangay, description.as_deref(), keyword)
                .await?;
            output(&zone, flags.format)
        }
        ZoneCommands::Get { id } => output(&ctx.service.get_zone(id).await?, flags.format),
        ZoneCommands::List { barangay, all } => {
            let zones = match barangay {
                Some(barangay) => ctx.service.zones_for_barangay(barangay).await?,
                None => ctx.service.list_zones(*all).await?,
            };
            output(&zones, flags.format)
        }
        ZoneCommands::Retire { id } => {
            output(&ctx.service.set_zone_active(&ctx.actor, id, false).await?, flags.format)
        }
        ZoneCommands::Activate { id } => {
            output(&ctx.service.set_zone_active(&ctx.actor, id, true).await?, flags.format)
        }
        ZoneCommands::Stats => output(&ctx.service.zone_statistics().await?, flags.format),
        ZoneCommands::Normalize { code } => {
            let zone = ZoneType::parse(code).ok_or_else(|| anyhow!("unknown zone code '{code}'"))?;
            output(
                &json!({
                    "input": code,
                    "code": zone.code(),
                    "compact": zone.compact(),
                    "name": zone.display_name(),
                    "label": zone.display_label(),
                }),
                flags.format,
            )
        }
        ZoneCommands::Detect { barangay, apply, .. } => {
            let progress = Progress::spinner("detecting zones");
            let filter = ProjectFilter {
                barangay: barangay.clone(),
                ..ProjectFilter::default()
            };
            let run = match ctx.service.detect_project_zones(&ctx.actor, &filter, *apply).await {
                Ok(run) => run,
                Err(error) => {
                    progress.finish_err("zone detection failed");
                    return Err(error.into());
                }
            };
            progress.finish_clear();
            output(&run, flags.format)
        }
        ZoneCommands::Validate { project_id, zone } => {
            let project = ctx
                .service
                .validate_project_zone(&ctx.actor, project_id, zone.as_deref())
                .await?;
            output(&project, flags.format)
        }
    }
}
