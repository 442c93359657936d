use gis_core::entities::{ProjectType, ZoneAllowedUse};
use gis_core::enums::UseClass;
use gis_core::zone_code::normalize_zone_code;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::CompatCommands;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

/// Handle `gis compat`.
pub async fn handle(
    action: &CompatCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        CompatCommands::Validate { project_type, zone } => {
            let engine = ctx.service.load_reference().await?.compatibility();
            output(&engine.validate(project_type, zone)?, flags.format)
        }
        CompatCommands::Recommend { project_type, limit } => {
            let limit = effective_limit(*limit, flags.limit, ctx.default_limit());
            let engine = ctx.service.load_reference().await?.compatibility();
            let set = engine.recommend(project_type, usize::try_from(limit)?)?;
            output(&set, flags.format)
        }
        CompatCommands::Allowed { project_type } => {
            let engine = ctx.service.load_reference().await?.compatibility();
            output(&engine.allowed_zones(project_type)?, flags.format)
        }
        CompatCommands::Types => output(&ctx.service.list_project_types().await?, flags.format),
        CompatCommands::AddType {
            code,
            name,
            description,
        } => {
            let project_type = ProjectType {
                code: code.trim().to_string(),
                name: name.trim().to_string(),
                description: description.clone(),
            };
            if project_type.code.is_empty() || project_type.name.is_empty() {
                anyhow::bail!("project type code and name must not be empty");
            }
            ctx.service.upsert_project_type(&project_type).await?;
            output(&project_type, flags.format)
        }
        CompatCommands::SetRule {
            project_type,
            zone,
            use_class,
        } => {
            let zone_type = normalize_zone_code(zone)
                .ok_or_else(|| anyhow::anyhow!("unknown zone code '{zone}'"))?;
            let rule = ZoneAllowedUse {
                project_type: project_type.clone(),
                zone_type: zone_type.to_string(),
                use_class: parse_enum::<UseClass>(use_class, "use class")?,
            };
            ctx.service.set_allowed_use(&rule).await?;
            output(&rule, flags.format)
        }
        CompatCommands::Rules => output(&ctx.service.list_allowed_uses().await?, flags.format),
    }
}
