use gis_core::enums::ProjectStatus;
use gis_db::updates::project::{ProjectUpdate, ProjectUpdateBuilder};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ProjectFieldArgs;
use crate::commands::shared::parse::{parse_date, parse_enum};
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    id: &str,
    name: Option<&str>,
    fields: &ProjectFieldArgs,
    clear_zone: bool,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let update = build_update(name, fields, clear_zone)?;
    if update.is_empty() {
        anyhow::bail!("nothing to update: pass at least one field");
    }
    let project = ctx.service.update_project(&ctx.actor, id, update).await?;
    output(&project, flags.format)
}

fn build_update(
    name: Option<&str>,
    fields: &ProjectFieldArgs,
    clear_zone: bool,
) -> anyhow::Result<ProjectUpdate> {
    let mut builder = ProjectUpdateBuilder::new();
    if let Some(name) = name {
        builder = builder.name(name);
    }
    if let Some(prn) = &fields.prn {
        builder = builder.prn(Some(prn.clone()));
    }
    if let Some(description) = &fields.description {
        builder = builder.description(Some(description.clone()));
    }
    if let Some(barangay) = &fields.barangay {
        builder = builder.barangay(Some(barangay.clone()));
    }
    if let (Some(lat), Some(lng)) = (fields.lat, fields.lng) {
        builder = builder.location(Some(lat), Some(lng));
    }
    if let Some(cost) = fields.cost {
        builder = builder.project_cost(Some(cost));
    }
    if let Some(funds) = &fields.funds {
        builder = builder.source_of_funds(Some(funds.clone()));
    }
    if let Some(status) = &fields.status {
        builder = builder.status(parse_enum::<ProjectStatus>(status, "status")?);
    }
    if let Some(start) = &fields.start {
        builder = builder.start_date(Some(parse_date(start, "start date")?));
    }
    if let Some(end) = &fields.end {
        builder = builder.end_date(Some(parse_date(end, "end date")?));
    }
    if let Some(progress) = fields.progress {
        builder = builder.progress(progress);
    }
    if let Some(project_type) = &fields.project_type {
        builder = builder.project_type(Some(project_type.clone()));
    }
    if clear_zone {
        builder = builder.zone_type(None);
    } else if let Some(zone) = &fields.zone {
        builder = builder.zone_type(Some(zone.clone()));
    }
    Ok(builder.build())
}
