use gis_core::enums::ProjectStatus;
use gis_db::repos::project::NewProject;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ProjectFieldArgs;
use crate::commands::shared::parse::{parse_enum, parse_optional_date};
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    name: &str,
    fields: &ProjectFieldArgs,
    engineers: &[String],
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let new = NewProject {
        prn: fields.prn.clone(),
        name: name.to_string(),
        description: fields.description.clone(),
        barangay: fields.barangay.clone(),
        latitude: fields.lat,
        longitude: fields.lng,
        project_cost: fields.cost,
        source_of_funds: fields.funds.clone(),
        status: fields
            .status
            .as_deref()
            .map(|value| parse_enum::<ProjectStatus>(value, "status"))
            .transpose()?,
        start_date: parse_optional_date(fields.start.as_deref(), "start date")?,
        end_date: parse_optional_date(fields.end.as_deref(), "end date")?,
        progress: fields.progress.unwrap_or(0),
        project_type: fields.project_type.clone(),
        engineers: engineers.to_vec(),
        zone_type: fields.zone.clone(),
    };

    let project = ctx.service.create_project(&ctx.actor, new).await?;
    output(&project, flags.format)
}
