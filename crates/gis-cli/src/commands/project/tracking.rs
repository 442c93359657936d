use chrono::{Local, NaiveDate};
use gis_core::enums::CostType;
use gis_db::repos::progress::{NewCostEntry, NewProgressUpdate};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::{CostCommands, ProgressCommands};
use crate::commands::shared::parse::{parse_enum, parse_optional_date};
use crate::context::AppContext;
use crate::output::output;
use crate::progress::Progress;

fn date_or_today(raw: Option<&str>, field: &str) -> anyhow::Result<NaiveDate> {
    Ok(parse_optional_date(raw, field)?.unwrap_or_else(|| Local::now().date_naive()))
}

pub async fn progress(
    action: &ProgressCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        ProgressCommands::Add {
            id,
            percent,
            date,
            description,
        } => {
            let new = NewProgressUpdate {
                date: date_or_today(date.as_deref(), "date")?,
                percentage_complete: *percent,
                description: description.clone(),
            };
            let update = ctx.service.add_progress_update(&ctx.actor, id, new).await?;
            output(&update, flags.format)
        }
        ProgressCommands::List { id } => {
            output(&ctx.service.list_progress_updates(id).await?, flags.format)
        }
    }
}

pub async fn cost(action: &CostCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        CostCommands::Add {
            id,
            cost_type,
            amount,
            date,
            description,
        } => {
            let new = NewCostEntry {
                date: date_or_today(date.as_deref(), "date")?,
                cost_type: parse_enum::<CostType>(cost_type, "cost type")?,
                description: description.clone(),
                amount: *amount,
            };
            let entry = ctx.service.add_cost_entry(&ctx.actor, id, new).await?;
            output(&entry, flags.format)
        }
        CostCommands::List { id } => {
            output(&ctx.service.project_cost_report(id).await?, flags.format)
        }
    }
}

pub async fn flag_delayed(
    as_of: Option<&str>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let today = date_or_today(as_of, "as-of")?;
    let spinner = Progress::spinner("checking overdue projects");
    match ctx.service.flag_delayed_projects(&ctx.actor, today).await {
        Ok(summary) => {
            spinner.finish_ok(&format!("flagged {} project(s) as delayed", summary.flagged));
            output(&summary, flags.format)
        }
        Err(error) => {
            spinner.finish_err("delayed-project sweep failed");
            Err(error.into())
        }
    }
}
