use gis_core::enums::BudgetRequestStatus;
use gis_db::repos::budget::BudgetRequestFilter;
use serde_json::json;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::BudgetCommands;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

/// Handle `gis budget`.
pub async fn handle(
    action: &BudgetCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        BudgetCommands::Request {
            project_id,
            amount,
            reason,
        } => {
            let request = ctx
                .service
                .create_budget_request(project_id, &ctx.actor, *amount, reason)
                .await?;
            output(&request, flags.format)
        }
        BudgetCommands::Get { id } => {
            let request = ctx.service.get_budget_request(id).await?;
            let history = ctx.service.budget_request_history(id).await?;
            output(&json!({ "request": request, "history": history }), flags.format)
        }
        BudgetCommands::List {
            status,
            project_id,
            limit,
        } => {
            let filter = BudgetRequestFilter {
                project_id: project_id.clone(),
                status: status
                    .as_deref()
                    .map(|value| parse_enum::<BudgetRequestStatus>(value, "status"))
                    .transpose()?,
                limit: Some(effective_limit(*limit, flags.limit, ctx.default_limit())),
            };
            output(&ctx.service.list_budget_requests(&filter).await?, flags.format)
        }
        BudgetCommands::Approve { id, amount, notes } => {
            let decision = ctx
                .service
                .approve_budget_request(id, &ctx.actor, *amount, notes.as_deref())
                .await?;
            output(&decision, flags.format)
        }
        BudgetCommands::Reject { id, notes } => {
            let decision = ctx
                .service
                .reject_budget_request(id, &ctx.actor, notes.as_deref())
                .await?;
            output(&decision, flags.format)
        }
    }
}
