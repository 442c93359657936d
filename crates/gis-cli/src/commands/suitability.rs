use anyhow::anyhow;
use gis_db::repos::suitability::{AnalysisOptions, AnalysisScope};
use serde_json::json;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::{AnalyzeArgs, SuitabilityCommands};
use crate::commands::shared::limit::effective_limit;
use crate::context::AppContext;
use crate::output::output;
use crate::progress::Progress;

/// Handle `gis suitability`.
pub async fn handle(
    action: &SuitabilityCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        SuitabilityCommands::Analyze(args) => analyze(args, ctx, flags).await,
        SuitabilityCommands::Get { project_id } => {
            let analysis = ctx
                .service
                .get_analysis(project_id)
                .await?
                .ok_or_else(|| {
                    anyhow!(
                        "no stored analysis for project '{project_id}' (run 'gis suitability analyze --project-id {project_id} --save')"
                    )
                })?;
            output(&analysis, flags.format)
        }
        SuitabilityCommands::List { limit } => {
            let limit = effective_limit(*limit, flags.limit, ctx.default_limit());
            output(&ctx.service.list_analyses(Some(limit)).await?, flags.format)
        }
    }
}

async fn analyze(args: &AnalyzeArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let options = AnalysisOptions {
        scope: scope(args),
        save: args.save,
        skip_existing: ctx.config.analysis.skip_existing && !args.force,
        city_center: ctx.config.analysis.city_center(),
    };

    let progress = Progress::spinner("analyzing land suitability");
    let run = match ctx.service.analyze_projects(&ctx.actor, &options).await {
        Ok(run) => run,
        Err(error) => {
            progress.finish_err("suitability analysis failed");
            return Err(error.into());
        }
    };
    progress.finish_ok(&format!(
        "{} analyzed, {} saved",
        run.summary.analyzed, run.summary.saved
    ));

    // A single project prints its full analysis; batches print the summary.
    if let AnalysisScope::Project(ref project_id) = options.scope {
        let analysis = run.results.into_iter().next().ok_or_else(|| {
            anyhow!("project '{project_id}' was not analyzed (no coordinates or already analyzed; use --force)")
        })?;
        return output(&json!({ "analysis": analysis, "saved": run.summary.saved > 0 }), flags.format);
    }

    output(&run.summary, flags.format)
}

fn scope(args: &AnalyzeArgs) -> AnalysisScope {
    match (&args.project_id, &args.barangay) {
        (Some(id), _) => AnalysisScope::Project(id.clone()),
        (None, Some(barangay)) => AnalysisScope::Barangay(barangay.clone()),
        (None, None) => AnalysisScope::All,
    }
}

#[cfg(test)]
mod tests {
    use gis_db::repos::suitability::AnalysisScope;

    use super::scope;
    use crate::cli::subcommands::AnalyzeArgs;

    fn args(project_id: Option<&str>, barangay: Option<&str>) -> AnalyzeArgs {
        AnalyzeArgs {
            project_id: project_id.map(str::to_string),
            barangay: barangay.map(str::to_string),
            all: project_id.is_none() && barangay.is_none(),
            save: false,
            force: false,
        }
    }

    #[test]
    fn scope_follows_selected_flag() {
        assert_eq!(scope(&args(Some("prj-1"), None)), AnalysisScope::Project("prj-1".into()));
        assert_eq!(scope(&args(None, Some("Apokon"))), AnalysisScope::Barangay("Apokon".into()));
        assert_eq!(scope(&args(None, None)), AnalysisScope::All);
    }
}
