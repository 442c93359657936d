use gis_analysis::clustering::ClusteringParams;
use gis_config::ClusteringConfig;
use serde_json::json;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ClusterCommands;
use crate::commands::shared::limit::effective_limit;
use crate::context::AppContext;
use crate::output::output;
use crate::progress::Progress;

/// Handle `gis cluster`.
pub async fn handle(
    action: &ClusterCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        ClusterCommands::Compare {
            save,
            k,
            eps_km,
            min_samples,
            clusters,
            labels,
        } => {
            let mut params = params_from_config(&ctx.config.clustering);
            if let Some(k) = k {
                params.kmeans_k = *k;
            }
            if let Some(eps_km) = eps_km {
                params.dbscan_eps_km = *eps_km;
            }
            if let Some(min_samples) = min_samples {
                params.dbscan_min_samples = *min_samples;
            }
            if let Some(clusters) = clusters {
                params.hierarchical_clusters = *clusters;
            }

            let progress = Progress::spinner("comparing clustering algorithms");
            let report = match ctx
                .service
                .run_clustering_comparison(&ctx.actor, &params, *save)
                .await
            {
                Ok(report) => report,
                Err(error) => {
                    progress.finish_err("clustering comparison failed");
                    return Err(error.into());
                }
            };
            progress.finish_clear();

            let Some(report) = report else {
                return output(
                    &json!({
                        "message": "at least two projects with coordinates are needed to cluster",
                    }),
                    flags.format,
                );
            };

            let runs = report
                .outcome
                .runs
                .iter()
                .map(|run| {
                    if *labels {
                        json!({ "metrics": run.metrics, "labels": run.labels })
                    } else {
                        json!(run.metrics)
                    }
                })
                .collect::<Vec<_>>();

            output(
                &json!({
                    "total_projects": report.total_projects,
                    "valid_projects": report.outcome.valid_projects,
                    "best_algorithm": report.outcome.best_algorithm,
                    "snapshot_id": report.snapshot.map(|snapshot| snapshot.id),
                    "params": params,
                    "runs": runs,
                }),
                flags.format,
            )
        }
        ClusterCommands::History { limit } => {
            let limit = effective_limit(*limit, flags.limit, ctx.default_limit());
            output(
                &ctx.service.list_clustering_comparisons(limit).await?,
                flags.format,
            )
        }
        ClusterCommands::Latest => match ctx.service.latest_clustering_comparison().await? {
            Some(snapshot) => output(&snapshot, flags.format),
            None => anyhow::bail!("no clustering snapshot saved yet (run 'gis cluster compare --save')"),
        },
    }
}

const fn params_from_config(config: &ClusteringConfig) -> ClusteringParams {
    ClusteringParams {
        kmeans_k: config.kmeans_k,
        kmeans_max_iterations: config.kmeans_max_iterations,
        dbscan_eps_km: config.dbscan_eps_km,
        dbscan_min_samples: config.dbscan_min_samples,
        hierarchical_clusters: config.hierarchical_clusters,
    }
}
