use std::path::Path;

use anyhow::Context;
use gis_config::{GisConfig, PROJECT_DIR};
use gis_db::service::GisService;
use serde_json::json;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::InitArgs;
use crate::output::output;

const CONFIG_TEMPLATE: &str = r#"# Project tracker configuration. Environment variables (GIS_SECTION__KEY) win.

[general]
# default_limit = 20
# default_actor = "records-office"

[database]
# path = ".gis/gis.db"

[analysis]
# city_center_lat = 7.4478
# city_center_lng = 125.8078
# skip_existing = true

[clustering]
# kmeans_k = 5
# dbscan_eps_km = 1.0
# dbscan_min_samples = 3
# hierarchical_clusters = 5
"#;

/// Handle `gis init`: create `.gis/`, a commented config, and the migrated
/// database. Safe to rerun.
pub async fn handle(
    args: &InitArgs,
    project_root: &Path,
    config: &GisConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let state_dir = project_root.join(PROJECT_DIR);
    std::fs::create_dir_all(&state_dir)
        .with_context(|| format!("failed to create {}", state_dir.display()))?;

    let config_path = state_dir.join("config.toml");
    let wrote_config = if config_path.exists() {
        false
    } else {
        std::fs::write(&config_path, CONFIG_TEMPLATE)
            .with_context(|| format!("failed to write {}", config_path.display()))?;
        true
    };

    let db_path = config.database.resolve(project_root);
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let service = GisService::open_local(&db_path.to_string_lossy())
        .await
        .with_context(|| format!("failed to open database at {}", db_path.display()))?;
    tracing::info!(path = %db_path.display(), "database initialized");

    let seeded = if args.seed {
        Some(service.seed_reference_data().await?)
    } else {
        None
    };

    output(
        &json!({
            "project_root": project_root.display().to_string(),
            "database": db_path.display().to_string(),
            "config_created": wrote_config,
            "seed": seeded,
        }),
        flags.format,
    )
}
