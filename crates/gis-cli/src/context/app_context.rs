use std::path::PathBuf;

use anyhow::Context;
use gis_config::GisConfig;
use gis_db::service::GisService;

use crate::cli::GlobalFlags;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: GisService,
    pub config: GisConfig,
    pub project_root: PathBuf,
    /// Name written to the audit trail for every mutation in this run.
    pub actor: String,
}

impl AppContext {
    /// Open the project database (running migrations) and resolve the actor.
    pub async fn init(
        project_root: PathBuf,
        config: GisConfig,
        flags: &GlobalFlags,
    ) -> anyhow::Result<Self> {
        let db_path = config.database.resolve(&project_root);
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        let service = GisService::open_local(&db_path.to_string_lossy())
            .await
            .with_context(|| format!("failed to open database at {}", db_path.display()))?;
        tracing::debug!(path = %db_path.display(), "database opened");

        let actor = resolve_actor(flags.actor.as_deref(), &config);

        Ok(Self {
            service,
            config,
            project_root,
            actor,
        })
    }

    /// Configured default limit for list commands.
    #[must_use]
    pub const fn default_limit(&self) -> u32 {
        self.config.general.default_limit
    }
}

fn resolve_actor(flag: Option<&str>, config: &GisConfig) -> String {
    flag.map(str::trim)
        .filter(|actor| !actor.is_empty())
        .map_or_else(|| config.general.actor().to_string(), str::to_string)
}

#[cfg(test)]
mod tests {
    use gis_config::GisConfig;

    use super::resolve_actor;

    #[test]
    fn flag_overrides_configured_actor() {
        let mut config = GisConfig::default();
        config.general.default_actor = "records-office".into();
        assert_eq!(resolve_actor(Some("planner"), &config), "planner");
        assert_eq!(resolve_actor(None, &config), "records-office");
    }

    #[test]
    fn blank_flag_falls_back() {
        let config = GisConfig::default();
        assert_eq!(resolve_actor(Some("  "), &config), config.general.actor());
    }
}
