//! # gis-config
//!
//! Layered configuration loading for the project tracker using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`GIS_*` prefix, `__` as separator)
//! 2. Project-level `.gis/config.toml`
//! 3. User-level `~/.config/gis/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `GIS_DATABASE__PATH` -> `database.path`,
//! `GIS_CLUSTERING__KMEANS_K` -> `clustering.kmeans_k`, etc.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use gis_config::GisConfig;
//!
//! let config = GisConfig::load_with_dotenv().expect("config");
//! println!("database: {}", config.database.path);
//! ```

mod analysis;
mod clustering;
mod database;
mod error;
mod general;

pub use analysis::AnalysisConfig;
pub use clustering::ClusteringConfig;
pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the per-project state directory.
pub const PROJECT_DIR: &str = ".gis";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GisConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub clustering: ClusteringConfig,
}

impl GisConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] when a source fails to parse and
    /// [`ConfigError::InvalidValue`] when a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new("."))
    }

    /// Load with `project_root` as the base for `.gis/config.toml`.
    ///
    /// # Errors
    ///
    /// See [`Self::load`].
    pub fn load_from(project_root: &Path) -> Result<Self, ConfigError> {
        let config: Self = Self::figment_for(project_root).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// See [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Build the figment provider chain rooted at the current directory.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        Self::figment_for(Path::new("."))
    }

    fn figment_for(project_root: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        // Layer 2: Project-local config
        let local_path = project_root.join(PROJECT_DIR).join("config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("GIS_").split("__"))
    }

    /// Reject values the analysis code cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.general.default_limit == 0 {
            return Err(ConfigError::invalid("general.default_limit", "must be greater than zero"));
        }
        if self.database.path.trim().is_empty() {
            return Err(ConfigError::invalid("database.path", "must not be empty"));
        }
        if !(-90.0..=90.0).contains(&self.analysis.city_center_lat) {
            return Err(ConfigError::invalid(
                "analysis.city_center_lat",
                format!("{} is not a latitude", self.analysis.city_center_lat),
            ));
        }
        if !(-180.0..=180.0).contains(&self.analysis.city_center_lng) {
            return Err(ConfigError::invalid(
                "analysis.city_center_lng",
                format!("{} is not a longitude", self.analysis.city_center_lng),
            ));
        }

        let counts = [
            ("clustering.kmeans_k", self.clustering.kmeans_k),
            ("clustering.kmeans_max_iterations", self.clustering.kmeans_max_iterations),
            ("clustering.dbscan_min_samples", self.clustering.dbscan_min_samples),
            ("clustering.hierarchical_clusters", self.clustering.hierarchical_clusters),
        ];
        if let Some((field, _)) = counts.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::invalid(field, "must be greater than zero"));
        }
        if !(self.clustering.dbscan_eps_km.is_finite() && self.clustering.dbscan_eps_km > 0.0) {
            return Err(ConfigError::invalid(
                "clustering.dbscan_eps_km",
                "must be a positive distance in kilometres",
            ));
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("gis").join("config.toml"))
    }

    /// Load `.env` from the workspace root.
    ///
    /// Walks up from `CARGO_MANIFEST_DIR` (if available) looking for a `.env`
    /// file, then falls back to the current directory. Silently does nothing
    /// if no `.env` is found.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            // crate -> crates/ -> workspace root
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        let _ = dotenvy::dotenv();
    }
}
