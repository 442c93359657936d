use std::path::Path;

use anyhow::Context;

use gis_config::GisConfig;

/// Load `.env` from the project root, then the layered configuration.
pub fn load_config(project_root: &Path) -> anyhow::Result<GisConfig> {
    load_project_dotenv(project_root)?;
    GisConfig::load_from(project_root).context("failed to load gis configuration")
}

fn load_project_dotenv(project_root: &Path) -> anyhow::Result<()> {
    let env_path = project_root.join(".env");
    if env_path.exists() {
        dotenvy::from_path(&env_path)
            .with_context(|| format!("failed to load dotenv file at {}", env_path.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::load_config;

    #[test]
    fn loads_defaults_without_project_files() {
        let temp = TempDir::new().expect("tempdir should create");
        let config = load_config(temp.path()).expect("defaults should load");
        assert_eq!(config.database.path, ".gis/gis.db");
    }

    #[test]
    fn project_config_file_is_read() {
        let temp = TempDir::new().expect("tempdir should create");
        std::fs::create_dir(temp.path().join(".gis")).expect(".gis should create");
        std::fs::write(
            temp.path().join(".gis/config.toml"),
            "[general]\ndefault_limit = 7\n",
        )
        .expect("config should write");

        let config = load_config(temp.path()).expect("config should load");
        assert_eq!(config.general.default_limit, 7);
    }
}
