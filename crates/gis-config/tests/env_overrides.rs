//! Environment variables override TOML and defaults.

use figment::Jail;
use gis_config::GisConfig;
use pretty_assertions::assert_eq;

#[test]
fn env_sets_nested_values() {
    Jail::expect_with(|jail| {
        jail.set_env("GIS_DATABASE__PATH", "/tmp/override.db");
        jail.set_env("GIS_CLUSTERING__DBSCAN_EPS_KM", "2.5");
        jail.set_env("GIS_GENERAL__DEFAULT_LIMIT", "7");

        let config = GisConfig::load().expect("config loads");
        assert_eq!(config.database.path, "/tmp/override.db");
        assert!((config.clustering.dbscan_eps_km - 2.5).abs() < f64::EPSILON);
        assert_eq!(config.general.default_limit, 7);
        Ok(())
    });
}

#[test]
fn env_beats_project_toml() {
    Jail::expect_with(|jail| {
        jail.create_dir(".gis")?;
        jail.create_file(
            ".gis/config.toml",
            r"
[clustering]
kmeans_k = 4
",
        )?;
        jail.set_env("GIS_CLUSTERING__KMEANS_K", "9");

        let config = GisConfig::load().expect("config loads");
        assert_eq!(config.clustering.kmeans_k, 9);
        Ok(())
    });
}

#[test]
fn log_filter_variable_does_not_break_loading() {
    Jail::expect_with(|jail| {
        jail.set_env("GIS_LOG", "debug");
        let config = GisConfig::load().expect("config loads");
        assert_eq!(config.general.default_limit, 20);
        Ok(())
    });
}

#[test]
fn invalid_env_value_is_rejected() {
    Jail::expect_with(|jail| {
        jail.set_env("GIS_CLUSTERING__DBSCAN_EPS_KM", "-1");
        assert!(GisConfig::load().is_err());
        Ok(())
    });
}
