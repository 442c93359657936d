//! Suitability analysis configuration.

use serde::{Deserialize, Serialize};

/// Tagum City hall, the reference point for accessibility scoring.
const fn default_city_center_lat() -> f64 {
    7.4478
}

const fn default_city_center_lng() -> f64 {
    125.8078
}

const fn default_skip_existing() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_city_center_lat")]
    pub city_center_lat: f64,

    #[serde(default = "default_city_center_lng")]
    pub city_center_lng: f64,

    /// Whether batch runs skip projects that already have an analysis.
    /// `--force` on the command line overrides this.
    #[serde(default = "default_skip_existing")]
    pub skip_existing: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            city_center_lat: default_city_center_lat(),
            city_center_lng: default_city_center_lng(),
            skip_existing: default_skip_existing(),
        }
    }
}

impl AnalysisConfig {
    #[must_use]
    pub const fn city_center(&self) -> (f64, f64) {
        (self.city_center_lat, self.city_center_lng)
    }
}
