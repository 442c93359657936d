use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{FloodSusceptibility, UseClass};

/// A kind of infrastructure project (`road`, `school`, `market`).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ProjectType {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
}

/// How one zone type treats one project type.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ZoneAllowedUse {
    pub project_type: String,
    pub zone_type: String,
    pub use_class: UseClass,
}

/// Hazard and terrain profile of a barangay.
///
/// Every attribute is optional; the suitability analyzer scores missing data
/// with a neutral value.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct BarangayProfile {
    pub barangay: String,
    pub flood_susceptibility: Option<FloodSusceptibility>,
    /// Mean slope in percent.
    pub mean_slope_pct: Option<f64>,
    pub environmentally_sensitive: Option<bool>,
}
