use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A named zone of the zoning ordinance, as registered for one barangay.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ZoningZone {
    pub id: String,
    /// Canonical zone code (`R-1`, `C-2`, `INS-1`).
    pub zone_type: String,
    pub barangay: String,
    pub location_description: Option<String>,
    pub keywords: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
