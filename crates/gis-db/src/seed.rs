//! Bundled reference data for a fresh tracker.
//!
//! Project types, allowed-use rules, and barangay profiles are upserted, so
//! seeding twice is harmless and re-applies the bundled values. Zones are only
//! seeded into an empty registry; a registry someone has edited is left alone.
//!
//! Hazard profiles are planning defaults for Tagum City barangays and are meant
//! to be replaced with surveyed values.

use serde::Serialize;

use gis_core::entities::{BarangayProfile, ProjectType, ZoneAllowedUse};
use gis_core::enums::FloodSusceptibility::{High, Low, Moderate, VeryHigh};
use gis_core::enums::UseClass::{Conditional as C, Primary as P, Prohibited as X};
use gis_core::enums::{FloodSusceptibility, UseClass};

use crate::error::DatabaseError;
use crate::service::GisService;

/// Actor recorded on seeded zones.
pub const SEED_ACTOR: &str = "seed";

const PROJECT_TYPES: &[(&str, &str, &str)] = &[
    ("school", "School Building", "Classrooms and school facilities"),
    ("health_center", "Health Center", "Barangay health stations and clinics"),
    ("market", "Public Market", "Market halls and stalls"),
    ("road", "Road", "Road construction, widening, and concreting"),
    ("drainage", "Drainage", "Canals, culverts, and flood control"),
    ("park", "Park", "Parks, plazas, and playgrounds"),
    ("housing", "Housing", "Residential and socialized housing"),
    ("warehouse", "Warehouse", "Storage and logistics buildings"),
    ("barangay_hall", "Barangay Hall", "Barangay government offices"),
    ("water_system", "Water System", "Water supply and sanitation"),
];

const RULES: &[(&str, &[(&str, UseClass)])] = &[
    (
        "school",
        &[("INS-1", P), ("R-1", C), ("R-2", C), ("R-3", C), ("C-1", C), ("I-1", X), ("I-2", X)],
    ),
    (
        "health_center",
        &[("INS-1", P), ("R-2", C), ("C-1", C), ("C-2", C), ("I-2", X)],
    ),
    ("market", &[("C-1", P), ("C-2", P), ("R-3", C), ("R-1", X), ("INS-1", X)]),
    (
        "road",
        &[
            ("R-1", P),
            ("R-2", P),
            ("R-3", P),
            ("C-1", P),
            ("C-2", P),
            ("I-1", P),
            ("I-2", P),
            ("AGRO", P),
            ("AGRICULTURAL", C),
            ("PARKS", C),
            ("ECO-TOURISM", C),
        ],
    ),
    (
        "drainage",
        &[
            ("R-1", P),
            ("R-2", P),
            ("R-3", P),
            ("SHZ", P),
            ("C-1", P),
            ("C-2", P),
            ("I-1", P),
            ("I-2", P),
            ("AGRICULTURAL", C),
        ],
    ),
    ("park", &[("PARKS", P), ("ECO-TOURISM", P), ("R-1", C), ("R-2", C), ("INS-1", C)]),
    (
        "housing",
        &[
            ("R-1", P),
            ("R-2", P),
            ("R-3", P),
            ("SHZ", P),
            ("C-2", C),
            ("I-1", X),
            ("I-2", X),
            ("AGRICULTURAL", X),
        ],
    ),
    ("warehouse", &[("I-1", P), ("I-2", P), ("C-2", C), ("AGRO", C), ("R-1", X), ("R-2", X)]),
    ("barangay_hall", &[("INS-1", P), ("R-1", C), ("R-2", C), ("C-1", C)]),
    (
        "water_system",
        &[("SPECIAL", P), ("INS-1", C), ("R-1", C), ("R-2", C), ("AGRICULTURAL", C)],
    ),
];

/// (barangay, flood, mean slope %, environmentally sensitive)
const PROFILES: &[(&str, FloodSusceptibility, f64, bool)] = &[
    ("Apokon", Moderate, 2.5, false),
    ("Bincungan", High, 1.5, true),
    ("Busaon", VeryHigh, 1.0, true),
    ("Canocotan", Moderate, 3.0, false),
    ("Cuambogan", Low, 4.5, false),
    ("La Filipina", Low, 6.0, false),
    ("Liboganon", High, 1.5, true),
    ("Madaum", High, 2.0, true),
    ("Magdum", Moderate, 2.5, false),
    ("Magugpo Poblacion", Moderate, 1.5, false),
    ("Mankilam", Low, 5.0, false),
    ("New Balamban", Low, 7.5, false),
    ("Nueva Fuerza", Low, 9.0, false),
    ("Pagsabangan", Moderate, 3.5, false),
    ("Pandapan", Low, 12.0, false),
    ("San Agustin", Low, 4.0, false),
    ("San Isidro", Moderate, 3.0, false),
    ("San Miguel", Moderate, 2.5, false),
    ("Visayan Village", Moderate, 2.0, false),
];

/// (zone type, barangay, location description, keywords)
const ZONES: &[(&str, &str, &str, &[&str])] = &[
    (
        "C-1",
        "Magugpo Poblacion",
        "Public market and central business district",
        &["public market", "commercial center", "central business"],
    ),
    (
        "INS-1",
        "Magugpo Poblacion",
        "City hall and government center",
        &["city hall", "government center", "civic center"],
    ),
    (
        "PARKS",
        "Magugpo Poblacion",
        "Freedom park and city plaza",
        &["park", "plaza", "playground"],
    ),
    (
        "C-2",
        "Visayan Village",
        "Commercial strip along the national highway",
        &["mall", "highway commercial", "terminal"],
    ),
    (
        "R-2",
        "Visayan Village",
        "Medium density residential subdivisions",
        &["subdivision", "housing"],
    ),
    ("R-1", "Apokon", "Low density residential area", &["residential", "village"]),
    (
        "INS-1",
        "Apokon",
        "School and hospital campus",
        &["school", "hospital", "health center"],
    ),
    ("R-3", "San Miguel", "High density residential", &["apartment", "townhouse"]),
    ("I-1", "Bincungan", "Port and light industry", &["port", "wharf", "warehouse"]),
    (
        "ECO-TOURISM",
        "Bincungan",
        "Mangrove and coastal eco-park",
        &["mangrove", "eco-park", "coastal"],
    ),
    (
        "I-2",
        "Madaum",
        "Heavy industry and fish port",
        &["fish port", "industrial", "processing plant"],
    ),
    (
        "AGRO",
        "Cuambogan",
        "Agro-industrial processing",
        &["rice mill", "agro-industrial", "post-harvest"],
    ),
    (
        "AGRICULTURAL",
        "Pandapan",
        "Rice fields and banana plantations",
        &["farm", "irrigation", "plantation"],
    ),
    ("AGRICULTURAL", "Nueva Fuerza", "Upland farms", &["farm", "plantation"]),
    (
        "SHZ",
        "La Filipina",
        "Socialized housing sites",
        &["socialized housing", "relocation"],
    ),
    (
        "SPECIAL",
        "Mankilam",
        "Water and sanitation facilities",
        &["water system", "reservoir", "sanitary landfill"],
    ),
];

/// What a seeding run wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
    pub project_types: u32,
    pub rules: u32,
    pub profiles: u32,
    pub zones_created: u32,
    /// The registry already had zones, so none were added.
    pub zones_skipped: bool,
}

impl GisService {
    /// Load the bundled reference data.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if any write fails.
    pub async fn seed_reference_data(&self) -> Result<SeedSummary, DatabaseError> {
        let mut summary = SeedSummary::default();

        for (code, name, description) in PROJECT_TYPES {
            self.upsert_project_type(&ProjectType {
                code: (*code).to_string(),
                name: (*name).to_string(),
                description: Some((*description).to_string()),
            })
            .await?;
            summary.project_types += 1;
        }

        for (project_type, uses) in RULES {
            for (zone_type, use_class) in *uses {
                self.set_allowed_use(&ZoneAllowedUse {
                    project_type: (*project_type).to_string(),
                    zone_type: (*zone_type).to_string(),
                    use_class: *use_class,
                })
                .await?;
                summary.rules += 1;
            }
        }

        for (barangay, flood, slope, sensitive) in PROFILES {
            self.upsert_barangay_profile(&BarangayProfile {
                barangay: (*barangay).to_string(),
                flood_susceptibility: Some(*flood),
                mean_slope_pct: Some(*slope),
                environmentally_sensitive: Some(*sensitive),
            })
            .await?;
            summary.profiles += 1;
        }

        if self.list_zones(true).await?.is_empty() {
            for (zone_type, barangay, description, keywords) in ZONES {
                let keywords: Vec<String> = keywords.iter().map(|k| (*k).to_string()).collect();
                self.create_zone(SEED_ACTOR, zone_type, barangay, Some(description), &keywords)
                    .await?;
                summary.zones_created += 1;
            }
        } else {
            summary.zones_skipped = true;
        }

        tracing::info!(
            project_types = summary.project_types,
            rules = summary.rules,
            profiles = summary.profiles,
            zones = summary.zones_created,
            "reference data seeded"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{ACTOR, new_project, test_service};
    use gis_core::zone_code::normalize_zone_code;
    use pretty_assertions::assert_eq;

    #[test]
    fn bundled_zone_codes_are_canonical() {
        for (project_type, uses) in RULES {
            assert!(PROJECT_TYPES.iter().any(|(code, _, _)| code == project_type));
            for (zone, _) in *uses {
                assert_eq!(normalize_zone_code(zone), Some(*zone));
            }
        }
        for (zone, _, _, _) in ZONES {
            assert_eq!(normalize_zone_code(zone), Some(*zone));
        }
    }

    #[tokio::test]
    async fn seeding_twice_is_idempotent() {
        let svc = test_service().await;
        let first = svc.seed_reference_data().await.unwrap();
        assert_eq!(first.zones_created as usize, ZONES.len());
        assert!(!first.zones_skipped);

        let second = svc.seed_reference_data().await.unwrap();
        assert_eq!(second.zones_created, 0);
        assert!(second.zones_skipped);

        let reference = svc.load_reference().await.unwrap();
        assert_eq!(reference.zones.len(), ZONES.len());
        assert_eq!(reference.project_types.len(), PROJECT_TYPES.len());
        assert_eq!(reference.rules.len(), first.rules as usize);
        assert_eq!(reference.profiles.len(), PROFILES.len());
    }

    #[tokio::test]
    async fn seeded_registry_supports_detection_and_recommendation() {
        let svc = test_service().await;
        svc.seed_reference_data().await.unwrap();

        let project = svc
            .create_project(
                ACTOR,
                new_project(
                    "Public Market Expansion",
                    "Magugpo Poblacion",
                    7.448,
                    125.803,
                ),
            )
            .await
            .unwrap();
        assert_eq!(project.zone_type.as_deref(), Some("C-1"));

        let reference = svc.load_reference().await.unwrap();
        let set = reference.compatibility().recommend("market", 3).unwrap();
        assert_eq!(set.recommendations[0].zone_type, "C-1");
    }
}
