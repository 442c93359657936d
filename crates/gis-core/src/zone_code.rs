//! Zone type codes of the municipal zoning ordinance.
//!
//! Codes have three written forms:
//! - canonical, hyphenated: `R-1`, `INS-1`, `ECO-TOURISM` (what gets stored)
//! - compact, no separators: `R1`, `INS1`, `ECOTOURISM`
//! - display label: `Low Density Residential (R-1)`
//!
//! [`normalize_zone_code`] accepts any of them (plus a few aliases) and
//! returns the canonical code.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
pub enum ZoneType {
    #[serde(rename = "R-1")]
    R1,
    #[serde(rename = "R-2")]
    R2,
    #[serde(rename = "R-3")]
    R3,
    #[serde(rename = "SHZ")]
    Shz,
    #[serde(rename = "C-1")]
    C1,
    #[serde(rename = "C-2")]
    C2,
    #[serde(rename = "I-1")]
    I1,
    #[serde(rename = "I-2")]
    I2,
    #[serde(rename = "AGRO")]
    Agro,
    #[serde(rename = "INS-1")]
    Ins1,
    #[serde(rename = "PARKS")]
    Parks,
    #[serde(rename = "AGRICULTURAL")]
    Agricultural,
    #[serde(rename = "ECO-TOURISM")]
    EcoTourism,
    #[serde(rename = "SPECIAL")]
    Special,
}

/// Short aliases seen in hand-entered data.
const ALIASES: &[(&str, ZoneType)] = &[
    ("IN", ZoneType::Ins1),
    ("INS", ZoneType::Ins1),
    ("INST", ZoneType::Ins1),
    ("PARK", ZoneType::Parks),
    ("AGRI", ZoneType::Agricultural),
    ("ECO", ZoneType::EcoTourism),
    ("SOCIALIZED", ZoneType::Shz),
];

impl ZoneType {
    /// Declaration order doubles as the tie-break order for recommendations.
    pub const ALL: [Self; 14] = [
        Self::R1,
        Self::R2,
        Self::R3,
        Self::Shz,
        Self::C1,
        Self::C2,
        Self::I1,
        Self::I2,
        Self::Agro,
        Self::Ins1,
        Self::Parks,
        Self::Agricultural,
        Self::EcoTourism,
        Self::Special,
    ];

    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::R1 => "R-1",
            Self::R2 => "R-2",
            Self::R3 => "R-3",
            Self::Shz => "SHZ",
            Self::C1 => "C-1",
            Self::C2 => "C-2",
            Self::I1 => "I-1",
            Self::I2 => "I-2",
            Self::Agro => "AGRO",
            Self::Ins1 => "INS-1",
            Self::Parks => "PARKS",
            Self::Agricultural => "AGRICULTURAL",
            Self::EcoTourism => "ECO-TOURISM",
            Self::Special => "SPECIAL",
        }
    }

    #[must_use]
    pub const fn compact(self) -> &'static str {
        match self {
            Self::R1 => "R1",
            Self::R2 => "R2",
            Self::R3 => "R3",
            Self::Shz => "SHZ",
            Self::C1 => "C1",
            Self::C2 => "C2",
            Self::I1 => "I1",
            Self::I2 => "I2",
            Self::Agro => "AGRO",
            Self::Ins1 => "INS1",
            Self::Parks => "PARKS",
            Self::Agricultural => "AGRICULTURAL",
            Self::EcoTourism => "ECOTOURISM",
            Self::Special => "SPECIAL",
        }
    }

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::R1 => "Low Density Residential",
            Self::R2 => "Medium Density Residential",
            Self::R3 => "High Density Residential",
            Self::Shz => "Socialized Housing",
            Self::C1 => "Major Commercial",
            Self::C2 => "Minor Commercial",
            Self::I1 => "Heavy Industrial",
            Self::I2 => "Light/Medium Industrial",
            Self::Agro => "Agro-Industrial",
            Self::Ins1 => "Institutional",
            Self::Parks => "Parks & Open Spaces",
            Self::Agricultural => "Agricultural",
            Self::EcoTourism => "Eco-tourism",
            Self::Special => "Special Use",
        }
    }

    /// `Low Density Residential (R-1)`.
    #[must_use]
    pub fn display_label(self) -> String {
        format!("{} ({})", self.display_name(), self.code())
    }

    /// Parse any accepted written form. Returns `None` for unknown input.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }

        // Display label: "Name (CODE)" -> CODE
        let candidate = match (trimmed.rfind('('), trimmed.ends_with(')')) {
            (Some(open), true) => &trimmed[open + 1..trimmed.len() - 1],
            _ => trimmed,
        };

        let key = squash(candidate);
        if key.is_empty() {
            return None;
        }

        Self::ALL
            .iter()
            .copied()
            .find(|zone| zone.compact() == key || squash(zone.display_name()) == key)
            .or_else(|| {
                ALIASES
                    .iter()
                    .find(|(alias, _)| *alias == key)
                    .map(|(_, zone)| *zone)
            })
    }
}

/// Uppercase and drop everything that is not alphanumeric.
fn squash(input: &str) -> String {
    input
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

impl fmt::Display for ZoneType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ZoneType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| CoreError::Validation(format!("unknown zone code: {s}")))
    }
}

/// Canonical hyphenated code for any accepted written form.
#[must_use]
pub fn normalize_zone_code(input: &str) -> Option<&'static str> {
    ZoneType::parse(input).map(ZoneType::code)
}

/// Human-readable label; unknown codes are returned trimmed and unchanged.
#[must_use]
pub fn display_zone_code(input: &str) -> String {
    ZoneType::parse(input).map_or_else(|| input.trim().to_string(), ZoneType::display_label)
}
