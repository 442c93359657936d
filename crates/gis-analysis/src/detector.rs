//! Zone detection from a project's free text and barangay.
//!
//! Every active zone in the registry is scored against the project:
//!
//! | signal | points |
//! |---|---|
//! | barangay equal (case-insensitive, trimmed) | [`BARANGAY_EXACT_WEIGHT`] |
//! | barangay contains / contained in | [`BARANGAY_PARTIAL_WEIGHT`] |
//! | keyword is a substring of the text | [`KEYWORD_SUBSTRING_WEIGHT`] |
//! | keyword matches as whole words, any whitespace | [`KEYWORD_PATTERN_WEIGHT`] |
//! | text is contained in the keyword | [`KEYWORD_LOOSE_WEIGHT`] |
//! | each word shared with the location description | [`LOCATION_WORD_WEIGHT`] |
//!
//! Barangay points only count for a zone that also has text evidence (a
//! keyword or location word hit); a barangay match on its own is handled by
//! the majority vote below.
//!
//! The highest-scoring zone wins; on a tie the zone registered first is kept.
//! Below [`MIN_CONFIDENCE`], a barangay-level majority vote may still produce
//! a low-confidence answer ([`FALLBACK_CONFIDENCE`]).

use std::collections::HashSet;

use regex::Regex;
use serde::Serialize;

use gis_core::entities::{Project, ZoningZone};

pub const BARANGAY_EXACT_WEIGHT: f64 = 30.0;
pub const BARANGAY_PARTIAL_WEIGHT: f64 = 15.0;
pub const KEYWORD_SUBSTRING_WEIGHT: f64 = 40.0;
pub const KEYWORD_PATTERN_WEIGHT: f64 = 25.0;
pub const KEYWORD_LOOSE_WEIGHT: f64 = 10.0;
pub const LOCATION_WORD_WEIGHT: f64 = 5.0;

/// Minimum score for a direct match.
pub const MIN_CONFIDENCE: f64 = 30.0;
/// Confidence reported by the barangay majority fallback.
pub const FALLBACK_CONFIDENCE: f64 = 20.0;
/// Same-type zones a barangay needs before the fallback applies.
pub const FALLBACK_MIN_ZONES: usize = 2;
pub const MAX_CONFIDENCE: f64 = 100.0;

/// A detected zone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneDetection {
    pub zone_type: String,
    /// Within `0..=100`.
    pub confidence: f64,
    pub matched_zone: ZoningZone,
}

struct Keyword {
    text: String,
    pattern: Option<Regex>,
}

struct PreparedZone<'a> {
    zone: &'a ZoningZone,
    barangay: String,
    keywords: Vec<Keyword>,
    location_words: HashSet<String>,
}

/// Scores projects against an ordered zone registry.
///
/// Keyword patterns are compiled once at construction; inactive zones are
/// dropped up front.
pub struct ZoneDetector<'a> {
    zones: Vec<PreparedZone<'a>>,
}

impl<'a> ZoneDetector<'a> {
    #[must_use]
    pub fn new(registry: &'a [ZoningZone]) -> Self {
        let zones = registry
            .iter()
            .filter(|zone| zone.is_active)
            .map(|zone| PreparedZone {
                zone,
                barangay: normalize(&zone.barangay),
                keywords: zone
                    .keywords
                    .iter()
                    .map(|k| normalize(k))
                    .filter(|k| !k.is_empty())
                    .map(|text| Keyword {
                        pattern: keyword_pattern(&text),
                        text,
                    })
                    .collect(),
                location_words: words(
                    &zone
                        .location_description
                        .as_deref()
                        .unwrap_or_default()
                        .to_lowercase(),
                ),
            })
            .collect();
        Self { zones }
    }

    #[must_use]
    pub fn detect_project(&self, project: &Project) -> Option<ZoneDetection> {
        self.detect(
            &project.name,
            project.description.as_deref(),
            project.barangay.as_deref(),
        )
    }

    /// Detect the zone for free text and an optional barangay.
    ///
    /// Empty input or an empty registry yields `None`.
    #[must_use]
    pub fn detect(
        &self,
        name: &str,
        description: Option<&str>,
        barangay: Option<&str>,
    ) -> Option<ZoneDetection> {
        let text = normalize(&format!("{name} {}", description.unwrap_or_default()));
        let barangay = barangay.map(normalize).filter(|b| !b.is_empty());
        if text.is_empty() && barangay.is_none() {
            return None;
        }

        let text_words = words(&text);
        let mut best: Option<(&PreparedZone<'_>, f64)> = None;
        for zone in &self.zones {
            let score = score_zone(zone, &text, &text_words, barangay.as_deref());
            if score > best.map_or(0.0, |(_, s)| s) {
                best = Some((zone, score));
            }
        }

        match best {
            Some((zone, score)) if score >= MIN_CONFIDENCE => Some(ZoneDetection {
                zone_type: zone.zone.zone_type.clone(),
                confidence: score.min(MAX_CONFIDENCE),
                matched_zone: zone.zone.clone(),
            }),
            _ => barangay.and_then(|b| self.barangay_majority(&b)),
        }
    }

    /// Most frequent zone type among the barangay's zones, first seen wins ties.
    fn barangay_majority(&self, barangay: &str) -> Option<ZoneDetection> {
        // (zone_type, count, first zone)
        let mut tally: Vec<(&str, usize, &ZoningZone)> = Vec::new();
        for prepared in self.zones.iter().filter(|z| z.barangay == barangay) {
            let zone_type = prepared.zone.zone_type.as_str();
            match tally.iter_mut().find(|(t, _, _)| *t == zone_type) {
                Some(entry) => entry.1 += 1,
                None => tally.push((zone_type, 1, prepared.zone)),
            }
        }

        let mut winner: Option<(&str, usize, &ZoningZone)> = None;
        for entry in tally {
            if entry.1 > winner.map_or(0, |w| w.1) {
                winner = Some(entry);
            }
        }

        winner
            .filter(|(_, count, _)| *count >= FALLBACK_MIN_ZONES)
            .map(|(zone_type, _, zone)| ZoneDetection {
                zone_type: zone_type.to_string(),
                confidence: FALLBACK_CONFIDENCE,
                matched_zone: zone.clone(),
            })
    }
}

fn score_zone(
    zone: &PreparedZone<'_>,
    text: &str,
    text_words: &HashSet<String>,
    barangay: Option<&str>,
) -> f64 {
    let mut text_score = 0.0;

    if !text.is_empty() {
        for keyword in &zone.keywords {
            if text.contains(keyword.text.as_str()) {
                text_score += KEYWORD_SUBSTRING_WEIGHT;
            } else if keyword.pattern.as_ref().is_some_and(|p| p.is_match(text)) {
                text_score += KEYWORD_PATTERN_WEIGHT;
            } else if keyword.text.contains(text) {
                text_score += KEYWORD_LOOSE_WEIGHT;
            }
        }
    }

    let shared = zone.location_words.intersection(text_words).count();
    // Word counts are tiny; the cast cannot lose precision.
    #[allow(clippy::cast_precision_loss)]
    {
        text_score += LOCATION_WORD_WEIGHT * shared as f64;
    }

    if text_score <= 0.0 {
        return 0.0;
    }

    let barangay_score = match barangay {
        Some(b) if !zone.barangay.is_empty() => {
            if zone.barangay == b {
                BARANGAY_EXACT_WEIGHT
            } else if zone.barangay.contains(b) || b.contains(zone.barangay.as_str()) {
                BARANGAY_PARTIAL_WEIGHT
            } else {
                0.0
            }
        }
        _ => 0.0,
    };

    text_score + barangay_score
}

/// Lowercase, trim, and collapse internal whitespace.
fn normalize(input: &str) -> String {
    input
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Distinct word tokens (letters, digits, underscore).
fn words(text: &str) -> HashSet<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

/// Whole-word pattern for a keyword that tolerates any run of separators
/// between its words (`public market` matches `public-market`, `public\tmarket`).
fn keyword_pattern(keyword: &str) -> Option<Regex> {
    let parts: Vec<String> = keyword
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|w| !w.is_empty())
        .map(regex::escape)
        .collect();
    if parts.is_empty() {
        return None;
    }
    let pattern = format!(r"\b{}\b", parts.join(r"[\s\-_/]+"));
    Regex::new(&pattern).ok()
}
