//! Aggregate reports over projects, zones, and suitability results.

use std::collections::{BTreeMap, HashMap};

use gis_core::entities::{LandSuitabilityAnalysis, Project, ZoningZone};
use gis_core::enums::ProjectStatus;
use gis_core::responses::{BarangayAnalyticsRow, ZoneAnalyticsRow, ZoneStatistics};
use gis_core::zone_code::{ZoneType, normalize_zone_code};

/// Per zone type: project counts by status and total cost.
///
/// Only projects with a zone type take part. Rows follow ordinance order;
/// codes outside the ordinance sort last, alphabetically.
#[must_use]
pub fn zone_analytics(projects: &[Project]) -> Vec<ZoneAnalyticsRow> {
    let mut rows: BTreeMap<(usize, String), ZoneAnalyticsRow> = BTreeMap::new();
    for project in projects {
        let Some(raw) = project.zone_type.as_deref().map(str::trim).filter(|z| !z.is_empty()) else {
            continue;
        };
        let known = ZoneType::parse(raw);
        let code = known.map_or_else(|| raw.to_string(), |z| z.code().to_string());
        let order = known
            .and_then(|z| ZoneType::ALL.iter().position(|k| *k == z))
            .unwrap_or(ZoneType::ALL.len());

        let row = rows
            .entry((order, code.clone()))
            .or_insert_with(|| ZoneAnalyticsRow {
                display_name: known.map_or_else(|| code.clone(), |z| z.display_name().to_string()),
                zone_type: code,
                total_projects: 0,
                completed: 0,
                in_progress: 0,
                planned: 0,
                delayed: 0,
                total_cost: 0.0,
            });
        row.total_projects += 1;
        match project.status {
            ProjectStatus::Completed => row.completed += 1,
            ProjectStatus::InProgress => row.in_progress += 1,
            ProjectStatus::Planned => row.planned += 1,
            ProjectStatus::Delayed => row.delayed += 1,
            ProjectStatus::Cancelled => {}
        }
        row.total_cost += project.project_cost.unwrap_or(0.0);
    }
    rows.into_values().collect()
}

/// Per barangay: project count and suitability distribution.
///
/// Projects without a barangay are grouped under `unassigned`.
#[must_use]
pub fn barangay_analytics(
    projects: &[Project],
    analyses: &[LandSuitabilityAnalysis],
) -> Vec<BarangayAnalyticsRow> {
    let by_project: HashMap<&str, &LandSuitabilityAnalysis> = analyses
        .iter()
        .map(|a| (a.project_id.as_str(), a))
        .collect();

    // barangay -> (row, score sum)
    let mut rows: BTreeMap<String, (BarangayAnalyticsRow, f64)> = BTreeMap::new();
    for project in projects {
        let barangay = project
            .barangay
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .unwrap_or(crate::clustering::UNASSIGNED_BARANGAY)
            .to_string();
        let (row, sum) = rows.entry(barangay.clone()).or_insert_with(|| {
            (
                BarangayAnalyticsRow {
                    barangay,
                    project_count: 0,
                    analyzed_count: 0,
                    average_suitability: None,
                    by_category: BTreeMap::new(),
                },
                0.0,
            )
        });
        row.project_count += 1;
        if let Some(analysis) = by_project.get(project.id.as_str()) {
            row.analyzed_count += 1;
            *sum += analysis.overall_score;
            *row.by_category.entry(analysis.category).or_default() += 1;
        }
    }

    rows.into_values()
        .map(|(mut row, sum)| {
            if row.analyzed_count > 0 {
                let mean = sum / f64::from(row.analyzed_count);
                row.average_suitability = Some((mean * 100.0).round() / 100.0);
            }
            row
        })
        .collect()
}

/// Totals over active zones, by canonical type and by barangay.
#[must_use]
pub fn zone_statistics(zones: &[ZoningZone]) -> ZoneStatistics {
    let mut stats = ZoneStatistics::default();
    for zone in zones.iter().filter(|z| z.is_active) {
        stats.total += 1;
        let code = normalize_zone_code(&zone.zone_type)
            .map_or_else(|| zone.zone_type.trim().to_string(), str::to_string);
        *stats.by_type.entry(code).or_default() += 1;
        *stats
            .by_barangay
            .entry(zone.barangay.trim().to_string())
            .or_default() += 1;
    }
    stats
}
