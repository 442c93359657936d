//! Batch zone detection over stored projects.

use serde::Serialize;

use gis_core::responses::ZoneDetectBatchSummary;

use crate::error::DatabaseError;
use crate::repos::project::ProjectFilter;
use crate::service::GisService;

/// One project's detection outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectedZone {
    pub project_id: String,
    pub project_name: String,
    pub previous_zone: Option<String>,
    pub zone_type: String,
    pub confidence: f64,
    pub matched_zone_id: String,
    pub applied: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DetectionRun {
    pub summary: ZoneDetectBatchSummary,
    pub detections: Vec<DetectedZone>,
}

impl GisService {
    /// Run the detector over every project matching `filter`.
    ///
    /// Projects with a validated zone are skipped. With `apply`, each
    /// detection that differs from the stored zone is written back; a failed
    /// write is logged and counted.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` when the projects or the zone registry cannot
    /// be loaded.
    pub async fn detect_project_zones(
        &self,
        actor: &str,
        filter: &ProjectFilter,
        apply: bool,
    ) -> Result<DetectionRun, DatabaseError> {
        let projects = self.list_projects(filter).await?;
        let zones = self.list_zones(false).await?;
        let detector = gis_analysis::detector::ZoneDetector::new(&zones);

        let mut run = DetectionRun::default();
        for project in &projects {
            if project.zone_validated {
                run.summary.skipped_validated += 1;
                continue;
            }
            run.summary.processed += 1;

            let Some(detection) = detector.detect_project(project) else {
                run.summary.unmatched += 1;
                continue;
            };
            run.summary.detected += 1;

            let changed = project.zone_type.as_deref() != Some(detection.zone_type.as_str());
            let mut applied = false;
            if apply && changed {
                match self.apply_detected_zone(actor, project, &detection).await {
                    Ok(_) => {
                        run.summary.applied += 1;
                        applied = true;
                    }
                    Err(e) => {
                        tracing::warn!(project = %project.id, error = %e, "applying detected zone failed");
                        run.summary.errors += 1;
                    }
                }
            }

            run.detections.push(DetectedZone {
                project_id: project.id.clone(),
                project_name: project.name.clone(),
                previous_zone: project.zone_type.clone(),
                zone_type: detection.zone_type,
                confidence: detection.confidence,
                matched_zone_id: detection.matched_zone.id,
                applied,
            });
        }

        tracing::info!(
            processed = run.summary.processed,
            detected = run.summary.detected,
            applied = run.summary.applied,
            unmatched = run.summary.unmatched,
            skipped_validated = run.summary.skipped_validated,
            "zone detection batch finished"
        );
        Ok(run)
    }
}
