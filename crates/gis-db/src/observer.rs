//! Post-write hooks on the project write path.
//!
//! Every successful project create, update, engineer change, zone detection,
//! and zone validation notifies the registered observers after the row is
//! committed. Observers cannot veto or modify the write.

use gis_core::entities::Project;

/// What happened to the project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectWriteKind {
    Created,
    Updated,
    ZoneDetected,
    ZoneValidated,
}

impl ProjectWriteKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::ZoneDetected => "zone_detected",
            Self::ZoneValidated => "zone_validated",
        }
    }
}

/// A committed project write.
#[derive(Debug, Clone, Copy)]
pub struct ProjectWrite<'a> {
    pub kind: ProjectWriteKind,
    pub project: &'a Project,
    pub actor: &'a str,
    /// Detector confidence when this write assigned a zone automatically.
    pub detection_confidence: Option<f64>,
}

pub trait ProjectWriteObserver: Send + Sync {
    fn on_project_written(&self, write: &ProjectWrite<'_>);
}

/// Default observer: one structured log line per write.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ProjectWriteObserver for TracingObserver {
    fn on_project_written(&self, write: &ProjectWrite<'_>) {
        tracing::info!(
            kind = write.kind.as_str(),
            project = %write.project.id,
            actor = write.actor,
            zone_type = write.project.zone_type.as_deref().unwrap_or("-"),
            zone_validated = write.project.zone_validated,
            confidence = write.detection_confidence,
            "project written"
        );
    }
}
