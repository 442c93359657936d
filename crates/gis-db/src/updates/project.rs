//! Project update builder.

use chrono::NaiveDate;
use serde::Serialize;

use gis_core::enums::ProjectStatus;

/// Changed project fields. `Some(None)` clears a nullable column.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prn: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barangay: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_cost: Option<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_of_funds: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_type: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone_type: Option<Option<String>>,
}

impl ProjectUpdate {
    /// Whether the change touches the text the zone detector reads.
    #[must_use]
    pub const fn touches_detection_input(&self) -> bool {
        self.name.is_some() || self.description.is_some() || self.barangay.is_some()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.prn.is_none()
            && self.name.is_none()
            && self.description.is_none()
            && self.barangay.is_none()
            && self.latitude.is_none()
            && self.longitude.is_none()
            && self.project_cost.is_none()
            && self.source_of_funds.is_none()
            && self.status.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.progress.is_none()
            && self.project_type.is_none()
            && self.zone_type.is_none()
    }
}

#[derive(Debug, Default)]
pub struct ProjectUpdateBuilder(ProjectUpdate);

impl ProjectUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(ProjectUpdate::default())
    }

    #[must_use]
    pub fn prn(mut self, prn: Option<String>) -> Self {
        self.0.prn = Some(prn);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.0.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: Option<String>) -> Self {
        self.0.description = Some(description);
        self
    }

    #[must_use]
    pub fn barangay(mut self, barangay: Option<String>) -> Self {
        self.0.barangay = Some(barangay);
        self
    }

    #[must_use]
    pub fn location(mut self, latitude: Option<f64>, longitude: Option<f64>) -> Self {
        self.0.latitude = Some(latitude);
        self.0.longitude = Some(longitude);
        self
    }

    #[must_use]
    pub fn project_cost(mut self, project_cost: Option<f64>) -> Self {
        self.0.project_cost = Some(project_cost);
        self
    }

    #[must_use]
    pub fn source_of_funds(mut self, source_of_funds: Option<String>) -> Self {
        self.0.source_of_funds = Some(source_of_funds);
        self
    }

    #[must_use]
    pub fn status(mut self, status: ProjectStatus) -> Self {
        self.0.status = Some(status);
        self
    }

    #[must_use]
    pub fn start_date(mut self, start_date: Option<NaiveDate>) -> Self {
        self.0.start_date = Some(start_date);
        self
    }

    #[must_use]
    pub fn end_date(mut self, end_date: Option<NaiveDate>) -> Self {
        self.0.end_date = Some(end_date);
        self
    }

    #[must_use]
    pub fn progress(mut self, progress: u8) -> Self {
        self.0.progress = Some(progress);
        self
    }

    #[must_use]
    pub fn project_type(mut self, project_type: Option<String>) -> Self {
        self.0.project_type = Some(project_type);
        self
    }

    #[must_use]
    pub fn zone_type(mut self, zone_type: Option<String>) -> Self {
        self.0.zone_type = Some(zone_type);
        self
    }

    #[must_use]
    pub fn build(self) -> ProjectUpdate {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_set_fields_serialize() {
        let update = ProjectUpdateBuilder::new()
            .progress(40)
            .description(None)
            .build();
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({ "description": null, "progress": 40 }));
        assert!(update.touches_detection_input());
        assert!(!update.is_empty());
    }

    #[test]
    fn empty_update() {
        let update = ProjectUpdateBuilder::new().build();
        assert!(update.is_empty());
        assert!(!update.touches_detection_input());
    }
}
