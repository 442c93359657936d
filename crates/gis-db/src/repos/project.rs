//! Project repository: CRUD, engineer assignment, zone assignment, and
//! role projections.
//!
//! Every write runs the zone detector when the project has no validated zone
//! and its name, description, or barangay changed, then notifies the
//! registered [`ProjectWriteObserver`](crate::observer::ProjectWriteObserver)s.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use gis_analysis::AnalysisError;
use gis_analysis::detector::{ZoneDetection, ZoneDetector};
use gis_core::audit_detail::{ZoneDetectedDetail, ZoneValidatedDetail};
use gis_core::entities::{EngineerProjectView, FinanceProjectView, Project};
use gis_core::enums::{AuditAction, EntityType, ProjectStatus};
use gis_core::ids::PREFIX_PROJECT;
use gis_core::zone_code::normalize_zone_code;

use crate::error::DatabaseError;
use crate::helpers::{
    format_date, get_bool, get_opt_string, parse_datetime, parse_enum, parse_optional_date,
};
use crate::observer::{ProjectWrite, ProjectWriteKind};
use crate::service::GisService;
use crate::updates::project::ProjectUpdate;

const SELECT_COLS: &str = "id, prn, name, description, barangay, latitude, longitude, project_cost, \
     source_of_funds, status, start_date, end_date, progress, project_type, zone_type, \
     zone_validated, created_at, updated_at";

/// Fields of a project to be created. Everything but `name` is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewProject {
    pub prn: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub barangay: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub project_cost: Option<f64>,
    pub source_of_funds: Option<String>,
    /// Defaults to `planned`.
    pub status: Option<ProjectStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub progress: u8,
    pub project_type: Option<String>,
    pub engineers: Vec<String>,
    /// Set by hand; skips automatic detection.
    pub zone_type: Option<String>,
}

/// Filter criteria for project listing. All filters are exact matches;
/// barangay comparison ignores case.
#[derive(Debug, Default, Clone)]
pub struct ProjectFilter {
    pub barangay: Option<String>,
    pub status: Option<ProjectStatus>,
    pub zone_type: Option<String>,
    pub project_type: Option<String>,
    pub engineer: Option<String>,
    /// Only projects that have usable coordinates.
    pub with_coordinates: bool,
    pub limit: Option<u32>,
}

fn row_to_project(row: &libsql::Row) -> Result<Project, DatabaseError> {
    let progress = row.get::<i64>(12)?.clamp(0, 100);
    Ok(Project {
        id: row.get(0)?,
        prn: get_opt_string(row, 1)?,
        name: row.get(2)?,
        description: get_opt_string(row, 3)?,
        barangay: get_opt_string(row, 4)?,
        latitude: row.get::<Option<f64>>(5)?,
        longitude: row.get::<Option<f64>>(6)?,
        project_cost: row.get::<Option<f64>>(7)?,
        source_of_funds: get_opt_string(row, 8)?,
        status: parse_enum(&row.get::<String>(9)?)?,
        start_date: parse_optional_date(get_opt_string(row, 10)?.as_deref())?,
        end_date: parse_optional_date(get_opt_string(row, 11)?.as_deref())?,
        progress: u8::try_from(progress).unwrap_or(100),
        project_type: get_opt_string(row, 13)?,
        engineers: Vec::new(),
        zone_type: get_opt_string(row, 14)?,
        zone_validated: get_bool(row, 15)?,
        created_at: parse_datetime(&row.get::<String>(16)?)?,
        updated_at: parse_datetime(&row.get::<String>(17)?)?,
    })
}

fn opt_value<T: Into<libsql::Value>>(value: Option<T>) -> libsql::Value {
    value.map_or(libsql::Value::Null, Into::into)
}

/// Trimmed, non-empty text or `None`.
pub(crate) fn clean(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

fn canonical_zone(zone_type: &str) -> Result<String, DatabaseError> {
    normalize_zone_code(zone_type)
        .map(String::from)
        .ok_or_else(|| AnalysisError::UnknownZoneCode(zone_type.to_string()).into())
}

pub(crate) fn check_progress(progress: u8) -> Result<(), DatabaseError> {
    if progress > 100 {
        return Err(DatabaseError::InvalidState(format!(
            "progress must be within 0..=100, got {progress}"
        )));
    }
    Ok(())
}

fn check_dates(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<(), DatabaseError> {
    if let (Some(start), Some(end)) = (start, end)
        && end < start
    {
        return Err(DatabaseError::InvalidState(format!(
            "end date {end} is before start date {start}"
        )));
    }
    Ok(())
}

impl GisService {
    /// Create a project. Without a hand-set zone type the zone detector
    /// assigns one from the active registry.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidState` for an empty name, out-of-range
    /// progress, reversed dates, or a PRN already in use, and
    /// `DatabaseError::Analysis` for an unknown zone code or project type.
    pub async fn create_project(
        &self,
        actor: &str,
        new: NewProject,
    ) -> Result<Project, DatabaseError> {
        let name = new.name.trim().to_string();
        if name.is_empty() {
            return Err(DatabaseError::InvalidState(
                "project name must not be empty".into(),
            ));
        }
        check_progress(new.progress)?;
        check_dates(new.start_date, new.end_date)?;

        let prn = clean(new.prn.as_deref());
        if let Some(ref prn) = prn
            && self.get_project_by_prn(prn).await?.is_some()
        {
            return Err(DatabaseError::InvalidState(format!("PRN {prn} is already in use")));
        }
        let project_type = clean(new.project_type.as_deref());
        if let Some(ref code) = project_type {
            self.ensure_project_type(code).await?;
        }

        let description = clean(new.description.as_deref());
        let barangay = clean(new.barangay.as_deref());
        let engineers = normalize_engineers(&new.engineers);

        let (zone_type, detection) = match clean(new.zone_type.as_deref()) {
            Some(zone) => (Some(canonical_zone(&zone)?), None),
            None => {
                let zones = self.list_zones(false).await?;
                let detection = ZoneDetector::new(&zones).detect(
                    &name,
                    description.as_deref(),
                    barangay.as_deref(),
                );
                (detection.as_ref().map(|d| d.zone_type.clone()), detection)
            }
        };

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_PROJECT).await?;
        let status = new.status.unwrap_or(ProjectStatus::Planned);

        let project = Project {
            id: id.clone(),
            prn,
            name,
            description,
            barangay,
            latitude: new.latitude,
            longitude: new.longitude,
            project_cost: new.project_cost,
            source_of_funds: clean(new.source_of_funds.as_deref()),
            status,
            start_date: new.start_date,
            end_date: new.end_date,
            progress: new.progress,
            project_type,
            engineers,
            zone_type,
            zone_validated: false,
            created_at: now,
            updated_at: now,
        };

        let tx = self.db().conn().transaction().await?;
        tx.execute(
            &format!(
                "INSERT INTO projects ({SELECT_COLS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, 0, ?16, ?17)"
            ),
            libsql::params![
                project.id.as_str(),
                project.prn.as_deref(),
                project.name.as_str(),
                project.description.as_deref(),
                project.barangay.as_deref(),
                project.latitude,
                project.longitude,
                project.project_cost,
                project.source_of_funds.as_deref(),
                status.as_str(),
                format_date(project.start_date),
                format_date(project.end_date),
                i64::from(project.progress),
                project.project_type.as_deref(),
                project.zone_type.as_deref(),
                now.to_rfc3339(),
                now.to_rfc3339()
            ],
        )
        .await?;
        for engineer in &project.engineers {
            tx.execute(
                "INSERT INTO project_engineers (project_id, engineer) VALUES (?1, ?2)",
                libsql::params![id.as_str(), engineer.as_str()],
            )
            .await?;
        }
        self.record_audit(EntityType::Project, &id, AuditAction::Created, actor, Some(&project))
            .await?;
        if let Some(ref detection) = detection {
            self.record_audit(
                EntityType::Project,
                &id,
                AuditAction::ZoneDetected,
                actor,
                Some(&detection_detail(detection)),
            )
            .await?;
        }
        tx.commit().await?;

        self.notify(&ProjectWrite {
            kind: ProjectWriteKind::Created,
            project: &project,
            actor,
            detection_confidence: detection.map(|d| d.confidence),
        });

        Ok(project)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` when no project has this id.
    pub async fn get_project(&self, id: &str) -> Result<Project, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM projects WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found("project", id))?;
        let mut project = row_to_project(&row)?;
        project.engineers = self.project_engineers(id).await?;
        Ok(project)
    }

    /// Look a project up by its Project Reference Number.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn get_project_by_prn(&self, prn: &str) -> Result<Option<Project>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM projects WHERE prn = ?1"),
                [prn.trim()],
            )
            .await?;
        let Some(row) = rows.next().await? else {
            return Ok(None);
        };
        let mut project = row_to_project(&row)?;
        project.engineers = self.project_engineers(&project.id).await?;
        Ok(Some(project))
    }

    /// Projects matching the filter, in creation order.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or a row cannot be decoded.
    pub async fn list_projects(&self, filter: &ProjectFilter) -> Result<Vec<Project>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(ref barangay) = filter.barangay {
            params.push(barangay.trim().into());
            conditions.push(format!("lower(trim(barangay)) = lower(?{})", params.len()));
        }
        if let Some(status) = filter.status {
            params.push(status.as_str().into());
            conditions.push(format!("status = ?{}", params.len()));
        }
        if let Some(ref zone_type) = filter.zone_type {
            let code = normalize_zone_code(zone_type).unwrap_or(zone_type.trim());
            params.push(code.into());
            conditions.push(format!("zone_type = ?{}", params.len()));
        }
        if let Some(ref project_type) = filter.project_type {
            params.push(project_type.trim().into());
            conditions.push(format!("project_type = ?{}", params.len()));
        }
        if let Some(ref engineer) = filter.engineer {
            params.push(engineer.trim().into());
            conditions.push(format!(
                "id IN (SELECT project_id FROM project_engineers WHERE engineer = ?{})",
                params.len()
            ));
        }
        if filter.with_coordinates {
            conditions.push("latitude IS NOT NULL AND longitude IS NOT NULL".to_string());
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let limit_clause = filter
            .limit
            .map(|limit| format!("LIMIT {limit}"))
            .unwrap_or_default();

        let sql = format!(
            "SELECT {SELECT_COLS} FROM projects {where_clause} ORDER BY rowid {limit_clause}"
        );
        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;

        let mut projects = Vec::new();
        while let Some(row) = rows.next().await? {
            projects.push(row_to_project(&row)?);
        }
        self.attach_engineers(&mut projects).await?;
        Ok(projects)
    }

    /// Apply a partial update.
    ///
    /// When the name, description, or barangay change, the project's zone is
    /// not validated, and the update does not set a zone by hand, detection
    /// runs again on the new values. A detection miss keeps the old zone.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` for an unknown id and the same
    /// validation errors as [`create_project`](Self::create_project).
    pub async fn update_project(
        &self,
        actor: &str,
        project_id: &str,
        update: ProjectUpdate,
    ) -> Result<Project, DatabaseError> {
        let current = self.get_project(project_id).await?;
        if update.is_empty() {
            return Ok(current);
        }

        let mut sets: Vec<String> = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut set = |column: &str, value: libsql::Value| {
            params.push(value);
            sets.push(format!("{column} = ?{}", params.len()));
        };

        if let Some(ref prn) = update.prn {
            let prn = clean(prn.as_deref());
            if let Some(ref prn) = prn
                && let Some(other) = self.get_project_by_prn(prn).await?
                && other.id != project_id
            {
                return Err(DatabaseError::InvalidState(format!("PRN {prn} is already in use")));
            }
            set("prn", opt_value(prn));
        }
        let name = match update.name {
            Some(ref name) => {
                let name = name.trim().to_string();
                if name.is_empty() {
                    return Err(DatabaseError::InvalidState(
                        "project name must not be empty".into(),
                    ));
                }
                set("name", name.clone().into());
                name
            }
            None => current.name.clone(),
        };
        let description = match update.description {
            Some(ref description) => {
                let description = clean(description.as_deref());
                set("description", opt_value(description.clone()));
                description
            }
            None => current.description.clone(),
        };
        let barangay = match update.barangay {
            Some(ref barangay) => {
                let barangay = clean(barangay.as_deref());
                set("barangay", opt_value(barangay.clone()));
                barangay
            }
            None => current.barangay.clone(),
        };
        if let Some(latitude) = update.latitude {
            set("latitude", opt_value(latitude));
        }
        if let Some(longitude) = update.longitude {
            set("longitude", opt_value(longitude));
        }
        if let Some(project_cost) = update.project_cost {
            set("project_cost", opt_value(project_cost));
        }
        if let Some(ref source_of_funds) = update.source_of_funds {
            set("source_of_funds", opt_value(clean(source_of_funds.as_deref())));
        }
        if let Some(status) = update.status {
            set("status", status.as_str().into());
        }
        if update.start_date.is_some() || update.end_date.is_some() {
            check_dates(
                update.start_date.unwrap_or(current.start_date),
                update.end_date.unwrap_or(current.end_date),
            )?;
        }
        if let Some(start_date) = update.start_date {
            set("start_date", opt_value(format_date(start_date)));
        }
        if let Some(end_date) = update.end_date {
            set("end_date", opt_value(format_date(end_date)));
        }
        if let Some(progress) = update.progress {
            check_progress(progress)?;
            set("progress", i64::from(progress).into());
        }
        if let Some(ref project_type) = update.project_type {
            let project_type = clean(project_type.as_deref());
            if let Some(ref code) = project_type {
                self.ensure_project_type(code).await?;
            }
            set("project_type", opt_value(project_type));
        }

        let mut detection: Option<ZoneDetection> = None;
        match update.zone_type {
            Some(Some(ref zone)) => {
                set("zone_type", canonical_zone(zone)?.into());
            }
            Some(None) => {
                set("zone_type", libsql::Value::Null);
                set("zone_validated", 0_i64.into());
            }
            None if update.touches_detection_input() && !current.zone_validated => {
                let zones = self.list_zones(false).await?;
                detection = ZoneDetector::new(&zones).detect(
                    &name,
                    description.as_deref(),
                    barangay.as_deref(),
                );
                if let Some(ref detected) = detection {
                    set("zone_type", detected.zone_type.clone().into());
                }
            }
            None => {}
        }

        let now = Utc::now();
        set("updated_at", now.to_rfc3339().into());
        params.push(project_id.into());
        let sql = format!(
            "UPDATE projects SET {} WHERE id = ?{}",
            sets.join(", "),
            params.len()
        );

        let tx = self.db().conn().transaction().await?;
        tx.execute(&sql, libsql::params_from_iter(params)).await?;
        self.record_audit(
            EntityType::Project,
            project_id,
            AuditAction::Updated,
            actor,
            Some(&update),
        )
        .await?;
        if let Some(ref detected) = detection {
            self.record_audit(
                EntityType::Project,
                project_id,
                AuditAction::ZoneDetected,
                actor,
                Some(&detection_detail(detected)),
            )
            .await?;
        }
        tx.commit().await?;

        let updated = self.get_project(project_id).await?;
        self.notify(&ProjectWrite {
            kind: ProjectWriteKind::Updated,
            project: &updated,
            actor,
            detection_confidence: detection.map(|d| d.confidence),
        });
        Ok(updated)
    }

    /// Replace the engineers assigned to a project.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` for an unknown id.
    pub async fn set_project_engineers(
        &self,
        actor: &str,
        project_id: &str,
        engineers: &[String],
    ) -> Result<Project, DatabaseError> {
        self.get_project(project_id).await?;
        let engineers = normalize_engineers(engineers);
        let now = Utc::now();

        let tx = self.db().conn().transaction().await?;
        tx.execute(
            "DELETE FROM project_engineers WHERE project_id = ?1",
            [project_id],
        )
        .await?;
        for engineer in &engineers {
            tx.execute(
                "INSERT INTO project_engineers (project_id, engineer) VALUES (?1, ?2)",
                libsql::params![project_id, engineer.as_str()],
            )
            .await?;
        }
        tx.execute(
            "UPDATE projects SET updated_at = ?1 WHERE id = ?2",
            libsql::params![now.to_rfc3339(), project_id],
        )
        .await?;
        let detail = serde_json::json!({ "engineers": engineers });
        self.record_audit(EntityType::Project, project_id, AuditAction::Updated, actor, Some(&detail))
            .await?;
        tx.commit().await?;

        let updated = self.get_project(project_id).await?;
        self.notify(&ProjectWrite {
            kind: ProjectWriteKind::Updated,
            project: &updated,
            actor,
            detection_confidence: None,
        });
        Ok(updated)
    }

    /// Confirm a project's zone. With `zone_type` the zone is replaced first;
    /// without it the current zone is confirmed. Validated zones are never
    /// overwritten by detection.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidState` when there is no zone to
    /// confirm and `DatabaseError::Analysis` for an unknown zone code.
    pub async fn validate_project_zone(
        &self,
        actor: &str,
        project_id: &str,
        zone_type: Option<&str>,
    ) -> Result<Project, DatabaseError> {
        let current = self.get_project(project_id).await?;
        let zone_type = match zone_type {
            Some(zone) => canonical_zone(zone)?,
            None => current.zone_type.clone().ok_or_else(|| {
                DatabaseError::InvalidState(format!(
                    "project {project_id} has no zone type to validate"
                ))
            })?,
        };

        let now = Utc::now();
        let tx = self.db().conn().transaction().await?;
        tx.execute(
            "UPDATE projects SET zone_type = ?1, zone_validated = 1, updated_at = ?2 WHERE id = ?3",
            libsql::params![zone_type.as_str(), now.to_rfc3339(), project_id],
        )
        .await?;
        let detail = ZoneValidatedDetail {
            zone_type: zone_type.clone(),
            validated_by: actor.to_string(),
        };
        self.record_audit(
            EntityType::Project,
            project_id,
            AuditAction::ZoneValidated,
            actor,
            Some(&detail),
        )
        .await?;
        tx.commit().await?;

        let updated = Project {
            zone_type: Some(zone_type),
            zone_validated: true,
            updated_at: now,
            ..current
        };
        self.notify(&ProjectWrite {
            kind: ProjectWriteKind::ZoneValidated,
            project: &updated,
            actor,
            detection_confidence: None,
        });
        Ok(updated)
    }

    /// Set a detected zone on a project that has no validated zone.
    pub(crate) async fn apply_detected_zone(
        &self,
        actor: &str,
        project: &Project,
        detection: &ZoneDetection,
    ) -> Result<Project, DatabaseError> {
        let now = Utc::now();
        let tx = self.db().conn().transaction().await?;
        let affected = tx
            .execute(
                "UPDATE projects SET zone_type = ?1, updated_at = ?2 WHERE id = ?3 AND zone_validated = 0",
                libsql::params![detection.zone_type.as_str(), now.to_rfc3339(), project.id.as_str()],
            )
            .await?;
        if affected == 0 {
            tx.rollback().await?;
            return Err(DatabaseError::InvalidState(format!(
                "project {} has a validated zone",
                project.id
            )));
        }
        self.record_audit(
            EntityType::Project,
            &project.id,
            AuditAction::ZoneDetected,
            actor,
            Some(&detection_detail(detection)),
        )
        .await?;
        tx.commit().await?;

        let updated = Project {
            zone_type: Some(detection.zone_type.clone()),
            updated_at: now,
            ..project.clone()
        };
        self.notify(&ProjectWrite {
            kind: ProjectWriteKind::ZoneDetected,
            project: &updated,
            actor,
            detection_confidence: Some(detection.confidence),
        });
        Ok(updated)
    }

    /// Engineer's projection of one project.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` for an unknown id.
    pub async fn engineer_view(&self, project_id: &str) -> Result<EngineerProjectView, DatabaseError> {
        let project = self.get_project(project_id).await?;
        Ok(EngineerProjectView::from(&project))
    }

    /// Projects assigned to an engineer, as engineer projections.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn engineer_projects(
        &self,
        engineer: &str,
    ) -> Result<Vec<EngineerProjectView>, DatabaseError> {
        let projects = self
            .list_projects(&ProjectFilter {
                engineer: Some(engineer.to_string()),
                ..ProjectFilter::default()
            })
            .await?;
        Ok(projects.iter().map(EngineerProjectView::from).collect())
    }

    /// Finance projection of one project, with its pending budget requests.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` for an unknown id.
    pub async fn finance_view(&self, project_id: &str) -> Result<FinanceProjectView, DatabaseError> {
        let project = self.get_project(project_id).await?;
        let pending = self.count_pending_budget_requests(project_id).await?;
        Ok(FinanceProjectView::new(&project, pending))
    }

    async fn ensure_project_type(&self, code: &str) -> Result<(), DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query("SELECT 1 FROM project_types WHERE code = ?1", [code])
            .await?;
        if rows.next().await?.is_none() {
            return Err(AnalysisError::ProjectTypeNotFound(code.to_string()).into());
        }
        Ok(())
    }

    async fn project_engineers(&self, project_id: &str) -> Result<Vec<String>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT engineer FROM project_engineers WHERE project_id = ?1 ORDER BY rowid",
                [project_id],
            )
            .await?;
        let mut engineers = Vec::new();
        while let Some(row) = rows.next().await? {
            engineers.push(row.get::<String>(0)?);
        }
        Ok(engineers)
    }

    async fn attach_engineers(&self, projects: &mut [Project]) -> Result<(), DatabaseError> {
        if projects.is_empty() {
            return Ok(());
        }
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT project_id, engineer FROM project_engineers ORDER BY rowid",
                (),
            )
            .await?;
        let mut by_project: HashMap<String, Vec<String>> = HashMap::new();
        while let Some(row) = rows.next().await? {
            by_project
                .entry(row.get::<String>(0)?)
                .or_default()
                .push(row.get::<String>(1)?);
        }
        for project in projects {
            if let Some(engineers) = by_project.remove(&project.id) {
                project.engineers = engineers;
            }
        }
        Ok(())
    }
}

fn detection_detail(detection: &ZoneDetection) -> ZoneDetectedDetail {
    ZoneDetectedDetail {
        zone_type: detection.zone_type.clone(),
        confidence: detection.confidence,
        matched_zone_id: Some(detection.matched_zone.id.clone()),
    }
}

/// Trimmed, de-duplicated, order kept.
fn normalize_engineers(engineers: &[String]) -> Vec<String> {
    let mut seen = Vec::new();
    for engineer in engineers.iter().map(|e| e.trim()).filter(|e| !e.is_empty()) {
        if !seen.iter().any(|s: &String| s == engineer) {
            seen.push(engineer.to_string());
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::audit::AuditFilter;
    use crate::test_support::helpers::{
        ACTOR, new_project, observed_service, seeded_service, test_service,
    };
    use crate::updates::project::ProjectUpdateBuilder;
    use pretty_assertions::assert_eq;

    async fn market_zone(svc: &GisService) {
        svc.create_zone(
            ACTOR,
            "C-1",
            "Magugpo Poblacion",
            Some("Public market and central business district"),
            &["public market".to_string(), "commercial center".to_string()],
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn create_and_get_project() {
        let svc = test_service().await;
        let project = svc
            .create_project(
                ACTOR,
                NewProject {
                    prn: Some(" PRN-2024-001 ".into()),
                    engineers: vec!["jdoe".into(), " jdoe ".into(), "asmith".into()],
                    project_cost: Some(25_000_000.0),
                    progress: 30,
                    start_date: NaiveDate::from_ymd_opt(2024, 1, 15),
                    ..new_project("City Hall Renovation", "Magugpo Poblacion", 7.4475, 125.8078)
                },
            )
            .await
            .unwrap();

        assert!(project.id.starts_with("prj-"));
        assert_eq!(project.prn.as_deref(), Some("PRN-2024-001"));
        assert_eq!(project.status, ProjectStatus::Planned);
        assert_eq!(project.engineers, vec!["jdoe".to_string(), "asmith".to_string()]);

        let fetched = svc.get_project(&project.id).await.unwrap();
        assert_eq!(fetched.name, "City Hall Renovation");
        assert_eq!(fetched.engineers, project.engineers);
        assert_eq!(fetched.start_date, NaiveDate::from_ymd_opt(2024, 1, 15));
        assert_eq!(fetched.progress, 30);
        assert_eq!(fetched.project_cost, Some(25_000_000.0));

        let by_prn = svc.get_project_by_prn("PRN-2024-001").await.unwrap().unwrap();
        assert_eq!(by_prn.id, project.id);
        assert!(svc.get_project_by_prn("PRN-0000").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn create_rejects_bad_input() {
        let svc = test_service().await;

        let empty = svc.create_project(ACTOR, new_project("  ", "Apokon", 7.4, 125.8)).await;
        assert!(matches!(empty, Err(DatabaseError::InvalidState(_))));

        let progress = svc
            .create_project(
                ACTOR,
                NewProject {
                    progress: 101,
                    ..new_project("Road", "Apokon", 7.4, 125.8)
                },
            )
            .await;
        assert!(matches!(progress, Err(DatabaseError::InvalidState(_))));

        let dates = svc
            .create_project(
                ACTOR,
                NewProject {
                    start_date: NaiveDate::from_ymd_opt(2024, 5, 1),
                    end_date: NaiveDate::from_ymd_opt(2024, 4, 1),
                    ..new_project("Road", "Apokon", 7.4, 125.8)
                },
            )
            .await;
        assert!(matches!(dates, Err(DatabaseError::InvalidState(_))));

        let zone = svc
            .create_project(
                ACTOR,
                NewProject {
                    zone_type: Some("X-9".into()),
                    ..new_project("Road", "Apokon", 7.4, 125.8)
                },
            )
            .await;
        assert!(matches!(zone, Err(DatabaseError::Analysis(_))));

        let project_type = svc
            .create_project(
                ACTOR,
                NewProject {
                    project_type: Some("stadium".into()),
                    ..new_project("Road", "Apokon", 7.4, 125.8)
                },
            )
            .await;
        assert!(matches!(
            project_type,
            Err(DatabaseError::Analysis(AnalysisError::ProjectTypeNotFound(_)))
        ));
    }

    #[tokio::test]
    async fn duplicate_prn_rejected() {
        let svc = test_service().await;
        let first = NewProject {
            prn: Some("PRN-1".into()),
            ..new_project("Road A", "Apokon", 7.4, 125.8)
        };
        svc.create_project(ACTOR, first.clone()).await.unwrap();
        let again = svc
            .create_project(
                ACTOR,
                NewProject {
                    name: "Road B".into(),
                    ..first
                },
            )
            .await;
        assert!(matches!(again, Err(DatabaseError::InvalidState(_))));
    }

    #[tokio::test]
    async fn create_detects_zone_from_keywords() {
        let (mut svc, observer) = observed_service().await;
        market_zone(&svc).await;
        svc.add_observer(observer.clone());

        let project = svc
            .create_project(
                ACTOR,
                new_project("Public Market Modernization", "Magugpo Poblacion", 7.448, 125.803),
            )
            .await
            .unwrap();
        assert_eq!(project.zone_type.as_deref(), Some("C-1"));
        assert!(!project.zone_validated);

        let detected = svc
            .query_audit(&AuditFilter {
                entity_id: Some(project.id.clone()),
                action: Some(AuditAction::ZoneDetected),
                ..AuditFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(detected.len(), 1);

        // registered twice: each registration is notified
        let writes = observer.writes.lock().unwrap();
        assert_eq!(writes.len(), 2);
        assert!(writes.iter().all(|(kind, id)| *kind == ProjectWriteKind::Created && *id == project.id));
    }

    #[tokio::test]
    async fn hand_set_zone_skips_detection() {
        let svc = test_service().await;
        market_zone(&svc).await;
        let project = svc
            .create_project(
                ACTOR,
                NewProject {
                    zone_type: Some("r1".into()),
                    ..new_project("Public Market Annex", "Magugpo Poblacion", 7.448, 125.803)
                },
            )
            .await
            .unwrap();
        assert_eq!(project.zone_type.as_deref(), Some("R-1"));
    }

    #[tokio::test]
    async fn list_filters() {
        let svc = test_service().await;
        let a = svc
            .create_project(
                ACTOR,
                NewProject {
                    engineers: vec!["jdoe".into()],
                    status: Some(ProjectStatus::Completed),
                    ..new_project("Road A", "Apokon", 7.40, 125.80)
                },
            )
            .await
            .unwrap();
        svc.create_project(ACTOR, new_project("Road B", "Bincungan", 7.50, 125.75))
            .await
            .unwrap();
        svc.create_project(
            ACTOR,
            NewProject {
                latitude: None,
                longitude: None,
                ..new_project("Road C", "apokon", 0.0, 0.0)
            },
        )
        .await
        .unwrap();

        let all = svc.list_projects(&ProjectFilter::default()).await.unwrap();
        let names: Vec<&str> = all.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Road A", "Road B", "Road C"]);

        let apokon = svc
            .list_projects(&ProjectFilter {
                barangay: Some("APOKON".into()),
                ..ProjectFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(apokon.len(), 2);

        let located = svc
            .list_projects(&ProjectFilter {
                barangay: Some("Apokon".into()),
                with_coordinates: true,
                ..ProjectFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(located.len(), 1);

        let completed = svc
            .list_projects(&ProjectFilter {
                status: Some(ProjectStatus::Completed),
                ..ProjectFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].id, a.id);
        assert_eq!(completed[0].engineers, vec!["jdoe".to_string()]);

        let mine = svc.engineer_projects("jdoe").await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, a.id);

        let limited = svc
            .list_projects(&ProjectFilter {
                limit: Some(2),
                ..ProjectFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(limited.len(), 2);
    }

    #[tokio::test]
    async fn update_changes_fields_and_audits() {
        let svc = test_service().await;
        let project = svc
            .create_project(ACTOR, new_project("Road", "Apokon", 7.4, 125.8))
            .await
            .unwrap();

        let updated = svc
            .update_project(
                ACTOR,
                &project.id,
                ProjectUpdateBuilder::new()
                    .status(ProjectStatus::InProgress)
                    .progress(55)
                    .project_cost(Some(1_000_000.0))
                    .description(Some("Concrete paving".into()))
                    .build(),
            )
            .await
            .unwrap();
        assert_eq!(updated.status, ProjectStatus::InProgress);
        assert_eq!(updated.progress, 55);
        assert_eq!(updated.project_cost, Some(1_000_000.0));
        assert_eq!(updated.description.as_deref(), Some("Concrete paving"));
        assert!(updated.updated_at >= project.updated_at);

        let audits = svc
            .query_audit(&AuditFilter {
                entity_id: Some(project.id.clone()),
                action: Some(AuditAction::Updated),
                ..AuditFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(audits.len(), 1);
        assert_eq!(audits[0].detail.as_ref().unwrap()["progress"], 55);
    }

    #[tokio::test]
    async fn update_rejects_invalid_values() {
        let svc = test_service().await;
        let project = svc
            .create_project(ACTOR, new_project("Road", "Apokon", 7.4, 125.8))
            .await
            .unwrap();

        let progress = svc
            .update_project(ACTOR, &project.id, ProjectUpdateBuilder::new().progress(120).build())
            .await;
        assert!(matches!(progress, Err(DatabaseError::InvalidState(_))));

        let name = svc
            .update_project(ACTOR, &project.id, ProjectUpdateBuilder::new().name(" ").build())
            .await;
        assert!(matches!(name, Err(DatabaseError::InvalidState(_))));

        let missing = svc
            .update_project(ACTOR, "prj-missing", ProjectUpdateBuilder::new().progress(1).build())
            .await;
        assert!(matches!(missing, Err(DatabaseError::NotFound { .. })));
    }

    #[tokio::test]
    async fn rename_redetects_unvalidated_zone() {
        let svc = test_service().await;
        market_zone(&svc).await;
        let project = svc
            .create_project(ACTOR, new_project("Drainage canal", "Magugpo Poblacion", 7.448, 125.803))
            .await
            .unwrap();
        assert_eq!(project.zone_type, None);

        let renamed = svc
            .update_project(
                ACTOR,
                &project.id,
                ProjectUpdateBuilder::new().name("Public Market Drainage").build(),
            )
            .await
            .unwrap();
        assert_eq!(renamed.zone_type.as_deref(), Some("C-1"));
    }

    #[tokio::test]
    async fn validated_zone_survives_rename() {
        let svc = test_service().await;
        market_zone(&svc).await;
        let project = svc
            .create_project(ACTOR, new_project("Drainage canal", "Magugpo Poblacion", 7.448, 125.803))
            .await
            .unwrap();

        let validated = svc
            .validate_project_zone(ACTOR, &project.id, Some("INS-1"))
            .await
            .unwrap();
        assert!(validated.zone_validated);
        assert_eq!(validated.zone_type.as_deref(), Some("INS-1"));

        let renamed = svc
            .update_project(
                ACTOR,
                &project.id,
                ProjectUpdateBuilder::new().name("Public Market Drainage").build(),
            )
            .await
            .unwrap();
        assert_eq!(renamed.zone_type.as_deref(), Some("INS-1"));
        assert!(renamed.zone_validated);
    }

    #[tokio::test]
    async fn validate_without_zone_is_invalid() {
        let svc = test_service().await;
        let project = svc
            .create_project(ACTOR, new_project("Road", "Apokon", 7.4, 125.8))
            .await
            .unwrap();
        let result = svc.validate_project_zone(ACTOR, &project.id, None).await;
        assert!(matches!(result, Err(DatabaseError::InvalidState(_))));
    }

    #[tokio::test]
    async fn clearing_zone_resets_validation() {
        let svc = test_service().await;
        let project = svc
            .create_project(
                ACTOR,
                NewProject {
                    zone_type: Some("R-1".into()),
                    ..new_project("Road", "Apokon", 7.4, 125.8)
                },
            )
            .await
            .unwrap();
        svc.validate_project_zone(ACTOR, &project.id, None).await.unwrap();

        let cleared = svc
            .update_project(ACTOR, &project.id, ProjectUpdateBuilder::new().zone_type(None).build())
            .await
            .unwrap();
        assert_eq!(cleared.zone_type, None);
        assert!(!cleared.zone_validated);
    }

    #[tokio::test]
    async fn engineers_replaced() {
        let (svc, observer) = observed_service().await;
        let project = svc
            .create_project(
                ACTOR,
                NewProject {
                    engineers: vec!["jdoe".into()],
                    ..new_project("Road", "Apokon", 7.4, 125.8)
                },
            )
            .await
            .unwrap();

        let updated = svc
            .set_project_engineers(ACTOR, &project.id, &["asmith".into(), "bcruz".into()])
            .await
            .unwrap();
        assert_eq!(updated.engineers, vec!["asmith".to_string(), "bcruz".to_string()]);
        assert!(svc.engineer_projects("jdoe").await.unwrap().is_empty());

        let kinds: Vec<ProjectWriteKind> =
            observer.writes.lock().unwrap().iter().map(|(k, _)| *k).collect();
        assert_eq!(kinds, vec![ProjectWriteKind::Created, ProjectWriteKind::Updated]);
    }

    #[tokio::test]
    async fn role_views() {
        let svc = seeded_service().await;
        let project = svc
            .create_project(
                ACTOR,
                NewProject {
                    project_cost: Some(2_000_000.0),
                    source_of_funds: Some("General Fund".into()),
                    engineers: vec!["jdoe".into()],
                    progress: 10,
                    ..new_project("Road", "Apokon", 7.4, 125.8)
                },
            )
            .await
            .unwrap();
        svc.create_budget_request(&project.id, "jdoe", 500_000.0, "Price escalation")
            .await
            .unwrap();

        let eng = svc.engineer_view(&project.id).await.unwrap();
        assert_eq!(eng.progress, 10);
        assert_eq!(eng.engineers, vec!["jdoe".to_string()]);

        let fin = svc.finance_view(&project.id).await.unwrap();
        assert_eq!(fin.project_cost, Some(2_000_000.0));
        assert_eq!(fin.pending_budget_requests, 1);
    }

    #[test]
    fn engineer_normalization_keeps_order() {
        let engineers = normalize_engineers(&[
            " b ".to_string(),
            "a".to_string(),
            "b".to_string(),
            String::new(),
        ]);
        assert_eq!(engineers, vec!["b".to_string(), "a".to_string()]);
    }
}
