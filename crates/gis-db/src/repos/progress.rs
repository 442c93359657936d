//! Itemized progress reports and cost entries, plus the overdue sweep.
//!
//! A project's `progress` column always mirrors its latest report by date.
//! Cost entries record spending and never touch `project_cost`, which is
//! the approved budget.

use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use gis_core::audit_detail::StatusChangedDetail;
use gis_core::entities::{CostEntry, ProgressUpdate};
use gis_core::enums::{AuditAction, CostType, EntityType, ProjectStatus};
use gis_core::ids::{PREFIX_COST, PREFIX_PROGRESS};
use gis_core::responses::{DelayedFlagSummary, ProjectCostReport};

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_date, parse_datetime, parse_enum};
use crate::observer::{ProjectWrite, ProjectWriteKind};
use crate::repos::budget::positive_amount;
use crate::repos::project::{check_progress, clean};
use crate::service::GisService;

/// Overdue projects reporting at least this much are not flagged.
pub const DELAY_PROGRESS_THRESHOLD: u8 = 98;

const PROGRESS_COLS: &str =
    "id, project_id, date, percentage_complete, description, created_by, created_at";

const COST_COLS: &str =
    "id, project_id, date, cost_type, description, amount, created_by, created_at";

/// A progress report to be filed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProgressUpdate {
    pub date: NaiveDate,
    pub percentage_complete: u8,
    pub description: Option<String>,
}

/// An expense to be recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCostEntry {
    pub date: NaiveDate,
    pub cost_type: CostType,
    pub description: Option<String>,
    pub amount: f64,
}

fn row_to_progress(row: &libsql::Row) -> Result<ProgressUpdate, DatabaseError> {
    let pct = row.get::<i64>(3)?;
    Ok(ProgressUpdate {
        id: row.get(0)?,
        project_id: row.get(1)?,
        date: parse_date(&row.get::<String>(2)?)?,
        percentage_complete: u8::try_from(pct)
            .map_err(|e| DatabaseError::Query(format!("percentage_complete {pct}: {e}")))?,
        description: get_opt_string(row, 4)?,
        created_by: row.get(5)?,
        created_at: parse_datetime(&row.get::<String>(6)?)?,
    })
}

fn row_to_cost(row: &libsql::Row) -> Result<CostEntry, DatabaseError> {
    Ok(CostEntry {
        id: row.get(0)?,
        project_id: row.get(1)?,
        date: parse_date(&row.get::<String>(2)?)?,
        cost_type: parse_enum(&row.get::<String>(3)?)?,
        description: get_opt_string(row, 4)?,
        amount: row.get(5)?,
        created_by: row.get(6)?,
        created_at: parse_datetime(&row.get::<String>(7)?)?,
    })
}

fn utilization(spent: f64, budget: Option<f64>) -> Option<f64> {
    budget
        .filter(|b| b.is_finite() && *b > 0.0)
        .map(|b| (spent / b * 10_000.0).round() / 100.0)
}

impl GisService {
    /// File a progress report and refresh the project's `progress`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` for an unknown project and
    /// `DatabaseError::InvalidState` for a percentage above 100.
    pub async fn add_progress_update(
        &self,
        actor: &str,
        project_id: &str,
        new: NewProgressUpdate,
    ) -> Result<ProgressUpdate, DatabaseError> {
        check_progress(new.percentage_complete)?;
        self.get_project(project_id).await?;

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_PROGRESS).await?;
        let update = ProgressUpdate {
            id: id.clone(),
            project_id: project_id.to_string(),
            date: new.date,
            percentage_complete: new.percentage_complete,
            description: clean(new.description.as_deref()),
            created_by: actor.to_string(),
            created_at: now,
        };

        let tx = self.db().conn().transaction().await?;
        tx.execute(
            &format!(
                "INSERT INTO project_progress ({PROGRESS_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"
            ),
            libsql::params![
                id.as_str(),
                project_id,
                update.date.to_string(),
                i64::from(update.percentage_complete),
                update.description.as_deref(),
                actor,
                now.to_rfc3339()
            ],
        )
        .await?;
        tx.execute(
            "UPDATE projects SET progress = (
                 SELECT percentage_complete FROM project_progress
                 WHERE project_id = ?1 ORDER BY date DESC, rowid DESC LIMIT 1
             ), updated_at = ?2 WHERE id = ?1",
            libsql::params![project_id, now.to_rfc3339()],
        )
        .await?;
        self.record_audit(
            EntityType::ProgressUpdate,
            &id,
            AuditAction::Created,
            actor,
            Some(&update),
        )
        .await?;
        tx.commit().await?;

        let project = self.get_project(project_id).await?;
        self.notify(&ProjectWrite {
            kind: ProjectWriteKind::Updated,
            project: &project,
            actor,
            detection_confidence: None,
        });
        Ok(update)
    }

    /// Progress reports of a project, newest date first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` for an unknown project.
    pub async fn list_progress_updates(
        &self,
        project_id: &str,
    ) -> Result<Vec<ProgressUpdate>, DatabaseError> {
        self.get_project(project_id).await?;
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {PROGRESS_COLS} FROM project_progress
                     WHERE project_id = ?1 ORDER BY date DESC, rowid DESC"
                ),
                [project_id],
            )
            .await?;
        let mut updates = Vec::new();
        while let Some(row) = rows.next().await? {
            updates.push(row_to_progress(&row)?);
        }
        Ok(updates)
    }

    /// Record an itemized expense.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` for an unknown project and
    /// `DatabaseError::InvalidState` for a non-positive amount.
    pub async fn add_cost_entry(
        &self,
        actor: &str,
        project_id: &str,
        new: NewCostEntry,
    ) -> Result<CostEntry, DatabaseError> {
        positive_amount("cost amount", new.amount)?;
        self.get_project(project_id).await?;

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_COST).await?;
        let entry = CostEntry {
            id: id.clone(),
            project_id: project_id.to_string(),
            date: new.date,
            cost_type: new.cost_type,
            description: clean(new.description.as_deref()),
            amount: new.amount,
            created_by: actor.to_string(),
            created_at: now,
        };

        let tx = self.db().conn().transaction().await?;
        tx.execute(
            &format!("INSERT INTO project_costs ({COST_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"),
            libsql::params![
                id.as_str(),
                project_id,
                entry.date.to_string(),
                entry.cost_type.as_str(),
                entry.description.as_deref(),
                entry.amount,
                actor,
                now.to_rfc3339()
            ],
        )
        .await?;
        self.record_audit(EntityType::CostEntry, &id, AuditAction::Created, actor, Some(&entry))
            .await?;
        tx.commit().await?;

        tracing::debug!(project = project_id, cost = %id, amount = entry.amount, "cost entry recorded");
        Ok(entry)
    }

    /// Cost entries of a project, newest date first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` for an unknown project.
    pub async fn list_cost_entries(&self, project_id: &str) -> Result<Vec<CostEntry>, DatabaseError> {
        self.get_project(project_id).await?;
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {COST_COLS} FROM project_costs
                     WHERE project_id = ?1 ORDER BY date DESC, rowid DESC"
                ),
                [project_id],
            )
            .await?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next().await? {
            entries.push(row_to_cost(&row)?);
        }
        Ok(entries)
    }

    /// Entries with the total, per-type totals, and budget utilization.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` for an unknown project.
    pub async fn project_cost_report(
        &self,
        project_id: &str,
    ) -> Result<ProjectCostReport, DatabaseError> {
        let project = self.get_project(project_id).await?;
        let entries = self.list_cost_entries(project_id).await?;

        let mut by_type: BTreeMap<CostType, f64> = BTreeMap::new();
        for entry in &entries {
            *by_type.entry(entry.cost_type).or_default() += entry.amount;
        }
        let total_cost: f64 = entries.iter().map(|e| e.amount).sum();

        Ok(ProjectCostReport {
            project_id: project.id,
            budget_utilization: utilization(total_cost, project.project_cost),
            entries,
            total_cost,
            by_type,
        })
    }

    /// Mark overdue in-progress projects as delayed.
    ///
    /// A project is overdue when its `end_date` is before `today`. It is
    /// flagged unless its latest progress report is at
    /// [`DELAY_PROGRESS_THRESHOLD`] or above; no report counts as 0%.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if a query or the status update fails.
    pub async fn flag_delayed_projects(
        &self,
        actor: &str,
        today: NaiveDate,
    ) -> Result<DelayedFlagSummary, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT p.id, (
                     SELECT pp.percentage_complete FROM project_progress pp
                     WHERE pp.project_id = p.id ORDER BY pp.date DESC, pp.rowid DESC LIMIT 1
                 )
                 FROM projects p
                 WHERE p.status = ?1 AND p.end_date IS NOT NULL AND p.end_date != ''
                   AND p.end_date < ?2
                 ORDER BY p.end_date, p.id",
                libsql::params![ProjectStatus::InProgress.as_str(), today.to_string()],
            )
            .await?;

        let mut summary = DelayedFlagSummary::default();
        let mut to_flag = Vec::new();
        while let Some(row) = rows.next().await? {
            summary.overdue += 1;
            let latest = row.get::<Option<i64>>(1)?.unwrap_or(0);
            if latest < i64::from(DELAY_PROGRESS_THRESHOLD) {
                to_flag.push(row.get::<String>(0)?);
            }
        }
        if to_flag.is_empty() {
            return Ok(summary);
        }

        let now = Utc::now();
        let detail = StatusChangedDetail {
            from: ProjectStatus::InProgress.as_str().to_string(),
            to: ProjectStatus::Delayed.as_str().to_string(),
        };
        let tx = self.db().conn().transaction().await?;
        for id in &to_flag {
            let affected = tx
                .execute(
                    "UPDATE projects SET status = ?1, updated_at = ?2 WHERE id = ?3 AND status = ?4",
                    libsql::params![
                        ProjectStatus::Delayed.as_str(),
                        now.to_rfc3339(),
                        id.as_str(),
                        ProjectStatus::InProgress.as_str()
                    ],
                )
                .await?;
            if affected == 0 {
                continue;
            }
            self.record_audit(
                EntityType::Project,
                id,
                AuditAction::StatusChanged,
                actor,
                Some(&detail),
            )
            .await?;
            summary.flagged += 1;
            summary.flagged_ids.push(id.clone());
        }
        tx.commit().await?;

        for id in &summary.flagged_ids {
            let project = self.get_project(id).await?;
            self.notify(&ProjectWrite {
                kind: ProjectWriteKind::Updated,
                project: &project,
                actor,
                detection_confidence: None,
            });
        }
        tracing::info!(
            overdue = summary.overdue,
            flagged = summary.flagged,
            "delayed-project sweep finished"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::audit::AuditFilter;
    use crate::repos::project::NewProject;
    use crate::test_support::helpers::{ACTOR, new_project, observed_service, test_service};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn project_with_budget(svc: &GisService, budget: Option<f64>) -> String {
        svc.create_project(
            ACTOR,
            NewProject {
                project_cost: budget,
                ..new_project("Apokon Covered Court", "Apokon", 7.44, 125.80)
            },
        )
        .await
        .unwrap()
        .id
    }

    async fn overdue_project(svc: &GisService, name: &str, end: NaiveDate) -> String {
        svc.create_project(
            ACTOR,
            NewProject {
                status: Some(ProjectStatus::InProgress),
                start_date: Some(day(2024, 1, 1)),
                end_date: Some(end),
                ..new_project(name, "Apokon", 7.44, 125.80)
            },
        )
        .await
        .unwrap()
        .id
    }

    fn report(date: NaiveDate, pct: u8) -> NewProgressUpdate {
        NewProgressUpdate {
            date,
            percentage_complete: pct,
            description: Some("site visit".into()),
        }
    }

    fn cost(cost_type: CostType, amount: f64) -> NewCostEntry {
        NewCostEntry {
            date: day(2024, 3, 1),
            cost_type,
            description: None,
            amount,
        }
    }

    #[tokio::test]
    async fn progress_update_sets_project_progress() {
        let (svc, observer) = observed_service().await;
        let id = project_with_budget(&svc, None).await;

        let update = svc
            .add_progress_update(ACTOR, &id, report(day(2024, 2, 1), 35))
            .await
            .unwrap();
        assert!(update.id.starts_with("prg-"));
        assert_eq!(update.created_by, ACTOR);
        assert_eq!(svc.get_project(&id).await.unwrap().progress, 35);
        assert_eq!(observer.writes.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn backdated_report_does_not_override_latest() {
        let svc = test_service().await;
        let id = project_with_budget(&svc, None).await;
        svc.add_progress_update(ACTOR, &id, report(day(2024, 3, 1), 60))
            .await
            .unwrap();
        svc.add_progress_update(ACTOR, &id, report(day(2024, 2, 1), 40))
            .await
            .unwrap();

        assert_eq!(svc.get_project(&id).await.unwrap().progress, 60);
        let listed = svc.list_progress_updates(&id).await.unwrap();
        let pcts: Vec<u8> = listed.iter().map(|u| u.percentage_complete).collect();
        assert_eq!(pcts, vec![60, 40]);
    }

    #[tokio::test]
    async fn progress_above_hundred_is_rejected() {
        let svc = test_service().await;
        let id = project_with_budget(&svc, None).await;
        let err = svc
            .add_progress_update(ACTOR, &id, report(day(2024, 2, 1), 101))
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidState(_)));
        assert!(svc.list_progress_updates(&id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn progress_for_unknown_project_is_not_found() {
        let svc = test_service().await;
        let err = svc
            .add_progress_update(ACTOR, "prj-missing0", report(day(2024, 2, 1), 10))
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
    }

    #[tokio::test]
    async fn cost_report_totals_by_type_and_utilization() {
        let svc = test_service().await;
        let id = project_with_budget(&svc, Some(1_000_000.0)).await;
        svc.add_cost_entry(ACTOR, &id, cost(CostType::Material, 200_000.0))
            .await
            .unwrap();
        svc.add_cost_entry(ACTOR, &id, cost(CostType::Labor, 50_000.0))
            .await
            .unwrap();
        svc.add_cost_entry(ACTOR, &id, cost(CostType::Material, 12_345.0))
            .await
            .unwrap();

        let report = svc.project_cost_report(&id).await.unwrap();
        assert_eq!(report.entries.len(), 3);
        assert_eq!(report.total_cost, 262_345.0);
        assert_eq!(report.by_type.get(&CostType::Material), Some(&212_345.0));
        assert_eq!(report.by_type.get(&CostType::Labor), Some(&50_000.0));
        assert_eq!(report.budget_utilization, Some(26.23));

        // Spending leaves the approved budget alone.
        assert_eq!(svc.get_project(&id).await.unwrap().project_cost, Some(1_000_000.0));
    }

    #[tokio::test]
    async fn cost_report_without_budget_has_no_utilization() {
        let svc = test_service().await;
        let id = project_with_budget(&svc, None).await;
        svc.add_cost_entry(ACTOR, &id, cost(CostType::Equipment, 9_000.0))
            .await
            .unwrap();
        let report = svc.project_cost_report(&id).await.unwrap();
        assert_eq!(report.budget_utilization, None);
        assert_eq!(report.total_cost, 9_000.0);
    }

    #[rstest]
    #[case(0.0)]
    #[case(-150.0)]
    #[case(f64::NAN)]
    #[tokio::test]
    async fn non_positive_cost_is_rejected(#[case] amount: f64) {
        let svc = test_service().await;
        let id = project_with_budget(&svc, None).await;
        let err = svc
            .add_cost_entry(ACTOR, &id, cost(CostType::Other, amount))
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidState(_)));
        assert!(svc.list_cost_entries(&id).await.unwrap().is_empty());
    }

    #[rstest]
    #[case::no_reports(None, true)]
    #[case::stalled(Some(60), true)]
    #[case::just_under(Some(97), true)]
    #[case::at_threshold(Some(98), false)]
    #[case::finished(Some(100), false)]
    #[tokio::test]
    async fn overdue_project_flagging_follows_latest_progress(
        #[case] latest: Option<u8>,
        #[case] flagged: bool,
    ) {
        let svc = test_service().await;
        let id = overdue_project(&svc, "Bincungan Drainage", day(2024, 6, 30)).await;
        if let Some(pct) = latest {
            svc.add_progress_update(ACTOR, &id, report(day(2024, 6, 1), pct))
                .await
                .unwrap();
        }

        let summary = svc
            .flag_delayed_projects(ACTOR, day(2024, 7, 15))
            .await
            .unwrap();
        assert_eq!(summary.overdue, 1);
        assert_eq!(summary.flagged, u32::from(flagged));

        let expected = if flagged {
            ProjectStatus::Delayed
        } else {
            ProjectStatus::InProgress
        };
        assert_eq!(svc.get_project(&id).await.unwrap().status, expected);
    }

    #[tokio::test]
    async fn sweep_skips_projects_not_yet_due_or_not_in_progress() {
        let svc = test_service().await;
        let due_today = overdue_project(&svc, "Road A", day(2024, 7, 15)).await;
        let overdue = overdue_project(&svc, "Road B", day(2024, 7, 1)).await;
        svc.create_project(
            ACTOR,
            NewProject {
                status: Some(ProjectStatus::Planned),
                end_date: Some(day(2024, 1, 31)),
                ..new_project("Road C", "Apokon", 7.44, 125.80)
            },
        )
        .await
        .unwrap();

        let summary = svc
            .flag_delayed_projects(ACTOR, day(2024, 7, 15))
            .await
            .unwrap();
        assert_eq!(summary.overdue, 1);
        assert_eq!(summary.flagged_ids, vec![overdue.clone()]);
        assert_eq!(
            svc.get_project(&due_today).await.unwrap().status,
            ProjectStatus::InProgress
        );

        let again = svc
            .flag_delayed_projects(ACTOR, day(2024, 7, 15))
            .await
            .unwrap();
        assert_eq!(again, DelayedFlagSummary::default());
    }

    #[tokio::test]
    async fn flagged_project_gets_status_changed_audit() {
        let svc = test_service().await;
        let id = overdue_project(&svc, "Road B", day(2024, 7, 1)).await;
        svc.flag_delayed_projects("scheduler", day(2024, 8, 1))
            .await
            .unwrap();

        let entries = svc
            .query_audit(&AuditFilter {
                entity_id: Some(id),
                action: Some(AuditAction::StatusChanged),
                ..AuditFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].actor.as_deref(), Some("scheduler"));
        let detail: StatusChangedDetail =
            serde_json::from_value(entries[0].detail.clone().unwrap()).unwrap();
        assert_eq!(detail.to, "delayed");
    }
}
