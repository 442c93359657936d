//! Budget request repository: requests, decisions, and status history.
//!
//! A request leaves `pending` exactly once. The decision UPDATE is guarded by
//! `status = 'pending'`, so a second decision, even a concurrent one, affects
//! no row and fails with [`DatabaseError::AlreadyDecided`] without writing
//! history.

use chrono::Utc;

use gis_core::audit_detail::BudgetDecidedDetail;
use gis_core::entities::{BudgetRequest, BudgetRequestStatusHistory};
use gis_core::enums::{AuditAction, BudgetRequestStatus, EntityType};
use gis_core::ids::{PREFIX_BUDGET_HISTORY, PREFIX_BUDGET_REQUEST};
use gis_core::responses::BudgetDecisionResponse;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime, parse_enum, parse_optional_datetime};
use crate::service::GisService;

const SELECT_COLS: &str = "id, project_id, requested_by, requested_amount, reason, status, \
     approved_amount, decision_notes, reviewed_by, reviewed_at, created_at";

const HISTORY_COLS: &str =
    "id, budget_request_id, from_status, to_status, action_by, notes, created_at";

/// Filter criteria for budget request listing.
#[derive(Debug, Default, Clone)]
pub struct BudgetRequestFilter {
    pub project_id: Option<String>,
    pub status: Option<BudgetRequestStatus>,
    pub limit: Option<u32>,
}

fn row_to_request(row: &libsql::Row) -> Result<BudgetRequest, DatabaseError> {
    Ok(BudgetRequest {
        id: row.get(0)?,
        project_id: row.get(1)?,
        requested_by: row.get(2)?,
        requested_amount: row.get(3)?,
        reason: row.get(4)?,
        status: parse_enum(&row.get::<String>(5)?)?,
        approved_amount: row.get::<Option<f64>>(6)?,
        decision_notes: get_opt_string(row, 7)?,
        reviewed_by: get_opt_string(row, 8)?,
        reviewed_at: parse_optional_datetime(get_opt_string(row, 9)?.as_deref())?,
        created_at: parse_datetime(&row.get::<String>(10)?)?,
    })
}

fn row_to_history(row: &libsql::Row) -> Result<BudgetRequestStatusHistory, DatabaseError> {
    Ok(BudgetRequestStatusHistory {
        id: row.get(0)?,
        budget_request_id: row.get(1)?,
        from_status: parse_enum(&row.get::<String>(2)?)?,
        to_status: parse_enum(&row.get::<String>(3)?)?,
        action_by: row.get(4)?,
        notes: get_opt_string(row, 5)?,
        created_at: parse_datetime(&row.get::<String>(6)?)?,
    })
}

pub(crate) fn positive_amount(field: &str, amount: f64) -> Result<(), DatabaseError> {
    if amount.is_finite() && amount > 0.0 {
        Ok(())
    } else {
        Err(DatabaseError::InvalidState(format!(
            "{field} must be greater than zero, got {amount}"
        )))
    }
}

fn ensure_pending(request: &BudgetRequest, to: BudgetRequestStatus) -> Result<(), DatabaseError> {
    if request.status.can_transition_to(to) {
        Ok(())
    } else {
        Err(DatabaseError::AlreadyDecided {
            id: request.id.clone(),
            status: request.status,
        })
    }
}

impl GisService {
    /// File a budget increase request against a project.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` for an unknown project and
    /// `DatabaseError::InvalidState` for a non-positive amount or empty reason.
    pub async fn create_budget_request(
        &self,
        project_id: &str,
        requested_by: &str,
        requested_amount: f64,
        reason: &str,
    ) -> Result<BudgetRequest, DatabaseError> {
        positive_amount("requested amount", requested_amount)?;
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(DatabaseError::InvalidState(
                "budget request reason must not be empty".into(),
            ));
        }
        self.get_project(project_id).await?;

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_BUDGET_REQUEST).await?;

        self.db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO budget_requests ({SELECT_COLS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, NULL, NULL, NULL, NULL, ?7)"
                ),
                libsql::params![
                    id.as_str(),
                    project_id,
                    requested_by,
                    requested_amount,
                    reason,
                    BudgetRequestStatus::Pending.as_str(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        let request = BudgetRequest {
            id: id.clone(),
            project_id: project_id.to_string(),
            requested_by: requested_by.to_string(),
            requested_amount,
            reason: reason.to_string(),
            status: BudgetRequestStatus::Pending,
            approved_amount: None,
            decision_notes: None,
            reviewed_by: None,
            reviewed_at: None,
            created_at: now,
        };

        self.record_audit(
            EntityType::BudgetRequest,
            &id,
            AuditAction::Created,
            requested_by,
            Some(&request),
        )
        .await?;

        Ok(request)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` when no request has this id.
    pub async fn get_budget_request(&self, id: &str) -> Result<BudgetRequest, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM budget_requests WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found("budget request", id))?;
        row_to_request(&row)
    }

    /// Newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_budget_requests(
        &self,
        filter: &BudgetRequestFilter,
    ) -> Result<Vec<BudgetRequest>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(ref project_id) = filter.project_id {
            params.push(project_id.clone().into());
            conditions.push(format!("project_id = ?{}", params.len()));
        }
        if let Some(status) = filter.status {
            params.push(status.as_str().into());
            conditions.push(format!("status = ?{}", params.len()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let limit = filter.limit.unwrap_or(100);
        let sql = format!(
            "SELECT {SELECT_COLS} FROM budget_requests {where_clause}
             ORDER BY created_at DESC, rowid DESC LIMIT {limit}"
        );

        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;
        let mut requests = Vec::new();
        while let Some(row) = rows.next().await? {
            requests.push(row_to_request(&row)?);
        }
        Ok(requests)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn count_pending_budget_requests(&self, project_id: &str) -> Result<u32, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT COUNT(*) FROM budget_requests WHERE project_id = ?1 AND status = 'pending'",
                [project_id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        let count = row.get::<i64>(0)?;
        u32::try_from(count).map_err(|e| DatabaseError::Query(format!("pending count {count}: {e}")))
    }

    /// Status history of a request, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn budget_request_history(
        &self,
        budget_request_id: &str,
    ) -> Result<Vec<BudgetRequestStatusHistory>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {HISTORY_COLS} FROM budget_request_status_history
                     WHERE budget_request_id = ?1 ORDER BY created_at, rowid"
                ),
                [budget_request_id],
            )
            .await?;
        let mut history = Vec::new();
        while let Some(row) = rows.next().await? {
            history.push(row_to_history(&row)?);
        }
        Ok(history)
    }

    /// Approve a pending request and add the approved amount to the
    /// project's cost. `approved_amount` defaults to the requested amount.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::AlreadyDecided` when the request is no longer
    /// pending and `DatabaseError::InvalidState` for a non-positive amount.
    pub async fn approve_budget_request(
        &self,
        id: &str,
        actor: &str,
        approved_amount: Option<f64>,
        notes: Option<&str>,
    ) -> Result<BudgetDecisionResponse, DatabaseError> {
        let request = self.get_budget_request(id).await?;
        ensure_pending(&request, BudgetRequestStatus::Approved)?;
        let amount = approved_amount.unwrap_or(request.requested_amount);
        positive_amount("approved amount", amount)?;
        self.decide(request, actor, BudgetRequestStatus::Approved, Some(amount), notes)
            .await
    }

    /// Reject a pending request. The project's cost is unchanged.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::AlreadyDecided` when the request is no longer
    /// pending.
    pub async fn reject_budget_request(
        &self,
        id: &str,
        actor: &str,
        notes: Option<&str>,
    ) -> Result<BudgetDecisionResponse, DatabaseError> {
        let request = self.get_budget_request(id).await?;
        self.decide(request, actor, BudgetRequestStatus::Rejected, None, notes)
            .await
    }

    async fn decide(
        &self,
        request: BudgetRequest,
        actor: &str,
        to: BudgetRequestStatus,
        approved_amount: Option<f64>,
        notes: Option<&str>,
    ) -> Result<BudgetDecisionResponse, DatabaseError> {
        ensure_pending(&request, to)?;

        let from = request.status;
        let notes = notes.map(str::trim).filter(|n| !n.is_empty());
        let now = Utc::now();
        let history_id = self.db().generate_id(PREFIX_BUDGET_HISTORY).await?;

        let tx = self.db().conn().transaction().await?;
        let affected = tx
            .execute(
                "UPDATE budget_requests
                 SET status = ?1, approved_amount = ?2, decision_notes = ?3, reviewed_by = ?4, reviewed_at = ?5
                 WHERE id = ?6 AND status = 'pending'",
                libsql::params![
                    to.as_str(),
                    approved_amount,
                    notes,
                    actor,
                    now.to_rfc3339(),
                    request.id.as_str()
                ],
            )
            .await?;
        if affected != 1 {
            tx.rollback().await?;
            let current = self.get_budget_request(&request.id).await?;
            return Err(DatabaseError::AlreadyDecided {
                id: current.id,
                status: current.status,
            });
        }

        if let Some(amount) = approved_amount {
            tx.execute(
                "UPDATE projects SET project_cost = COALESCE(project_cost, 0) + ?1, updated_at = ?2
                 WHERE id = ?3",
                libsql::params![amount, now.to_rfc3339(), request.project_id.as_str()],
            )
            .await?;
        }

        tx.execute(
            &format!(
                "INSERT INTO budget_request_status_history ({HISTORY_COLS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"
            ),
            libsql::params![
                history_id.as_str(),
                request.id.as_str(),
                from.as_str(),
                to.as_str(),
                actor,
                notes,
                now.to_rfc3339()
            ],
        )
        .await?;

        let detail = BudgetDecidedDetail {
            from: from.as_str().to_string(),
            to: to.as_str().to_string(),
            approved_amount,
            project_id: request.project_id.clone(),
        };
        self.record_audit(
            EntityType::BudgetRequest,
            &request.id,
            AuditAction::Decided,
            actor,
            Some(&detail),
        )
        .await?;
        tx.commit().await?;

        tracing::info!(
            request = %request.id,
            project = %request.project_id,
            decision = %to,
            amount = approved_amount,
            actor,
            "budget request decided"
        );

        let project_cost = self.get_project(&request.project_id).await?.project_cost;
        let history = BudgetRequestStatusHistory {
            id: history_id,
            budget_request_id: request.id.clone(),
            from_status: from,
            to_status: to,
            action_by: actor.to_string(),
            notes: notes.map(String::from),
            created_at: now,
        };
        let request = BudgetRequest {
            status: to,
            approved_amount,
            decision_notes: notes.map(String::from),
            reviewed_by: Some(actor.to_string()),
            reviewed_at: Some(now),
            ..request
        };

        Ok(BudgetDecisionResponse {
            request,
            history,
            project_cost,
        })
    }
}
