//! Audit trail repository.
//!
//! Append-only audit entries recording every mutation, with dynamic filtering.

use chrono::Utc;
use serde::Serialize;

use gis_core::entities::AuditEntry;
use gis_core::enums::{AuditAction, EntityType};
use gis_core::ids::PREFIX_AUDIT;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime, parse_enum, parse_optional_json, to_json};
use crate::service::GisService;

/// Filter criteria for audit queries.
#[derive(Debug, Default, Clone)]
pub struct AuditFilter {
    pub entity_type: Option<EntityType>,
    pub entity_id: Option<String>,
    pub action: Option<AuditAction>,
    pub actor: Option<String>,
    pub limit: Option<u32>,
}

impl GisService {
    /// Append an audit entry. Called by every mutation method.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the INSERT fails.
    pub async fn append_audit(&self, entry: &AuditEntry) -> Result<(), DatabaseError> {
        self.db()
            .conn()
            .execute(
                "INSERT INTO audit_trail (id, entity_type, entity_id, action, actor, detail, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                libsql::params![
                    entry.id.as_str(),
                    entry.entity_type.as_str(),
                    entry.entity_id.as_str(),
                    entry.action.as_str(),
                    entry.actor.as_deref(),
                    entry.detail.as_ref().map(std::string::ToString::to_string).as_deref(),
                    entry.created_at.to_rfc3339()
                ],
            )
            .await?;
        Ok(())
    }

    /// Build and append an entry with a fresh id.
    pub(crate) async fn record_audit<D: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: &str,
        action: AuditAction,
        actor: &str,
        detail: Option<&D>,
    ) -> Result<(), DatabaseError> {
        let id = self.db().generate_id(PREFIX_AUDIT).await?;
        let detail = detail.map(to_json).transpose()?;
        self.append_audit(&AuditEntry {
            id,
            entity_type,
            entity_id: entity_id.to_string(),
            action,
            actor: Some(actor.to_string()),
            detail,
            created_at: Utc::now(),
        })
        .await
    }

    /// Query audit entries with optional filters, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn query_audit(&self, filter: &AuditFilter) -> Result<Vec<AuditEntry>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(et) = filter.entity_type {
            params.push(libsql::Value::Text(et.as_str().to_string()));
            conditions.push(format!("entity_type = ?{}", params.len()));
        }
        if let Some(ref eid) = filter.entity_id {
            params.push(libsql::Value::Text(eid.clone()));
            conditions.push(format!("entity_id = ?{}", params.len()));
        }
        if let Some(action) = filter.action {
            params.push(libsql::Value::Text(action.as_str().to_string()));
            conditions.push(format!("action = ?{}", params.len()));
        }
        if let Some(ref actor) = filter.actor {
            params.push(libsql::Value::Text(actor.clone()));
            conditions.push(format!("actor = ?{}", params.len()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let limit = filter.limit.unwrap_or(100);
        let sql = format!(
            "SELECT id, entity_type, entity_id, action, actor, detail, created_at
             FROM audit_trail {where_clause}
             ORDER BY created_at DESC, rowid DESC LIMIT {limit}"
        );

        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;
        let mut entries = Vec::new();

        while let Some(row) = rows.next().await? {
            entries.push(AuditEntry {
                id: row.get::<String>(0)?,
                entity_type: parse_enum(&row.get::<String>(1)?)?,
                entity_id: row.get::<String>(2)?,
                action: parse_enum(&row.get::<String>(3)?)?,
                actor: get_opt_string(&row, 4)?,
                detail: parse_optional_json(get_opt_string(&row, 5)?.as_deref())?,
                created_at: parse_datetime(&row.get::<String>(6)?)?,
            });
        }

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{ACTOR, test_service};
    use gis_core::audit_detail::StatusChangedDetail;

    #[tokio::test]
    async fn append_and_filter() {
        let svc = test_service().await;

        let detail = StatusChangedDetail {
            from: "pending".into(),
            to: "approved".into(),
        };
        svc.record_audit(
            EntityType::BudgetRequest,
            "bud-00000001",
            AuditAction::Decided,
            ACTOR,
            Some(&detail),
        )
        .await
        .unwrap();
        svc.record_audit::<()>(EntityType::Project, "prj-00000001", AuditAction::Created, "admin", None)
            .await
            .unwrap();

        let all = svc.query_audit(&AuditFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);

        let budget = svc
            .query_audit(&AuditFilter {
                entity_type: Some(EntityType::BudgetRequest),
                ..AuditFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(budget.len(), 1);
        assert_eq!(budget[0].entity_id, "bud-00000001");
        assert_eq!(budget[0].actor.as_deref(), Some(ACTOR));
        let stored: StatusChangedDetail =
            serde_json::from_value(budget[0].detail.clone().unwrap()).unwrap();
        assert_eq!(stored, detail);

        let by_actor = svc
            .query_audit(&AuditFilter {
                actor: Some("admin".into()),
                ..AuditFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(by_actor.len(), 1);
        assert_eq!(by_actor[0].action, AuditAction::Created);
        assert!(by_actor[0].detail.is_none());
    }

    #[tokio::test]
    async fn limit_applies() {
        let svc = test_service().await;
        for i in 0..5 {
            svc.record_audit::<()>(
                EntityType::Zone,
                &format!("zon-{i:08}"),
                AuditAction::Created,
                ACTOR,
                None,
            )
            .await
            .unwrap();
        }
        let entries = svc
            .query_audit(&AuditFilter {
                limit: Some(3),
                ..AuditFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(entries.len(), 3);
    }
}
