//! Zone registry repository.
//!
//! Registry order is insertion order (`rowid`); the detector's first-wins
//! tie-break depends on it.

use chrono::Utc;

use gis_core::entities::ZoningZone;
use gis_core::enums::{AuditAction, EntityType};
use gis_core::ids::PREFIX_ZONE;
use gis_core::responses::ZoneStatistics;
use gis_core::zone_code::normalize_zone_code;

use crate::error::DatabaseError;
use crate::helpers::{get_bool, get_opt_string, parse_datetime, parse_json};
use crate::service::GisService;

const SELECT_COLS: &str =
    "id, zone_type, barangay, location_description, keywords, is_active, created_at";

fn row_to_zone(row: &libsql::Row) -> Result<ZoningZone, DatabaseError> {
    Ok(ZoningZone {
        id: row.get(0)?,
        zone_type: row.get(1)?,
        barangay: row.get(2)?,
        location_description: get_opt_string(row, 3)?,
        keywords: parse_json(&row.get::<String>(4)?)?,
        is_active: get_bool(row, 5)?,
        created_at: parse_datetime(&row.get::<String>(6)?)?,
    })
}

impl GisService {
    /// Register a zone. The zone code is stored in canonical form; blank
    /// keywords are dropped.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Analysis` for an unknown zone code and
    /// `DatabaseError::InvalidState` for an empty barangay.
    pub async fn create_zone(
        &self,
        actor: &str,
        zone_type: &str,
        barangay: &str,
        location_description: Option<&str>,
        keywords: &[String],
    ) -> Result<ZoningZone, DatabaseError> {
        let zone_type = normalize_zone_code(zone_type)
            .ok_or_else(|| gis_analysis::AnalysisError::UnknownZoneCode(zone_type.to_string()))?;
        let barangay = barangay.trim();
        if barangay.is_empty() {
            return Err(DatabaseError::InvalidState(
                "zone barangay must not be empty".into(),
            ));
        }
        let keywords: Vec<String> = keywords
            .iter()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_ZONE).await?;
        let keywords_json = serde_json::to_string(&keywords).map_err(|e| DatabaseError::Other(e.into()))?;

        self.db()
            .conn()
            .execute(
                "INSERT INTO zoning_zones (id, zone_type, barangay, location_description, keywords, is_active, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6)",
                libsql::params![
                    id.as_str(),
                    zone_type,
                    barangay,
                    location_description,
                    keywords_json,
                    now.to_rfc3339()
                ],
            )
            .await?;

        let zone = ZoningZone {
            id: id.clone(),
            zone_type: zone_type.to_string(),
            barangay: barangay.to_string(),
            location_description: location_description.map(String::from),
            keywords,
            is_active: true,
            created_at: now,
        };

        self.record_audit(EntityType::Zone, &id, AuditAction::Created, actor, Some(&zone))
            .await?;

        Ok(zone)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` when no zone has this id.
    pub async fn get_zone(&self, id: &str) -> Result<ZoningZone, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM zoning_zones WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found("zone", id))?;
        row_to_zone(&row)
    }

    /// All zones in registry order. Inactive zones only when asked for.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_zones(&self, include_inactive: bool) -> Result<Vec<ZoningZone>, DatabaseError> {
        let filter = if include_inactive { "" } else { "WHERE is_active = 1" };
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM zoning_zones {filter} ORDER BY rowid"),
                (),
            )
            .await?;
        let mut zones = Vec::new();
        while let Some(row) = rows.next().await? {
            zones.push(row_to_zone(&row)?);
        }
        Ok(zones)
    }

    /// Active zones of one barangay (case-insensitive), ordered by zone type.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn zones_for_barangay(&self, barangay: &str) -> Result<Vec<ZoningZone>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM zoning_zones
                     WHERE is_active = 1 AND lower(trim(barangay)) = lower(trim(?1))
                     ORDER BY zone_type, rowid"
                ),
                [barangay],
            )
            .await?;
        let mut zones = Vec::new();
        while let Some(row) = rows.next().await? {
            zones.push(row_to_zone(&row)?);
        }
        Ok(zones)
    }

    /// Activate or retire a zone. Retired zones stay in the registry but are
    /// ignored by detection and statistics.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` when no zone has this id.
    pub async fn set_zone_active(
        &self,
        actor: &str,
        id: &str,
        is_active: bool,
    ) -> Result<ZoningZone, DatabaseError> {
        let affected = self
            .db()
            .conn()
            .execute(
                "UPDATE zoning_zones SET is_active = ?1 WHERE id = ?2",
                libsql::params![i64::from(is_active), id],
            )
            .await?;
        if affected == 0 {
            return Err(DatabaseError::not_found("zone", id));
        }

        let detail = serde_json::json!({ "is_active": is_active });
        self.record_audit(EntityType::Zone, id, AuditAction::Updated, actor, Some(&detail))
            .await?;

        self.get_zone(id).await
    }

    /// Totals over active zones.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn zone_statistics(&self) -> Result<ZoneStatistics, DatabaseError> {
        let zones = self.list_zones(false).await?;
        Ok(gis_analysis::analytics::zone_statistics(&zones))
    }
}
