//! Aggregate reports over stored projects and analyses.

use gis_core::responses::{BarangayAnalyticsRow, ZoneAnalyticsRow};

use crate::error::DatabaseError;
use crate::repos::project::ProjectFilter;
use crate::service::GisService;

impl GisService {
    /// Project counts by status and total cost per zone type.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the projects cannot be loaded.
    pub async fn zone_analytics(&self) -> Result<Vec<ZoneAnalyticsRow>, DatabaseError> {
        let projects = self.list_projects(&ProjectFilter::default()).await?;
        Ok(gis_analysis::analytics::zone_analytics(&projects))
    }

    /// Project count and suitability distribution per barangay.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if projects or analyses cannot be loaded.
    pub async fn barangay_analytics(&self) -> Result<Vec<BarangayAnalyticsRow>, DatabaseError> {
        let projects = self.list_projects(&ProjectFilter::default()).await?;
        let analyses = self.list_analyses(None).await?;
        Ok(gis_analysis::analytics::barangay_analytics(&projects, &analyses))
    }
}
