use gis_core::enums::ProjectStatus;
use gis_core::zone_code::normalize_zone_code;
use gis_db::repos::project::ProjectFilter;

use crate::cli::GlobalFlags;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

pub struct ListFilters<'a> {
    pub barangay: Option<&'a str>,
    pub status: Option<&'a str>,
    pub zone: Option<&'a str>,
    pub project_type: Option<&'a str>,
    pub engineer: Option<&'a str>,
    pub limit: Option<u32>,
}

pub async fn run(filters: &ListFilters<'_>, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let filter = build_filter(filters, effective_limit(filters.limit, flags.limit, ctx.default_limit()))?;

    // An engineer listing is their projection of each project.
    if let Some(engineer) = filters.engineer {
        if filter_is_engineer_only(filters) {
            let views = ctx.service.engineer_projects(engineer).await?;
            return output(&views, flags.format);
        }
    }

    let projects = ctx.service.list_projects(&filter).await?;
    output(&projects, flags.format)
}

fn filter_is_engineer_only(filters: &ListFilters<'_>) -> bool {
    filters.barangay.is_none()
        && filters.status.is_none()
        && filters.zone.is_none()
        && filters.project_type.is_none()
}

fn build_filter(filters: &ListFilters<'_>, limit: u32) -> anyhow::Result<ProjectFilter> {
    let zone_type = filters
        .zone
        .map(|zone| {
            normalize_zone_code(zone)
                .map(str::to_string)
                .ok_or_else(|| anyhow::anyhow!("unknown zone code '{zone}'"))
        })
        .transpose()?;

    Ok(ProjectFilter {
        barangay: filters.barangay.map(str::to_string),
        status: filters
            .status
            .map(|value| parse_enum::<ProjectStatus>(value, "status"))
            .transpose()?,
        zone_type,
        project_type: filters.project_type.map(str::to_string),
        engineer: filters.engineer.map(str::to_string),
        with_coordinates: false,
        limit: Some(limit),
    })
}

#[cfg(test)]
mod tests {
    use gis_core::enums::ProjectStatus;

    use super::{ListFilters, build_filter};

    fn empty() -> ListFilters<'static> {
        ListFilters {
            barangay: None,
            status: None,
            zone: None,
            project_type: None,
            engineer: None,
            limit: None,
        }
    }

    #[test]
    fn zone_filter_is_normalized() {
        let filters = ListFilters {
            zone: Some("c1"),
            status: Some("in-progress"),
            ..empty()
        };
        let filter = build_filter(&filters, 20).expect("filter should build");
        assert_eq!(filter.zone_type.as_deref(), Some("C-1"));
        assert_eq!(filter.status, Some(ProjectStatus::InProgress));
        assert_eq!(filter.limit, Some(20));
    }

    #[test]
    fn unknown_zone_is_rejected() {
        let filters = ListFilters {
            zone: Some("Z-9"),
            ..empty()
        };
        assert!(build_filter(&filters, 20).is_err());
    }
}
