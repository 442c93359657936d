use super::{ClusterPoint, Labels, compact_labels};

/// Group name for projects without a barangay.
pub const UNASSIGNED: &str = "unassigned";

/// Baseline grouping: one cluster per barangay (case-insensitive, trimmed).
#[must_use]
pub fn cluster_by_barangay(points: &[ClusterPoint]) -> Labels {
    let mut groups: Vec<String> = Vec::new();
    let raw: Vec<Option<usize>> = points
        .iter()
        .map(|p| {
            let key = p
                .barangay
                .as_deref()
                .map(|b| b.trim().to_lowercase())
                .filter(|b| !b.is_empty())
                .unwrap_or_else(|| UNASSIGNED.to_string());
            let index = groups.iter().position(|g| *g == key).unwrap_or_else(|| {
                groups.push(key);
                groups.len() - 1
            });
            Some(index)
        })
        .collect();
    compact_labels(&raw)
}
