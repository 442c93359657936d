//! Cluster quality metrics.
//!
//! Noise points (`None` labels) are excluded everywhere. Indices that are
//! undefined for the input (fewer than two clusters or fewer than three
//! points) are reported as `0.0`.

use std::collections::HashMap;

use gis_core::entities::AlgorithmMetrics;
use gis_core::enums::ClusteringAlgorithm;

use super::ClusterPoint;

/// Score one labelling.
#[must_use]
pub fn evaluate(
    algorithm: ClusteringAlgorithm,
    points: &[ClusterPoint],
    labels: &[Option<usize>],
    execution_time_secs: f64,
) -> AlgorithmMetrics {
    let members = members(labels);
    AlgorithmMetrics {
        algorithm,
        silhouette_score: silhouette(points, &members),
        zoning_alignment_score: zoning_alignment(points, &members),
        calinski_harabasz_score: calinski_harabasz(points, &members),
        davies_bouldin_score: davies_bouldin(points, &members),
        execution_time_secs,
        cluster_count: members.len(),
        noise_count: labels.iter().filter(|l| l.is_none()).count(),
    }
}

/// Point indices per cluster, in label order.
fn members(labels: &[Option<usize>]) -> Vec<Vec<usize>> {
    let count = labels.iter().flatten().max().map_or(0, |m| m + 1);
    let mut members = vec![Vec::new(); count];
    for (i, label) in labels.iter().enumerate() {
        if let Some(l) = label {
            members[*l].push(i);
        }
    }
    members.retain(|m| !m.is_empty());
    members
}

fn is_degenerate(members: &[Vec<usize>]) -> bool {
    let clustered: usize = members.iter().map(Vec::len).sum();
    members.len() < 2 || clustered < 3
}

/// Mean silhouette over clustered points, great-circle distances.
///
/// Singleton clusters contribute `0`.
#[must_use]
pub fn silhouette(points: &[ClusterPoint], members: &[Vec<usize>]) -> f64 {
    if is_degenerate(members) {
        return 0.0;
    }

    let mut total = 0.0;
    let mut count = 0usize;
    for (ci, cluster) in members.iter().enumerate() {
        for &i in cluster {
            count += 1;
            if cluster.len() < 2 {
                continue;
            }
            let a = mean_distance(points, i, cluster);
            let b = members
                .iter()
                .enumerate()
                .filter(|(cj, _)| *cj != ci)
                .map(|(_, other)| mean_distance(points, i, other))
                .fold(f64::INFINITY, f64::min);
            let denom = a.max(b);
            if denom > 0.0 {
                total += (b - a) / denom;
            }
        }
    }
    #[allow(clippy::cast_precision_loss)]
    let mean = total / count as f64;
    mean
}

/// Mean distance from `i` to the other members of `cluster`.
fn mean_distance(points: &[ClusterPoint], i: usize, cluster: &[usize]) -> f64 {
    let (sum, n) = cluster
        .iter()
        .filter(|&&j| j != i)
        .fold((0.0, 0usize), |(sum, n), &j| (sum + points[i].distance_km(&points[j]), n + 1));
    if n == 0 {
        0.0
    } else {
        #[allow(clippy::cast_precision_loss)]
        let mean = sum / n as f64;
        mean
    }
}

/// Share of zoned points that carry their cluster's majority zone type.
///
/// Equivalent to each cluster's majority share weighted by its zoned size.
/// `0.0` when no clustered point has a zone.
#[must_use]
pub fn zoning_alignment(points: &[ClusterPoint], members: &[Vec<usize>]) -> f64 {
    let mut majority_total = 0usize;
    let mut zoned_total = 0usize;
    for cluster in members {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for &i in cluster {
            if let Some(zone) = points[i].zone_type.as_deref() {
                *counts.entry(zone).or_default() += 1;
            }
        }
        zoned_total += counts.values().sum::<usize>();
        majority_total += counts.values().copied().max().unwrap_or(0);
    }
    if zoned_total == 0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let share = majority_total as f64 / zoned_total as f64;
    share
}

/// Between- over within-cluster dispersion, planar kilometres.
#[must_use]
pub fn calinski_harabasz(points: &[ClusterPoint], members: &[Vec<usize>]) -> f64 {
    if is_degenerate(members) {
        return 0.0;
    }
    let all: Vec<usize> = members.iter().flatten().copied().collect();
    let n = all.len();
    let k = members.len();
    if n <= k {
        return 0.0;
    }
    let overall = centroid(points, &all);

    let mut between = 0.0;
    let mut within = 0.0;
    for cluster in members {
        let c = centroid(points, cluster);
        #[allow(clippy::cast_precision_loss)]
        let size = cluster.len() as f64;
        between += size * squared(c, overall);
        within += cluster
            .iter()
            .map(|&i| squared((points[i].x, points[i].y), c))
            .sum::<f64>();
    }
    if within <= 0.0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let index = (between / (k - 1) as f64) / (within / (n - k) as f64);
    index
}

/// Mean worst-case similarity between clusters; lower is better.
#[must_use]
pub fn davies_bouldin(points: &[ClusterPoint], members: &[Vec<usize>]) -> f64 {
    if is_degenerate(members) {
        return 0.0;
    }
    let centroids: Vec<(f64, f64)> = members.iter().map(|m| centroid(points, m)).collect();
    let scatter: Vec<f64> = members
        .iter()
        .zip(&centroids)
        .map(|(m, &c)| {
            #[allow(clippy::cast_precision_loss)]
            let n = m.len() as f64;
            m.iter()
                .map(|&i| squared((points[i].x, points[i].y), c).sqrt())
                .sum::<f64>()
                / n
        })
        .collect();

    let mut total = 0.0;
    for i in 0..members.len() {
        let worst = (0..members.len())
            .filter(|&j| j != i)
            .filter_map(|j| {
                let separation = squared(centroids[i], centroids[j]).sqrt();
                (separation > 0.0).then(|| (scatter[i] + scatter[j]) / separation)
            })
            .fold(0.0, f64::max);
        total += worst;
    }
    #[allow(clippy::cast_precision_loss)]
    let index = total / members.len() as f64;
    index
}

fn centroid(points: &[ClusterPoint], indices: &[usize]) -> (f64, f64) {
    let (sx, sy) = indices
        .iter()
        .fold((0.0, 0.0), |(sx, sy), &i| (sx + points[i].x, sy + points[i].y));
    #[allow(clippy::cast_precision_loss)]
    let n = indices.len().max(1) as f64;
    (sx / n, sy / n)
}

fn squared(a: (f64, f64), b: (f64, f64)) -> f64 {
    (a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clustering::test_points::{point, two_blobs};

    fn blob_labels() -> Vec<Option<usize>> {
        vec![Some(0), Some(0), Some(0), Some(0), Some(1), Some(1), Some(1), Some(1)]
    }

    #[test]
    fn well_separated_blobs_score_well() {
        let points = two_blobs();
        let m = evaluate(ClusteringAlgorithm::Kmeans, &points, &blob_labels(), 0.01);
        assert!(m.silhouette_score > 0.9, "silhouette {}", m.silhouette_score);
        assert!((m.zoning_alignment_score - 1.0).abs() < 1e-12);
        assert!(m.calinski_harabasz_score > 100.0);
        assert!(m.davies_bouldin_score < 0.1);
        assert_eq!(m.cluster_count, 2);
        assert_eq!(m.noise_count, 0);
    }

    #[test]
    fn single_cluster_is_degenerate() {
        let points = two_blobs();
        let labels = vec![Some(0); points.len()];
        let m = evaluate(ClusteringAlgorithm::Administrative, &points, &labels, 0.0);
        assert!(m.silhouette_score.abs() < f64::EPSILON);
        assert!(m.calinski_harabasz_score.abs() < f64::EPSILON);
        assert!(m.davies_bouldin_score.abs() < f64::EPSILON);
        // Half the points carry the majority zone.
        assert!((m.zoning_alignment_score - 0.5).abs() < 1e-12);
    }

    #[test]
    fn noise_is_excluded_and_counted() {
        let points = two_blobs();
        let mut labels = blob_labels();
        labels[0] = None;
        labels[7] = None;
        let m = evaluate(ClusteringAlgorithm::Dbscan, &points, &labels, 0.0);
        assert_eq!(m.noise_count, 2);
        assert_eq!(m.cluster_count, 2);
        assert!(m.silhouette_score > 0.9);
    }

    #[test]
    fn all_noise_yields_zeros() {
        let points = two_blobs();
        let labels = vec![None; points.len()];
        let m = evaluate(ClusteringAlgorithm::Dbscan, &points, &labels, 0.0);
        assert_eq!(m.cluster_count, 0);
        assert_eq!(m.noise_count, points.len());
        assert!(m.zoning_alignment_score.abs() < f64::EPSILON);
        assert!(m.silhouette_score.abs() < f64::EPSILON);
    }

    #[test]
    fn two_points_are_degenerate() {
        let points = vec![
            point("a", 7.44, 125.80, "A", "R-1"),
            point("b", 7.54, 125.80, "B", "C-1"),
        ];
        let m = evaluate(ClusteringAlgorithm::Kmeans, &points, &[Some(0), Some(1)], 0.0);
        assert!(m.silhouette_score.abs() < f64::EPSILON);
        assert!(m.calinski_harabasz_score.abs() < f64::EPSILON);
        assert!((m.zoning_alignment_score - 1.0).abs() < 1e-12);
    }

    #[test]
    fn unzoned_points_are_ignored_by_alignment() {
        let mut points = two_blobs();
        points[0].zone_type = None;
        points[1].zone_type = Some("R-1".into());
        let members = members(&blob_labels());
        // cluster 0: C-1 x2, R-1 x1 -> 2/3 ; cluster 1: 4/4 -> 6/7 overall
        assert!((zoning_alignment(&points, &members) - 6.0 / 7.0).abs() < 1e-12);
    }
}
