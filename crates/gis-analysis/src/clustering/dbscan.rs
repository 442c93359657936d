use std::collections::VecDeque;

use super::{ClusterPoint, Labels, compact_labels};

/// Density-based clustering with a great-circle radius.
///
/// A point with at least `min_samples` neighbours within `eps_km` (itself
/// included) is a core point. Points reachable from no core point are noise
/// (`None`).
#[must_use]
pub fn dbscan(points: &[ClusterPoint], eps_km: f64, min_samples: usize) -> Labels {
    let n = points.len();
    let mut labels: Vec<Option<usize>> = vec![None; n];
    let mut visited = vec![false; n];
    let mut cluster = 0;

    for i in 0..n {
        if visited[i] {
            continue;
        }
        visited[i] = true;

        let neighbors = region_query(points, i, eps_km);
        if neighbors.len() < min_samples {
            continue;
        }

        labels[i] = Some(cluster);
        let mut seeds: VecDeque<usize> = neighbors.into();
        while let Some(q) = seeds.pop_front() {
            if labels[q].is_none() {
                labels[q] = Some(cluster);
            }
            if visited[q] {
                continue;
            }
            visited[q] = true;

            let q_neighbors = region_query(points, q, eps_km);
            if q_neighbors.len() >= min_samples {
                seeds.extend(q_neighbors);
            }
        }
        cluster += 1;
    }

    compact_labels(&labels)
}

fn region_query(points: &[ClusterPoint], idx: usize, eps_km: f64) -> Vec<usize> {
    let origin = &points[idx];
    points
        .iter()
        .enumerate()
        .filter(|(_, p)| origin.distance_km(p) <= eps_km)
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clustering::test_points::{point, two_blobs};
    use pretty_assertions::assert_eq;

    #[test]
    fn finds_blobs_and_noise() {
        let mut points = two_blobs();
        points.push(point("lonely", 7.70, 125.95, "Far", "AGRO"));
        let labels = dbscan(&points, 1.0, 3);
        assert_eq!(
            labels,
            vec![
                Some(0),
                Some(0),
                Some(0),
                Some(0),
                Some(1),
                Some(1),
                Some(1),
                Some(1),
                None
            ]
        );
    }

    #[test]
    fn tiny_radius_makes_everything_noise() {
        let labels = dbscan(&two_blobs(), 0.01, 2);
        assert!(labels.iter().all(Option::is_none));
    }

    #[test]
    fn huge_radius_makes_one_cluster() {
        let labels = dbscan(&two_blobs(), 50.0, 2);
        assert!(labels.iter().all(|l| *l == Some(0)));
    }
}
