use super::{ClusterPoint, Labels, compact_labels};

/// Lloyd's k-means on planar kilometres with farthest-point seeding.
///
/// Seeding starts from the first point and repeatedly adds the point farthest
/// from every chosen centre, so the result is deterministic. `k` is capped at
/// the number of points.
#[must_use]
pub fn kmeans(points: &[ClusterPoint], k: usize, max_iterations: usize) -> Labels {
    if points.is_empty() || k == 0 {
        return vec![None; points.len()];
    }
    let k = k.min(points.len());
    let coords: Vec<[f64; 2]> = points.iter().map(|p| [p.x, p.y]).collect();

    let mut centers: Vec<[f64; 2]> = Vec::with_capacity(k);
    centers.push(coords[0]);
    while centers.len() < k {
        let mut best_idx = 0;
        let mut best_dist = -1.0;
        for (i, c) in coords.iter().enumerate() {
            let min_dist = centers
                .iter()
                .map(|ctr| squared(c, ctr))
                .fold(f64::INFINITY, f64::min);
            if min_dist > best_dist {
                best_dist = min_dist;
                best_idx = i;
            }
        }
        centers.push(coords[best_idx]);
    }

    let mut assignments: Vec<Option<usize>> = vec![None; coords.len()];
    for _ in 0..max_iterations.max(1) {
        let mut changed = false;
        for (i, c) in coords.iter().enumerate() {
            let nearest = nearest(c, &centers);
            if assignments[i] != Some(nearest) {
                assignments[i] = Some(nearest);
                changed = true;
            }
        }
        if !changed {
            break;
        }

        let mut sums = vec![[0.0, 0.0]; k];
        let mut counts = vec![0usize; k];
        for (c, cluster) in coords.iter().zip(&assignments) {
            if let Some(cluster) = *cluster {
                sums[cluster][0] += c[0];
                sums[cluster][1] += c[1];
                counts[cluster] += 1;
            }
        }
        for (center, (sum, count)) in centers.iter_mut().zip(sums.iter().zip(&counts)) {
            // Empty clusters keep their previous centre.
            if *count > 0 {
                #[allow(clippy::cast_precision_loss)]
                let n = *count as f64;
                *center = [sum[0] / n, sum[1] / n];
            }
        }
    }

    compact_labels(&assignments)
}

fn nearest(point: &[f64; 2], centers: &[[f64; 2]]) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (j, ctr) in centers.iter().enumerate() {
        let d = squared(point, ctr);
        if d < best_dist {
            best_dist = d;
            best = j;
        }
    }
    best
}

fn squared(a: &[f64; 2], b: &[f64; 2]) -> f64 {
    (a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clustering::test_points::{point, two_blobs};
    use pretty_assertions::assert_eq;

    #[test]
    fn separates_two_blobs() {
        let labels = kmeans(&two_blobs(), 2, 100);
        assert_eq!(
            labels,
            vec![Some(0), Some(0), Some(0), Some(0), Some(1), Some(1), Some(1), Some(1)]
        );
    }

    #[test]
    fn k_is_capped_at_point_count() {
        let points = vec![
            point("a", 7.44, 125.80, "A", "R-1"),
            point("b", 7.54, 125.80, "B", "R-1"),
        ];
        let labels = kmeans(&points, 10, 100);
        assert_eq!(labels, vec![Some(0), Some(1)]);
    }

    #[test]
    fn deterministic() {
        let points = two_blobs();
        assert_eq!(kmeans(&points, 3, 50), kmeans(&points, 3, 50));
    }

    #[test]
    fn empty_input() {
        assert!(kmeans(&[], 3, 10).is_empty());
    }
}
