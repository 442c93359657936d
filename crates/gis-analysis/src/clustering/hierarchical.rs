use super::{ClusterPoint, Labels, compact_labels};

/// Agglomerative clustering with average linkage down to `target` clusters.
///
/// Starts from singletons and merges the closest pair (mean great-circle
/// distance between members) until `target` remain. Ties merge the pair with
/// the lowest indices. Cost is cubic in the number of points.
#[must_use]
pub fn average_linkage(points: &[ClusterPoint], target: usize) -> Labels {
    let n = points.len();
    if n == 0 {
        return Vec::new();
    }
    let target = target.clamp(1, n);

    // dist[i][j] between live clusters i and j, updated by Lance–Williams.
    let mut dist = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            let d = points[i].distance_km(&points[j]);
            dist[i][j] = d;
            dist[j][i] = d;
        }
    }

    let mut size = vec![1usize; n];
    let mut alive = vec![true; n];
    let mut owner: Vec<usize> = (0..n).collect();
    let mut clusters = n;

    while clusters > target {
        let mut best: Option<(usize, usize, f64)> = None;
        for i in (0..n).filter(|&i| alive[i]) {
            for j in ((i + 1)..n).filter(|&j| alive[j]) {
                if best.is_none_or(|(_, _, d)| dist[i][j] < d) {
                    best = Some((i, j, dist[i][j]));
                }
            }
        }
        let Some((a, b, _)) = best else { break };

        #[allow(clippy::cast_precision_loss)]
        let (wa, wb) = (size[a] as f64, size[b] as f64);
        for k in (0..n).filter(|&k| alive[k] && k != a && k != b) {
            let merged = wa.mul_add(dist[a][k], wb * dist[b][k]) / (wa + wb);
            dist[a][k] = merged;
            dist[k][a] = merged;
        }
        size[a] += size[b];
        alive[b] = false;
        for o in &mut owner {
            if *o == b {
                *o = a;
            }
        }
        clusters -= 1;
    }

    let raw: Vec<Option<usize>> = owner.into_iter().map(Some).collect();
    compact_labels(&raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clustering::test_points::two_blobs;
    use pretty_assertions::assert_eq;

    #[test]
    fn merges_down_to_two_blobs() {
        assert_eq!(
            average_linkage(&two_blobs(), 2),
            vec![Some(0), Some(0), Some(0), Some(0), Some(1), Some(1), Some(1), Some(1)]
        );
    }

    #[test]
    fn target_above_count_keeps_singletons() {
        let labels = average_linkage(&two_blobs(), 100);
        let distinct: std::collections::HashSet<_> = labels.iter().collect();
        assert_eq!(distinct.len(), 8);
    }

    #[test]
    fn target_one_is_a_single_cluster() {
        assert!(average_linkage(&two_blobs(), 1).iter().all(|l| *l == Some(0)));
    }
}
