use log::warn;

use super::dataset::Dataset;
use super::means::Means;

/// Recomputes every mean from the instances currently assigned to it.
///
/// A cluster with no members is reset to the all-zero vector. Returns the
/// member count of each cluster.
///
/// # Panics
///
/// - If `assignments` and `data` differ in length, or an assignment is not a
///   valid cluster index for `means`.
pub fn estimate(data: &Dataset, assignments: &[usize], means: &mut Means) -> Vec<usize> {
    assert_eq!(assignments.len(), data.len(), "one assignment per instance");
    let k = means.k();
    let mut counts = vec![0_usize; k];
    let mut sums = Means::zeros(k, means.dim());

    for (point, &cluster) in data.iter().map(|(a, _)| a).zip(assignments) {
        counts[cluster] += 1;
        for (s, &x) in sums.row_mut(cluster).iter_mut().zip(point) {
            *s += x;
        }
    }

    for (cluster, &count) in counts.iter().enumerate() {
        let mean = means.row_mut(cluster);
        if count == 0 {
            warn!("cluster {} has no members; resetting its mean to the origin", cluster);
            mean.fill(0.0);
            continue;
        }
        for (m, &s) in mean.iter_mut().zip(sums.row(cluster)) {
            *m = s / count as f64;
        }
    }

    counts
}
