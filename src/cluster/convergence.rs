use super::means::Means;

/// Total movement between two consecutive mean matrices.
///
/// This is the sum of `|new - old|` over every `(cluster, attribute)` pair,
/// not a per-cluster distance.
pub fn mean_shift(current: &Means, previous: &Means) -> f64 {
    current.l1_distance(previous)
}

/// Whether a shift is small enough to stop iterating.
///
/// The comparison is strict: with a tolerance of zero the loop never stops
/// on its own, even when no mean moved.
pub fn has_converged(shift: f64, tolerance: f64) -> bool {
    shift < tolerance
}
