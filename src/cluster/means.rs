/// A `k x dim` matrix of cluster centroids stored row-major.
///
/// Row `c` is the mean vector of cluster `c`. The shape is fixed when the
/// matrix is created and every row always has exactly `dim` entries.
#[derive(Debug, Clone, PartialEq)]
pub struct Means {
    k: usize,
    dim: usize,
    values: Vec<f64>,
}

impl Means {
    /// Creates `k` all-zero mean vectors of length `dim`.
    ///
    /// # Panics
    ///
    /// - If `dim` is 0.
    pub fn zeros(k: usize, dim: usize) -> Self {
        assert!(dim > 0, "mean vectors must have at least one attribute");
        Self {
            k,
            dim,
            values: vec![0.0; k * dim],
        }
    }

    /// Number of clusters.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Length of every mean vector.
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn row(&self, cluster: usize) -> &[f64] {
        let start = cluster * self.dim;
        &self.values[start..start + self.dim]
    }

    pub fn row_mut(&mut self, cluster: usize) -> &mut [f64] {
        let start = cluster * self.dim;
        &mut self.values[start..start + self.dim]
    }

    /// Iterates the mean vectors in cluster index order.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.values.chunks_exact(self.dim)
    }

    /// Overwrites this matrix with `other` without reallocating.
    ///
    /// # Panics
    ///
    /// - If the two matrices have different shapes.
    pub fn copy_from(&mut self, other: &Means) {
        assert_eq!(
            (self.k, self.dim),
            (other.k, other.dim),
            "mean matrices must share a shape"
        );
        self.values.copy_from_slice(&other.values);
    }

    /// Sum of absolute differences over every `(cluster, attribute)` pair.
    ///
    /// This is the L1 distance between the two flattened matrices, so it grows
    /// with `k * dim` for the same per-entry movement.
    pub fn l1_distance(&self, other: &Means) -> f64 {
        self.values
            .iter()
            .zip(other.values.iter())
            .map(|(a, b)| (a - b).abs())
            .sum()
    }

    /// Index of the nearest mean to `point` under squared Euclidean distance,
    /// together with that distance.
    ///
    /// Ties go to the lowest cluster index: a later mean only replaces the
    /// running best on a strict improvement.
    pub fn nearest(&self, point: &[f64]) -> (usize, f64) {
        let mut best_cluster = 0;
        let mut best_dist = f64::INFINITY;
        for (cluster, mean) in self.rows().enumerate() {
            let dist = squared_distance(point, mean);
            if cluster == 0 || dist < best_dist {
                best_cluster = cluster;
                best_dist = dist;
            }
        }
        (best_cluster, best_dist)
    }
}

/// Squared Euclidean distance between two vectors of the same length.
/// No square root is taken since callers only compare distances.
pub fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .fold(0.0, |acc, (&x, &y)| acc + (x - y) * (x - y))
}
