//! Nearest-mean assignment, optionally split across worker threads.
//!
//! Each instance's assignment depends only on its own attributes and the
//! shared mean matrix, so the index range is cut into contiguous partitions
//! that are processed independently. The result does not depend on how many
//! partitions are used.

use std::ops::Range;

use rayon::{ThreadPool, ThreadPoolBuilder};

use super::dataset::Dataset;
use super::means::Means;
use crate::error::{Error, Result};

/// Splits `0..len` into `workers` contiguous ranges.
///
/// Every range but the last has `len / workers` elements; the last one takes
/// whatever remains, so the ranges cover `0..len` exactly once.
///
/// # Panics
///
/// - If `workers` is 0.
pub fn partition(len: usize, workers: usize) -> Vec<Range<usize>> {
    assert!(workers > 0, "workers must be > 0");
    let per_worker = len / workers;
    let mut start = 0;
    (0..workers)
        .map(|w| {
            let end = if w == workers - 1 {
                len
            } else {
                start + per_worker
            };
            let range = start..end;
            start = end;
            range
        })
        .collect()
}

/// Assigns the instances `offset..offset + out.len()` to their nearest mean.
fn assign_range(data: &Dataset, means: &Means, offset: usize, out: &mut [usize]) {
    for (i, slot) in out.iter_mut().enumerate() {
        *slot = means.nearest(data.attributes(offset + i)).0;
    }
}

/// Runs the assignment step with a fixed number of workers.
///
/// A single worker runs on the calling thread. More than one worker runs on
/// a dedicated thread pool that lives as long as the `Assigner`.
#[derive(Debug)]
pub struct Assigner {
    workers: usize,
    pool: Option<ThreadPool>,
}

impl Assigner {
    pub fn new(workers: usize) -> Result<Self> {
        if workers == 0 {
            return Err(Error::config("thread count must be at least 1"));
        }
        let pool = if workers > 1 {
            Some(
                ThreadPoolBuilder::new()
                    .num_threads(workers)
                    .thread_name(|i| format!("kmeans-assign-{}", i))
                    .build()?,
            )
        } else {
            None
        };
        Ok(Self { workers, pool })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Writes the nearest mean index for every instance into `assignments`.
    ///
    /// Returns only once every partition is done.
    ///
    /// # Panics
    ///
    /// - If `assignments.len()` differs from `data.len()`.
    pub fn assign(&self, data: &Dataset, means: &Means, assignments: &mut [usize]) {
        assert_eq!(
            assignments.len(),
            data.len(),
            "one assignment slot per instance"
        );

        let pool = match &self.pool {
            Some(pool) => pool,
            None => {
                assign_range(data, means, 0, assignments);
                return;
            }
        };

        pool.scope(|s| {
            let mut rest = assignments;
            for range in partition(data.len(), self.workers) {
                let (chunk, tail) = std::mem::take(&mut rest).split_at_mut(range.len());
                rest = tail;
                s.spawn(move |_| assign_range(data, means, range.start, chunk));
            }
        });
    }
}
