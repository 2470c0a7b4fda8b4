//! Initial mean selection.
//!
//! Two strategies are available:
//! - First-K: the first `k` instances, in dataset order, become the means.
//! - K-means++: the first instance is taken, then each further mean is drawn
//!   with probability proportional to its squared distance from the nearest
//!   mean chosen so far.

use std::fmt;
use std::str::FromStr;

use log::trace;
use rand::Rng;

use super::dataset::Dataset;
use super::means::{squared_distance, Means};
use crate::error::{Error, Result};

/// How the initial means are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Seeding {
    /// Use instances `0..k` verbatim.
    FirstK,
    /// Weighted sampling by squared distance to the nearest chosen mean.
    #[default]
    PlusPlus,
}

impl Seeding {
    /// Produces `k` initial means from `data`.
    ///
    /// `rng` is only consumed by [`Seeding::PlusPlus`].
    pub fn seed<R: Rng>(&self, data: &Dataset, k: usize, rng: &mut R) -> Result<Means> {
        match self {
            Seeding::FirstK => first_k(data, k),
            Seeding::PlusPlus => plus_plus(data, k, rng),
        }
    }
}

impl fmt::Display for Seeding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seeding::FirstK => write!(f, "first-k"),
            Seeding::PlusPlus => write!(f, "k-means++"),
        }
    }
}

impl FromStr for Seeding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "first-k" | "first" | "plain" => Ok(Seeding::FirstK),
            "k-means++" | "kmeans++" | "plus-plus" => Ok(Seeding::PlusPlus),
            other => Err(Error::config(format!("unknown seeding mode '{}'", other))),
        }
    }
}

fn check_size(data: &Dataset, k: usize) -> Result<()> {
    if k == 0 {
        return Err(Error::degenerate("cannot seed zero clusters"));
    }
    if k > data.len() {
        return Err(Error::degenerate(format!(
            "k = {} exceeds the instance count {}",
            k,
            data.len()
        )));
    }
    Ok(())
}

/// Takes instances `0..k` as the initial means.
pub fn first_k(data: &Dataset, k: usize) -> Result<Means> {
    check_size(data, k)?;
    let mut means = Means::zeros(k, data.dim());
    for c in 0..k {
        means.row_mut(c).copy_from_slice(data.attributes(c));
    }
    Ok(means)
}

/// K-means++ seeding.
///
/// Instance 0 is always the first mean. For every later slot, each unchosen
/// instance is weighted by its squared distance to the nearest chosen mean, a
/// value is drawn uniformly from `[0, total)`, and the unchosen instances are
/// walked in index order subtracting their weight until the value drops to
/// zero or below.
///
/// Fails with [`Error::DegenerateInput`] when the summed weights are not
/// finite, e.g. when squared distances overflow `f64`.
pub fn plus_plus<R: Rng>(data: &Dataset, k: usize, rng: &mut R) -> Result<Means> {
    check_size(data, k)?;
    let n = data.len();
    let mut means = Means::zeros(k, data.dim());
    let mut chosen = vec![false; n];
    // Squared distance from each instance to its nearest chosen mean.
    let mut nearest = vec![f64::INFINITY; n];

    means.row_mut(0).copy_from_slice(data.attributes(0));
    chosen[0] = true;
    trace!("k-means++ picked instance 0 for cluster 0");

    for slot in 1..k {
        let latest = means.row(slot - 1);
        let mut total = 0.0;
        for i in 0..n {
            if chosen[i] {
                continue;
            }
            let d = squared_distance(data.attributes(i), latest);
            if d < nearest[i] {
                nearest[i] = d;
            }
            total += nearest[i];
        }

        if !total.is_finite() {
            return Err(Error::degenerate(format!(
                "k-means++ weights overflow for cluster {} (total weight {})",
                slot, total
            )));
        }
        let mut remaining = if total > 0.0 {
            rng.gen_range(0.0..total)
        } else {
            0.0
        };
        let mut pick = None;
        for i in (0..n).filter(|&i| !chosen[i]) {
            remaining -= nearest[i];
            // Kept up to date so rounding that never reaches zero still
            // lands on the last candidate.
            pick = Some(i);
            if remaining <= 0.0 {
                break;
            }
        }

        // `k <= n` leaves at least one unchosen instance per slot.
        let pick = pick.ok_or_else(|| Error::degenerate("no instances left to seed from"))?;
        chosen[pick] = true;
        means.row_mut(slot).copy_from_slice(data.attributes(pick));
        trace!(
            "k-means++ picked instance {} for cluster {} (total weight {})",
            pick,
            slot,
            total
        );
    }

    Ok(means)
}
