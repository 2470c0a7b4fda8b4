//! The clustering driver.
//!
//! The engine seeds the means once and then repeats
//! assign -> estimate -> check until the total mean shift of an iteration
//! falls below the tolerance (or the optional iteration cap is hit).

use std::fmt;

use log::{debug, info, trace};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use super::assign::Assigner;
use super::config::ClusterConfig;
use super::convergence::{has_converged, mean_shift};
use super::dataset::Dataset;
use super::estimate::estimate;
use super::means::Means;
use crate::error::{Error, Result};

/// Where the engine is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Seeding,
    Assigning,
    Estimating,
    Checking,
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Uninitialized => "uninitialized",
            Phase::Seeding => "seeding",
            Phase::Assigning => "assigning",
            Phase::Estimating => "estimating",
            Phase::Checking => "checking",
            Phase::Done => "done",
        };
        f.write_str(name)
    }
}

/// Final state of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Clustering {
    /// Final mean of each cluster.
    pub means: Means,
    /// Cluster index of each instance, in dataset order.
    pub assignments: Vec<usize>,
    /// Number of assign/estimate/check passes performed.
    pub iterations: usize,
    /// `false` only when the iteration cap stopped the run.
    pub converged: bool,
    /// Total mean shift of the last iteration.
    pub shift: f64,
}

/// K-means engine state for one dataset.
#[derive(Debug)]
pub struct ClusterEngine {
    config: ClusterConfig,
    rng: ChaCha20Rng,
    assigner: Assigner,
    means: Option<Means>,
    previous: Option<Means>,
    assignments: Vec<usize>,
    iteration: usize,
    last_shift: Option<f64>,
    phase: Phase,
}

impl ClusterEngine {
    /// Validates `config` and prepares the random source and worker pool.
    pub fn new(config: ClusterConfig) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => ChaCha20Rng::seed_from_u64(seed),
            None => ChaCha20Rng::from_entropy(),
        };
        let assigner = Assigner::new(config.threads)?;
        Ok(Self {
            config,
            rng,
            assigner,
            means: None,
            previous: None,
            assignments: Vec::new(),
            iteration: 0,
            last_shift: None,
            phase: Phase::Uninitialized,
        })
    }

    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Number of completed iterations.
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// Current means, once seeded.
    pub fn means(&self) -> Option<&Means> {
        self.means.as_ref()
    }

    /// Means as they were before the most recent estimate.
    pub fn previous_means(&self) -> Option<&Means> {
        self.previous.as_ref()
    }

    /// Cluster index per instance; empty until the first assignment pass.
    pub fn assignments(&self) -> &[usize] {
        &self.assignments
    }

    /// Total mean shift of the most recent iteration.
    pub fn last_shift(&self) -> Option<f64> {
        self.last_shift
    }

    fn enter(&mut self, phase: Phase) {
        transition(&mut self.phase, phase, self.iteration);
    }

    /// Chooses the initial means. Only valid before the first iteration.
    pub fn seed(&mut self, data: &Dataset) -> Result<()> {
        if self.phase != Phase::Uninitialized {
            return Err(Error::config(format!(
                "cannot seed an engine in the {} phase",
                self.phase
            )));
        }
        if self.config.k > data.len() {
            return Err(Error::degenerate(format!(
                "k = {} exceeds the instance count {}",
                self.config.k,
                data.len()
            )));
        }

        self.enter(Phase::Seeding);
        let means = self
            .config
            .seeding
            .seed(data, self.config.k, &mut self.rng)?;
        self.previous = Some(means.clone());
        self.means = Some(means);
        self.assignments = vec![0; data.len()];
        self.enter(Phase::Assigning);
        Ok(())
    }

    /// Runs one assign -> estimate -> check pass, seeding first if needed.
    ///
    /// Returns `true` once the mean shift is below the tolerance.
    pub fn iterate(&mut self, data: &Dataset) -> Result<bool> {
        match self.phase {
            Phase::Uninitialized => self.seed(data)?,
            Phase::Done => return Ok(true),
            _ => {}
        }
        let (means, previous) = match (self.means.as_mut(), self.previous.as_mut()) {
            (Some(means), Some(previous)) => (means, previous),
            _ => return Err(Error::config("engine has no means to iterate on")),
        };
        if data.dim() != means.dim() || data.len() != self.assignments.len() {
            return Err(Error::data(format!(
                "dataset shape {}x{} does not match the seeded {}x{}",
                data.len(),
                data.dim(),
                self.assignments.len(),
                means.dim()
            )));
        }

        self.assigner.assign(data, means, &mut self.assignments);

        transition(&mut self.phase, Phase::Estimating, self.iteration);
        previous.copy_from(means);
        let counts = estimate(data, &self.assignments, means);

        transition(&mut self.phase, Phase::Checking, self.iteration);
        let shift = mean_shift(means, previous);
        let done = has_converged(shift, self.config.tolerance);

        debug!(
            "iteration {}: shift {} (tolerance {}), cluster sizes {:?}",
            self.iteration, shift, self.config.tolerance, counts
        );
        self.iteration += 1;
        self.last_shift = Some(shift);
        self.enter(if done { Phase::Done } else { Phase::Assigning });
        Ok(done)
    }

    /// Seeds and iterates until convergence, returning the final state.
    ///
    /// Without an iteration cap this only returns once the tolerance is met.
    pub fn execute(&mut self, data: &Dataset) -> Result<Clustering> {
        info!(
            "clustering {} instances with {} attributes into {} clusters ({} seeding, {} threads)",
            data.len(),
            data.dim(),
            self.config.k,
            self.config.seeding,
            self.assigner.workers()
        );

        let mut converged = self.phase == Phase::Done;
        while !converged {
            converged = self.iterate(data)?;
            if let Some(cap) = self.config.max_iterations {
                if !converged && self.iteration >= cap {
                    info!("stopping after {} iterations without converging", cap);
                    break;
                }
            }
        }

        let means = self
            .means
            .clone()
            .ok_or_else(|| Error::config("engine finished without means"))?;
        info!(
            "finished after {} iterations (converged: {})",
            self.iteration, converged
        );
        Ok(Clustering {
            means,
            assignments: self.assignments.clone(),
            iterations: self.iteration,
            converged,
            shift: self.last_shift.unwrap_or(0.0),
        })
    }
}

fn transition(phase: &mut Phase, to: Phase, iteration: usize) {
    trace!("iteration {}: {} -> {}", iteration, phase, to);
    *phase = to;
}

/// Clusters `data` with a fresh engine.
pub fn kmeans(data: &Dataset, config: ClusterConfig) -> Result<Clustering> {
    ClusterEngine::new(config)?.execute(data)
}
