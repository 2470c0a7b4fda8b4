//! K-means clustering of labeled multi-attribute vectors.
//!
//! The pipeline is:
//! - [`Dataset`]: the instances to cluster, loaded once and read-only after.
//! - [`Seeding`]: initial means from the first `k` instances or K-means++.
//! - [`Assigner`]: nearest-mean assignment, split across worker threads.
//! - [`estimate`]: recomputes each mean from its members.
//! - [`has_converged`]: stops once the total mean shift is below tolerance.
//! - [`ClusterEngine`]: drives the loop and owns the run state.
//!
//! # Examples
//!
//! ```
//! use kmeans_multi::cluster::{kmeans, ClusterConfig, Dataset, Seeding};
//!
//! let data = Dataset::from_rows(&[[0.0, 0.0], [0.0, 1.0], [10.0, 10.0], [10.0, 11.0]]).unwrap();
//! let config = ClusterConfig::new(2)
//!     .with_seeding(Seeding::FirstK)
//!     .with_tolerance(0.01);
//!
//! let result = kmeans(&data, config).unwrap();
//! assert_eq!(result.assignments, vec![0, 0, 1, 1]);
//! ```

pub mod assign;
pub mod config;
pub mod convergence;
pub mod dataset;
pub mod engine;
pub mod estimate;
pub mod means;
pub mod report;
pub mod seed;

pub use assign::{partition, Assigner};
pub use config::{ClusterConfig, ControlFile};
pub use convergence::{has_converged, mean_shift};
pub use dataset::{Dataset, BLANK_LABEL};
pub use engine::{kmeans, ClusterEngine, Clustering, Phase};
pub use estimate::estimate;
pub use means::{squared_distance, Means};
pub use report::{save_report, write_report, ClusterSummary};
pub use seed::Seeding;

#[cfg(test)]
mod tests;
