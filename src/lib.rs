pub mod cluster;
pub mod error;

pub use cluster::{kmeans, ClusterConfig, ClusterEngine, Clustering, Dataset, Seeding};
pub use error::{Error, Result};
