//! Error types shared by every clustering phase.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can stop a clustering run.
#[derive(Debug, Error)]
pub enum Error {
    /// A control directive is missing, malformed or out of range.
    #[error("configuration error: {0}")]
    Config(String),

    /// The dataset could not be opened or its shape could not be established.
    #[error("data error: {0}")]
    Data(String),

    /// The dataset cannot support the requested number of clusters.
    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    /// Writing results failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The assignment worker pool could not be started.
    #[error(transparent)]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl Error {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    pub fn data<S: Into<String>>(msg: S) -> Self {
        Error::Data(msg.into())
    }

    pub fn degenerate<S: Into<String>>(msg: S) -> Self {
        Error::DegenerateInput(msg.into())
    }
}
