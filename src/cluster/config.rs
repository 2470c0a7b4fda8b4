use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::warn;

use super::seed::Seeding;
use crate::error::{Error, Result};

/// Configuration options for a clustering run.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterConfig {
    /// Number of clusters to find.
    pub k: usize,
    /// Stop once the total mean movement of an iteration is below this.
    pub tolerance: f64,
    /// How the initial means are chosen.
    pub seeding: Seeding,
    /// Seed for K-means++ sampling. `None` seeds from entropy.
    pub seed: Option<u64>,
    /// Number of workers used by the assignment step.
    pub threads: usize,
    /// Read a label after each record's attributes.
    pub use_labels: bool,
    /// Optional cap on the number of iterations. `None` iterates until the
    /// tolerance is met.
    pub max_iterations: Option<usize>,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            k: 1,
            tolerance: 0.1,
            seeding: Seeding::PlusPlus,
            seed: None,
            threads: 1,
            use_labels: false,
            max_iterations: None,
        }
    }
}

impl ClusterConfig {
    /// Create a new config for `k` clusters with default values for everything else.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            ..Self::default()
        }
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_seeding(mut self, seeding: Seeding) -> Self {
        self.seeding = seeding;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_labels(mut self, use_labels: bool) -> Self {
        self.use_labels = use_labels;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = Some(max_iterations);
        self
    }

    /// Checks the ranges of every field.
    pub fn validate(&self) -> Result<()> {
        if self.k == 0 {
            return Err(Error::config("k must be at least 1"));
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(Error::config(format!(
                "tolerance must be a finite value >= 0, got {}",
                self.tolerance
            )));
        }
        if self.threads == 0 {
            return Err(Error::config("thread count must be at least 1"));
        }
        if self.max_iterations == Some(0) {
            return Err(Error::config("max iterations must be at least 1"));
        }
        Ok(())
    }
}

/// Settings read from a control file: the run configuration plus the input
/// and output paths.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlFile {
    pub input: PathBuf,
    pub output: PathBuf,
    pub cluster: ClusterConfig,
}

impl Default for ControlFile {
    fn default() -> Self {
        Self {
            input: PathBuf::from("default_in.dat"),
            output: PathBuf::from("default_out.txt"),
            cluster: ClusterConfig::default(),
        }
    }
}

impl ControlFile {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            Error::config(format!("error reading the file {}: {}", path.display(), e))
        })?;
        Self::parse(&text)
    }

    /// Parses `<directive> <value>` pairs separated by whitespace.
    ///
    /// Directives may appear in any order; later ones override earlier ones.
    /// Parsing stops at `#EOF` or at the end of the text. Unknown directives
    /// are skipped with a warning.
    pub fn parse(text: &str) -> Result<Self> {
        let mut control = Self::default();
        let mut tokens = text.split_whitespace();

        while let Some(directive) = tokens.next() {
            let cfg = &mut control.cluster;
            match directive {
                "#EOF" => break,
                "#k-count" => cfg.k = value(directive, tokens.next())?,
                "#input-filename" => control.input = PathBuf::from(raw(directive, tokens.next())?),
                "#output-filename" => {
                    control.output = PathBuf::from(raw(directive, tokens.next())?)
                }
                "#use-labels" => cfg.use_labels = flag(directive, tokens.next())?,
                "#tolerance" => cfg.tolerance = value(directive, tokens.next())?,
                "#plus-plus" => {
                    cfg.seeding = if flag(directive, tokens.next())? {
                        Seeding::PlusPlus
                    } else {
                        Seeding::FirstK
                    }
                }
                "#seeding" => cfg.seeding = raw(directive, tokens.next())?.parse()?,
                "#plus-plus-random-seed" => cfg.seed = Some(value(directive, tokens.next())?),
                "#num-threads" => cfg.threads = value(directive, tokens.next())?,
                "#max-iterations" => cfg.max_iterations = Some(value(directive, tokens.next())?),
                other => warn!("Unrecognized directive in control file: {}", other),
            }
        }

        Ok(control)
    }
}

fn raw<'a>(directive: &str, token: Option<&'a str>) -> Result<&'a str> {
    token.ok_or_else(|| Error::config(format!("{} is missing its value", directive)))
}

fn value<T: FromStr>(directive: &str, token: Option<&str>) -> Result<T> {
    let token = raw(directive, token)?;
    token
        .parse()
        .map_err(|_| Error::config(format!("{} has an invalid value '{}'", directive, token)))
}

fn flag(directive: &str, token: Option<&str>) -> Result<bool> {
    match raw(directive, token)? {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        other => Err(Error::config(format!(
            "{} expects 1 or 0, got '{}'",
            directive, other
        ))),
    }
}
