use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, warn};

use crate::error::{Error, Result};

/// Label given to instances that carry no classification.
pub const BLANK_LABEL: &str = "BLANK";

/// An ordered, read-only collection of labeled attribute vectors.
///
/// Every instance has exactly `dim` attributes. Values are stored row-major
/// in one buffer so an instance is a borrowed `&[f64]` slice.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    dim: usize,
    values: Vec<f64>,
    labels: Vec<String>,
}

impl Dataset {
    /// Creates an empty dataset whose instances will have `dim` attributes.
    pub fn new(dim: usize) -> Result<Self> {
        if dim == 0 {
            return Err(Error::data("attribute count must be at least 1"));
        }
        Ok(Self {
            dim,
            values: Vec::new(),
            labels: Vec::new(),
        })
    }

    /// Builds a dataset from unlabeled rows; every instance gets [`BLANK_LABEL`].
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        let dim = rows
            .first()
            .map(|r| r.as_ref().len())
            .ok_or_else(|| Error::data("cannot infer attribute count from no rows"))?;
        let mut data = Self::new(dim)?;
        for row in rows {
            data.push(row.as_ref(), BLANK_LABEL)?;
        }
        Ok(data)
    }

    /// Appends one instance. Every attribute must be finite.
    pub fn push<S: Into<String>>(&mut self, attributes: &[f64], label: S) -> Result<()> {
        if attributes.len() != self.dim {
            return Err(Error::data(format!(
                "instance has {} attributes, expected {}",
                attributes.len(),
                self.dim
            )));
        }
        if let Some(pos) = attributes.iter().position(|v| !v.is_finite()) {
            return Err(Error::data(format!(
                "attribute {} is not a finite number ({})",
                pos, attributes[pos]
            )));
        }
        self.values.extend_from_slice(attributes);
        self.labels.push(label.into());
        Ok(())
    }

    /// Number of attributes per instance.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of instances.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Attribute vector of instance `index`.
    pub fn attributes(&self, index: usize) -> &[f64] {
        let start = index * self.dim;
        &self.values[start..start + self.dim]
    }

    pub fn label(&self, index: usize) -> &str {
        &self.labels[index]
    }

    /// Iterates `(attributes, label)` pairs in dataset order.
    pub fn iter(&self) -> impl Iterator<Item = (&[f64], &str)> {
        self.values
            .chunks_exact(self.dim)
            .zip(self.labels.iter().map(String::as_str))
    }

    /// Opens and parses a dataset file.
    pub fn load<P: AsRef<Path>>(path: P, use_labels: bool) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            Error::data(format!("error reading {}: {}", path.display(), e))
        })?;
        Self::parse(BufReader::new(file), use_labels)
    }

    /// Parses the dataset text format.
    ///
    /// The first non-blank line holds the attribute count. Each following
    /// non-blank line is one record of `dim` floats followed, when
    /// `use_labels` is set, by a label token. Records with unparsable or
    /// non-finite values (`nan`, `inf`) are dropped. A record that is too
    /// short is an error unless it is the last one in the input.
    pub fn parse<R: BufRead>(reader: R, use_labels: bool) -> Result<Self> {
        let mut lines = reader
            .lines()
            .enumerate()
            .map(|(i, line)| line.map(|l| (i + 1, l)))
            .filter(|line| !matches!(line, Ok((_, l)) if l.trim().is_empty()));

        let (line_no, header) = match lines.next() {
            Some(line) => line.map_err(|e| Error::data(e.to_string()))?,
            None => return Err(Error::data("missing attribute count")),
        };
        let dim = header
            .split_whitespace()
            .next()
            .and_then(|tok| tok.parse::<usize>().ok())
            .filter(|&d| d > 0)
            .ok_or_else(|| {
                Error::data(format!(
                    "line {}: attribute count must be a positive integer, got {:?}",
                    line_no,
                    header.trim()
                ))
            })?;

        let mut data = Self::new(dim)?;
        let mut record = Vec::with_capacity(dim);
        let mut lines = lines.peekable();
        while let Some(line) = lines.next() {
            let (line_no, text) = line.map_err(|e| Error::data(e.to_string()))?;
            let mut tokens = text.split_whitespace();

            record.clear();
            let mut malformed = false;
            for tok in tokens.by_ref().take(dim) {
                match tok.parse::<f64>() {
                    Ok(v) if v.is_finite() => record.push(v),
                    _ => {
                        malformed = true;
                        record.push(f64::NAN);
                    }
                }
            }

            if record.len() < dim {
                if lines.peek().is_none() {
                    debug!("line {}: dropping incomplete trailing record", line_no);
                    break;
                }
                return Err(Error::data(format!(
                    "line {}: expected {} attributes, found {}",
                    line_no,
                    dim,
                    record.len()
                )));
            }
            if malformed {
                warn!("line {}: dropping record with unparsable or non-finite attributes", line_no);
                continue;
            }

            let label = match tokens.next() {
                Some(label) if use_labels => label,
                _ => BLANK_LABEL,
            };
            data.push(&record, label)?;
        }

        debug!("loaded {} instances with {} attributes", data.len(), dim);
        Ok(data)
    }
}
