use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::warn;

use super::dataset::Dataset;
use super::engine::Clustering;
use crate::error::Result;

/// One cluster of a finished run.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterSummary<'a> {
    pub index: usize,
    pub mean: &'a [f64],
    /// Member instance indices in dataset order.
    pub members: Vec<usize>,
}

impl ClusterSummary<'_> {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl Clustering {
    /// Groups instances by cluster, in cluster index order.
    pub fn clusters(&self) -> Vec<ClusterSummary<'_>> {
        let mut members = vec![Vec::new(); self.means.k()];
        for (instance, &cluster) in self.assignments.iter().enumerate() {
            members[cluster].push(instance);
        }
        members
            .into_iter()
            .enumerate()
            .map(|(index, members)| ClusterSummary {
                index,
                mean: self.means.row(index),
                members,
            })
            .collect()
    }
}

/// Writes the text report for `result`.
///
/// Each cluster gets a header with its mean and member count, then one line
/// per member with its attributes and label, then a blank line.
pub fn write_report<W: Write>(out: &mut W, result: &Clustering, data: &Dataset) -> Result<()> {
    let clusters = result.clusters();
    if clusters.is_empty() {
        warn!("No clusters to send to output!");
        return Ok(());
    }

    for cluster in &clusters {
        write!(out, "Cluster #{} with mean ", cluster.index + 1)?;
        for value in cluster.mean {
            write!(out, "{} ", value)?;
        }
        writeln!(out, " and member count {}", cluster.len())?;

        for &member in &cluster.members {
            for value in data.attributes(member) {
                write!(out, "{} ", value)?;
            }
            writeln!(out, " {}", data.label(member))?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Creates (or truncates) `path` and writes the report into it.
pub fn save_report<P: AsRef<Path>>(path: P, result: &Clustering, data: &Dataset) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_report(&mut out, result, data)?;
    out.flush()?;
    Ok(())
}
