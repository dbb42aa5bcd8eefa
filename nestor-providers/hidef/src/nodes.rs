//! Parser for the HiDeF `.nodes` output.
//!
//! Each non-empty line reads `Cluster<L>-<I>\t<size>\t<members>\t<persistence>`
//! where `<members>` is a space-separated list of node ids and `L` is the
//! resolution level, `0` being the coarsest.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use nestor_core::{LevelOrder, NodeId, RawCluster, RawClustering};

use crate::errors::{HidefError, NodesFormatError};

const CLUSTER_PREFIX: &str = "Cluster";

/// Parses `.nodes` content into clusters grouped by level.
///
/// # Errors
/// Returns [`NodesFormatError`] for the first line that cannot be read or
/// interpreted.
///
/// # Examples
/// ```
/// use nestor_providers_hidef::parse_nodes;
///
/// let text = "Cluster0-0\t4\t1 2 3 4\t12\nCluster1-0\t2\t1 2\t5\n";
/// let clustering = parse_nodes(text.as_bytes())?;
/// assert_eq!(clustering.level_count(), 2);
/// assert_eq!(clustering.levels()[1][0].persistence(), Some(5));
/// # Ok::<(), nestor_providers_hidef::NodesFormatError>(())
/// ```
pub fn parse_nodes<R: BufRead>(reader: R) -> Result<RawClustering, NodesFormatError> {
    let mut clusters = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let number = index + 1;
        let text = line.map_err(|error| NodesFormatError {
            line: number,
            reason: error.to_string(),
        })?;
        if text.trim().is_empty() {
            continue;
        }
        clusters.push(parse_line(&text).map_err(|reason| NodesFormatError {
            line: number,
            reason,
        })?);
    }
    Ok(RawClustering::from_clusters(clusters, LevelOrder::CoarseToFine))
}

/// Reads and parses the `.nodes` file at `path`.
///
/// # Errors
/// Returns [`HidefError::MissingOutput`] when the file does not exist,
/// [`HidefError::Read`] when it cannot be opened, and
/// [`HidefError::Format`] when a line is malformed.
pub fn parse_nodes_file(path: &Path) -> Result<RawClustering, HidefError> {
    if !path.is_file() {
        return Err(HidefError::MissingOutput {
            path: path.to_path_buf(),
        });
    }
    let file = File::open(path).map_err(|source| HidefError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_nodes(BufReader::new(file)).map_err(|source| HidefError::Format {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_line(text: &str) -> Result<RawCluster, String> {
    let mut fields = text.trim_end().split('\t');
    let name = fields.next().unwrap_or_default();
    let level = cluster_level(name)?;
    let size: usize = fields
        .next()
        .ok_or("missing size column")?
        .trim()
        .parse()
        .map_err(|_| format!("size of `{name}` is not a count"))?;
    let members = fields
        .next()
        .ok_or("missing member column")?
        .split_whitespace()
        .map(|member| {
            member
                .parse::<NodeId>()
                .map_err(|_| format!("member `{member}` is not a node id"))
        })
        .collect::<Result<Vec<NodeId>, String>>()?;
    let mut cluster = RawCluster::new(level, members).with_label(name);
    if cluster.len() != size {
        return Err(format!(
            "`{name}` declares {size} members but lists {}",
            cluster.len()
        ));
    }
    if let Some(raw) = fields.next().map(str::trim).filter(|raw| !raw.is_empty()) {
        let persistence = raw
            .parse()
            .map_err(|_| format!("persistence of `{name}` is not an integer"))?;
        cluster = cluster.with_persistence(persistence);
    }
    Ok(cluster)
}

/// Extracts `L` from `Cluster<L>-<I>`.
fn cluster_level(name: &str) -> Result<usize, String> {
    name.strip_prefix(CLUSTER_PREFIX)
        .and_then(|rest| rest.split_once('-'))
        .filter(|(_, index)| index.parse::<usize>().is_ok())
        .and_then(|(level, _)| level.parse().ok())
        .ok_or_else(|| format!("`{name}` is not a HiDeF cluster name"))
}
