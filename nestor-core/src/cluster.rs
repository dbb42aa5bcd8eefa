//! Raw multi-resolution clusterings and the producer seam that yields them.
//!
//! The clustering algorithm itself is external. A [`ClusterProducer`] receives
//! the edge lists written by the edge extractor plus the resolution
//! parameters and returns a [`RawClustering`]: one group of raw clusters per
//! resolution level, ordered from coarse to fine.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::Arc,
};

use thiserror::Error;

use crate::{error::define_error_codes, network::NodeId};

/// A cluster reported by the producer at a single resolution level.
///
/// # Examples
/// ```
/// use nestor_core::RawCluster;
///
/// let cluster = RawCluster::new(0, [1, 2, 3]).with_label("Cluster0-0");
/// assert_eq!(cluster.len(), 3);
/// assert_eq!(cluster.label(), Some("Cluster0-0"));
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RawCluster {
    members: BTreeSet<NodeId>,
    level: usize,
    label: Option<String>,
    persistence: Option<u32>,
}

impl RawCluster {
    /// Creates a cluster at `level` with the given members.
    #[must_use]
    pub fn new(level: usize, members: impl IntoIterator<Item = NodeId>) -> Self {
        Self {
            members: members.into_iter().collect(),
            level,
            label: None,
            persistence: None,
        }
    }

    /// Attaches the producer's label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Attaches the producer's persistence score.
    #[must_use]
    pub fn with_persistence(mut self, persistence: u32) -> Self {
        self.persistence = Some(persistence);
        self
    }

    /// Returns the member node ids.
    #[must_use]
    pub fn members(&self) -> &BTreeSet<NodeId> {
        &self.members
    }

    /// Returns the resolution level, `0` being the coarsest.
    #[must_use]
    pub fn level(&self) -> usize {
        self.level
    }

    /// Returns the producer label, if any.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Returns the persistence score, if any.
    #[must_use]
    pub fn persistence(&self) -> Option<u32> {
        self.persistence
    }

    /// Returns the number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns whether the cluster has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub(crate) fn into_parts(self) -> (BTreeSet<NodeId>, Option<String>, Option<u32>) {
        (self.members, self.label, self.persistence)
    }
}

/// Order in which the producer listed its resolution levels.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LevelOrder {
    /// The first group is the coarsest.
    #[default]
    CoarseToFine,
    /// The first group is the finest.
    FineToCoarse,
}

/// Raw clusters grouped by resolution level, coarsest first.
///
/// # Examples
/// ```
/// use nestor_core::{LevelOrder, RawCluster, RawClustering};
///
/// let clustering = RawClustering::new(
///     vec![
///         vec![RawCluster::new(0, [1, 2])],
///         vec![RawCluster::new(1, [1, 2, 3, 4])],
///     ],
///     LevelOrder::FineToCoarse,
/// );
/// assert_eq!(clustering.level_count(), 2);
/// assert_eq!(clustering.levels()[0][0].len(), 4);
/// assert_eq!(clustering.levels()[0][0].level(), 0);
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RawClustering {
    levels: Vec<Vec<RawCluster>>,
}

impl RawClustering {
    /// Builds a clustering from groups listed in `order`.
    ///
    /// Levels are renumbered so that the coarsest group is level `0`.
    #[must_use]
    pub fn new(mut levels: Vec<Vec<RawCluster>>, order: LevelOrder) -> Self {
        if order == LevelOrder::FineToCoarse {
            levels.reverse();
        }
        for (level, group) in levels.iter_mut().enumerate() {
            for cluster in group {
                cluster.level = level;
            }
        }
        Self { levels }
    }

    /// Groups loose clusters by their reported level.
    ///
    /// Reported levels are only used for ordering; gaps are closed so the
    /// result has contiguous levels starting at `0`. Within a level the
    /// input order is kept.
    #[must_use]
    pub fn from_clusters(clusters: impl IntoIterator<Item = RawCluster>, order: LevelOrder) -> Self {
        let mut grouped: BTreeMap<usize, Vec<RawCluster>> = BTreeMap::new();
        for cluster in clusters {
            grouped.entry(cluster.level).or_default().push(cluster);
        }
        Self::new(grouped.into_values().collect(), order)
    }

    /// Returns a clustering with no levels.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the level groups, coarsest first.
    #[must_use]
    pub fn levels(&self) -> &[Vec<RawCluster>] {
        &self.levels
    }

    /// Returns the number of levels.
    #[must_use]
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Returns the total number of clusters across levels.
    #[must_use]
    pub fn cluster_count(&self) -> usize {
        self.levels.iter().map(Vec::len).sum()
    }

    /// Returns whether no clusters were produced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.iter().all(Vec::is_empty)
    }

    pub(crate) fn into_levels(self) -> Vec<Vec<RawCluster>> {
        self.levels
    }
}

/// Resolution parameters handed to the producer untouched.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolutionParams {
    /// Community detection algorithm name.
    pub algorithm: String,
    /// Maximum resolution parameter.
    pub max_resolution: f64,
    /// Persistence threshold.
    pub k: u32,
}

impl Default for ResolutionParams {
    fn default() -> Self {
        Self {
            algorithm: "leiden".to_owned(),
            max_resolution: 80.0,
            k: 10,
        }
    }
}

/// Inputs supplied to [`ClusterProducer::produce`].
#[derive(Clone, Copy, Debug)]
pub struct ProduceRequest<'a> {
    /// Edge list files written by the edge extractor.
    pub edge_lists: &'a [PathBuf],
    /// Directory the producer may write into.
    pub scratch_dir: &'a Path,
    /// Resolution parameters.
    pub params: &'a ResolutionParams,
}

/// External multi-resolution clustering step.
///
/// # Examples
/// ```
/// use nestor_core::{
///     ClusterProducer, ClusterProducerError, LevelOrder, ProduceRequest, RawCluster,
///     RawClustering,
/// };
///
/// struct Fixed;
///
/// impl ClusterProducer for Fixed {
///     fn name(&self) -> &str { "fixed" }
///     fn produce(&self, _: &ProduceRequest<'_>) -> Result<RawClustering, ClusterProducerError> {
///         Ok(RawClustering::new(vec![vec![RawCluster::new(0, [0, 1])]], LevelOrder::CoarseToFine))
///     }
/// }
///
/// assert_eq!(Fixed.name(), "fixed");
/// ```
pub trait ClusterProducer {
    /// Returns a human-readable name used in logs and errors.
    fn name(&self) -> &str;

    /// Clusters the network described by `request`.
    ///
    /// # Errors
    /// Returns [`ClusterProducerError`] when the external step cannot be run
    /// or its output cannot be interpreted.
    fn produce(&self, request: &ProduceRequest<'_>) -> Result<RawClustering, ClusterProducerError>;
}

/// Errors reported by a [`ClusterProducer`].
#[non_exhaustive]
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ClusterProducerError {
    /// The external process could not be started.
    #[error("failed to launch `{command}`: {message}")]
    Launch {
        /// Command that failed to start.
        command: Arc<str>,
        /// Operating system error message.
        message: Arc<str>,
    },
    /// The external process exited unsuccessfully.
    #[error("producer exited with status {}: {stderr}", status.map_or_else(|| "unknown".to_owned(), |code| code.to_string()))]
    Exit {
        /// Exit code when the process was not killed by a signal.
        status: Option<i32>,
        /// Captured standard error.
        stderr: Arc<str>,
    },
    /// The expected output file does not exist.
    #[error("producer output `{}` was not written", path.display())]
    MissingOutput {
        /// Expected output path.
        path: PathBuf,
    },
    /// The output file could not be interpreted.
    #[error("malformed producer output `{}` at line {line}: {reason}", path.display())]
    MalformedOutput {
        /// Output path.
        path: PathBuf,
        /// One-based line number.
        line: usize,
        /// Description of the problem.
        reason: Arc<str>,
    },
    /// The producer does not support the requested parameters.
    #[error("unsupported request: {message}")]
    Unsupported {
        /// Description of the unsupported request.
        message: Arc<str>,
    },
}

define_error_codes! {
    /// Stable codes describing [`ClusterProducerError`] variants.
    enum ClusterProducerErrorCode for ClusterProducerError {
        /// The external process could not be started.
        Launch => Launch { .. } => "PRODUCER_LAUNCH",
        /// The external process exited unsuccessfully.
        Exit => Exit { .. } => "PRODUCER_EXIT",
        /// The expected output file does not exist.
        MissingOutput => MissingOutput { .. } => "PRODUCER_MISSING_OUTPUT",
        /// The output file could not be interpreted.
        MalformedOutput => MalformedOutput { .. } => "PRODUCER_MALFORMED_OUTPUT",
        /// The producer does not support the requested parameters.
        Unsupported => Unsupported { .. } => "PRODUCER_UNSUPPORTED",
    }
}
