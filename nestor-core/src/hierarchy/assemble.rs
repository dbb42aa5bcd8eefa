//! Assembly of raw multi-resolution clusters into a candidate hierarchy.

use std::collections::BTreeSet;

use thiserror::Error;
use tracing::{Span, field, info, instrument};

use super::{
    arena::Hierarchy,
    system::{System, SystemId},
};
use crate::{cluster::RawClustering, error::define_error_codes, network::NodeId};

/// Errors raised when raw clusters cannot form a hierarchy.
#[non_exhaustive]
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum AssemblyError {
    /// A raw cluster had no members.
    #[error("cluster {index} at level {level} is empty")]
    EmptyCluster {
        /// Resolution level, coarsest first.
        level: usize,
        /// Position within the level.
        index: usize,
    },
    /// A raw cluster referenced a node the network does not contain.
    #[error("cluster {index} at level {level} references unknown node {member}")]
    UnknownMember {
        /// Resolution level, coarsest first.
        level: usize,
        /// Position within the level.
        index: usize,
        /// Unknown node id.
        member: NodeId,
    },
}

define_error_codes! {
    /// Stable codes describing [`AssemblyError`] variants.
    enum AssemblyErrorCode for AssemblyError {
        /// A raw cluster had no members.
        EmptyCluster => EmptyCluster { .. } => "ASSEMBLY_EMPTY_CLUSTER",
        /// A raw cluster referenced a node the network does not contain.
        UnknownMember => UnknownMember { .. } => "ASSEMBLY_UNKNOWN_MEMBER",
    }
}

/// Builds a candidate hierarchy from raw clusters.
///
/// Every raw cluster becomes a system; ids follow level order (coarsest
/// first) and then producer order. A cluster at level `l + 1` is linked under
/// the cluster at level `l` that encloses it; when several do, the one with
/// the fewest members wins and ties go to the lowest id. Clusters with no
/// enclosing cluster at the adjacent coarser level are top-level.
///
/// When `known_nodes` is given, every member must belong to it.
///
/// # Errors
/// Returns [`AssemblyError`] when a cluster is empty or references an unknown
/// node.
///
/// # Examples
/// ```
/// use nestor_core::{LevelOrder, RawCluster, RawClustering, SystemId, assemble};
///
/// let clustering = RawClustering::new(
///     vec![
///         vec![RawCluster::new(0, 1..=8)],
///         vec![RawCluster::new(1, 1..=4), RawCluster::new(1, 5..=8)],
///     ],
///     LevelOrder::CoarseToFine,
/// );
/// let hierarchy = assemble(clustering, None)?;
/// assert_eq!(hierarchy.top_level(), vec![SystemId::new(0)]);
/// assert_eq!(hierarchy.edge_count(), 2);
/// # Ok::<(), nestor_core::AssemblyError>(())
/// ```
#[instrument(
    name = "core.assemble",
    err,
    skip(clustering, known_nodes),
    fields(levels = clustering.level_count(), systems = field::Empty, edges = field::Empty),
)]
pub fn assemble(
    clustering: RawClustering,
    known_nodes: Option<&BTreeSet<NodeId>>,
) -> Result<Hierarchy, AssemblyError> {
    let mut hierarchy = Hierarchy::new();
    let mut previous: Vec<SystemId> = Vec::new();

    for (level, group) in clustering.into_levels().into_iter().enumerate() {
        let mut current = Vec::with_capacity(group.len());
        for (index, cluster) in group.into_iter().enumerate() {
            check_cluster(level, index, cluster.members(), known_nodes)?;
            let parent = enclosing_parent(&hierarchy, &previous, cluster.members());
            let id = hierarchy.insert(cluster);
            if let Some(parent) = parent {
                hierarchy.link_unchecked(parent, id);
            }
            current.push(id);
        }
        previous = current;
    }

    let span = Span::current();
    span.record("systems", hierarchy.len());
    span.record("edges", hierarchy.edge_count());
    info!(
        systems = hierarchy.len(),
        edges = hierarchy.edge_count(),
        top_level = hierarchy.top_level().len(),
        "assembled candidate hierarchy"
    );
    Ok(hierarchy)
}

fn check_cluster(
    level: usize,
    index: usize,
    members: &BTreeSet<NodeId>,
    known_nodes: Option<&BTreeSet<NodeId>>,
) -> Result<(), AssemblyError> {
    if members.is_empty() {
        return Err(AssemblyError::EmptyCluster { level, index });
    }
    if let Some(known) = known_nodes
        && let Some(&member) = members.difference(known).next()
    {
        return Err(AssemblyError::UnknownMember {
            level,
            index,
            member,
        });
    }
    Ok(())
}

fn enclosing_parent(
    hierarchy: &Hierarchy,
    candidates: &[SystemId],
    members: &BTreeSet<NodeId>,
) -> Option<SystemId> {
    candidates
        .iter()
        .filter_map(|&id| hierarchy.get(id))
        .filter(|system| members.is_subset(system.members()))
        .min_by_key(|system| (system.len(), system.id()))
        .map(System::id)
}
