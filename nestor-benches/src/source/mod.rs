//! Seeded synthetic clusterings and networks for benchmarking.
//!
//! The generator mimics what a multi-resolution community finder emits: a
//! single root cluster that is split into `branching` blocks at every finer
//! level. Noise drops members from blocks and sprinkles in members of
//! unrelated blocks, so assembly sees inexact subsets and refinement has
//! something to prune, merge and collapse.

use std::num::NonZeroUsize;

use nestor_core::{
    Edge, LevelOrder, Network, NetworkFormatError, Node, NodeId, RawCluster, RawClustering,
};
use rand::{Rng, SeedableRng, rngs::SmallRng};
use thiserror::Error;

/// Errors raised by [`generate_clustering`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SyntheticError {
    /// A size parameter was zero.
    #[error("expected a non-zero value for {context}")]
    ZeroValue {
        /// Name of the offending parameter.
        context: &'static str,
    },
    /// The noise rate exceeded one thousand per mille.
    #[error("noise must be at most 1000 per mille, got {got}")]
    NoiseOutOfRange {
        /// Value supplied by the caller.
        got: u32,
    },
}

/// Shape of a synthetic clustering.
#[derive(Clone, Debug)]
pub struct SyntheticClusteringConfig {
    /// Number of network nodes, identified `0..node_count`.
    pub node_count: usize,
    /// Number of resolution levels, including the root level.
    pub levels: usize,
    /// Number of blocks each cluster is split into at the next level.
    pub branching: usize,
    /// Chance, in thousandths, that a member is dropped or a stray member is
    /// added for each member of a block.
    pub noise_per_mille: u32,
    /// RNG seed for reproducibility.
    pub seed: u64,
}

impl SyntheticClusteringConfig {
    /// Returns a four-way split with light noise over `node_count` nodes.
    #[must_use]
    pub fn new(node_count: usize, levels: usize) -> Self {
        Self {
            node_count,
            levels,
            branching: 4,
            noise_per_mille: 20,
            seed: 42,
        }
    }
}

fn non_zero(value: usize, context: &'static str) -> Result<NonZeroUsize, SyntheticError> {
    NonZeroUsize::new(value).ok_or(SyntheticError::ZeroValue { context })
}

/// Generates a coarse-to-fine clustering over nodes `0..node_count`.
///
/// # Errors
/// Returns [`SyntheticError`] when a size parameter is zero or the noise rate
/// is out of range.
///
/// # Examples
/// ```
/// use nestor_benches::source::{SyntheticClusteringConfig, generate_clustering};
///
/// let clustering = generate_clustering(&SyntheticClusteringConfig::new(64, 3))?;
/// assert_eq!(clustering.level_count(), 3);
/// # Ok::<(), nestor_benches::source::SyntheticError>(())
/// ```
pub fn generate_clustering(
    config: &SyntheticClusteringConfig,
) -> Result<RawClustering, SyntheticError> {
    let node_count = non_zero(config.node_count, "node_count")?.get();
    let levels = non_zero(config.levels, "levels")?.get();
    let branching = non_zero(config.branching, "branching")?.get();
    if config.noise_per_mille > 1000 {
        return Err(SyntheticError::NoiseOutOfRange {
            got: config.noise_per_mille,
        });
    }

    let mut rng = SmallRng::seed_from_u64(config.seed);
    let upper = node_id(node_count);
    let mut blocks: Vec<Vec<NodeId>> = vec![(0..upper).collect()];
    let mut output = Vec::with_capacity(levels);

    for level in 0..levels {
        let clusters = blocks
            .iter()
            .filter_map(|block| {
                let members = perturb(block, upper, config.noise_per_mille, &mut rng);
                (!members.is_empty()).then(|| RawCluster::new(level, members))
            })
            .collect();
        output.push(clusters);
        blocks = blocks
            .iter()
            .flat_map(|block| split(block, branching))
            .collect();
    }

    Ok(RawClustering::new(output, LevelOrder::CoarseToFine))
}

fn split(block: &[NodeId], branching: usize) -> Vec<Vec<NodeId>> {
    if block.len() < branching {
        return Vec::new();
    }
    block
        .chunks(block.len().div_ceil(branching))
        .map(<[NodeId]>::to_vec)
        .collect()
}

fn perturb(block: &[NodeId], upper: NodeId, noise: u32, rng: &mut SmallRng) -> Vec<NodeId> {
    let mut members = Vec::with_capacity(block.len());
    for &member in block {
        if noise > 0 && rng.gen_ratio(noise, 1000) {
            members.push(rng.gen_range(0..upper));
        } else {
            members.push(member);
        }
    }
    members
}

fn node_id(index: usize) -> NodeId {
    NodeId::try_from(index).unwrap_or(NodeId::MAX)
}

/// Builds a path network `0 - 1 - ... - node_count-1`.
///
/// # Errors
/// Returns [`NetworkFormatError`] if an id is rejected by the network.
pub fn path_network(node_count: usize) -> Result<Network, NetworkFormatError> {
    let mut network = Network::new();
    let upper = node_id(node_count);
    network.add_network_attribute("name", "synthetic-path");
    for id in 0..upper {
        network.add_node(Node::new(id).with_attribute("name", format!("N{id}")))?;
    }
    for id in 1..upper {
        network.add_edge(Edge::new(id - 1, id - 1, id))?;
    }
    Ok(network)
}

#[cfg(test)]
mod tests;
