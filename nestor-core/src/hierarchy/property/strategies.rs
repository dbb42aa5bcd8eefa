//! Strategy builders for hierarchy property tests.
//!
//! Each generator draws from a [`SmallRng`] seeded by proptest so failing
//! cases shrink to a seed that reproduces them exactly.

use std::collections::BTreeSet;

use proptest::prelude::*;
use rand::{Rng, SeedableRng, rngs::SmallRng, seq::SliceRandom};

use super::types::{HierarchyFixture, HierarchyShape, RefinementCase};
use crate::{
    LevelOrder, RawCluster, RawClustering,
    hierarchy::{Hierarchy, SystemId, Thresholds, assemble},
    network::NodeId,
};

const MIN_NODES: usize = 8;
const MAX_NODES: usize = 48;
const MAX_LEVELS: usize = 5;
const MAX_NOISY_SYSTEMS: usize = 14;

/// Knobs that distinguish the nested and duplicated generators.
struct SplitConfig {
    /// Largest number of pieces a cluster splits into.
    max_pieces: usize,
    /// Probability that a member survives into the finer level.
    keep_probability: f64,
    shape: HierarchyShape,
}

pub(super) fn shape_strategy() -> impl Strategy<Value = HierarchyShape> {
    prop_oneof![
        Just(HierarchyShape::Nested),
        Just(HierarchyShape::Duplicated),
        Just(HierarchyShape::Noisy),
    ]
}

pub(super) fn fixture_strategy() -> impl Strategy<Value = HierarchyFixture> {
    (shape_strategy(), any::<u64>()).prop_map(|(shape, seed)| {
        let mut rng = SmallRng::seed_from_u64(seed);
        generate_fixture(shape, &mut rng)
    })
}

pub(super) fn thresholds_strategy() -> impl Strategy<Value = Thresholds> {
    (
        prop::sample::select(vec![0.5, 0.75, 0.9, 1.0]),
        prop::sample::select(vec![0.6, 0.8, 0.9, 1.0]),
        0_usize..=3,
        0_usize..=6,
    )
        .prop_map(|(containment, jaccard, min_diff, min_size)| {
            Thresholds::new(containment, jaccard, min_diff, min_size)
                .expect("sampled ratios lie in [0, 1]")
        })
}

pub(super) fn refinement_case_strategy() -> impl Strategy<Value = RefinementCase> {
    (fixture_strategy(), thresholds_strategy())
        .prop_map(|(fixture, thresholds)| RefinementCase { fixture, thresholds })
}

/// Generates a fixture for an explicit shape, for targeted rstest cases.
pub(super) fn generate_fixture(shape: HierarchyShape, rng: &mut SmallRng) -> HierarchyFixture {
    match shape {
        HierarchyShape::Nested => generate_split(
            rng,
            &SplitConfig {
                max_pieces: 3,
                keep_probability: 0.85,
                shape,
            },
        ),
        HierarchyShape::Duplicated => generate_split(
            rng,
            &SplitConfig {
                max_pieces: 1,
                keep_probability: 0.95,
                shape,
            },
        ),
        HierarchyShape::Noisy => generate_noisy(rng),
    }
}

fn generate_split(rng: &mut SmallRng, config: &SplitConfig) -> HierarchyFixture {
    let universe = rng.gen_range(MIN_NODES..=MAX_NODES);
    let level_count = rng.gen_range(2..=MAX_LEVELS);
    let all: Vec<NodeId> = (0..universe as NodeId).collect();

    let mut levels: Vec<Vec<RawCluster>> = Vec::with_capacity(level_count);
    let mut previous = split(&all, rng.gen_range(1..=3), rng);
    for level in 0..level_count {
        let clusters: Vec<RawCluster> = previous
            .iter()
            .map(|members| RawCluster::new(level, members.iter().copied()))
            .collect();
        levels.push(clusters);

        let mut next = Vec::new();
        for members in &previous {
            let kept: Vec<NodeId> = members
                .iter()
                .copied()
                .filter(|_| rng.gen_bool(config.keep_probability))
                .collect();
            let pieces = rng.gen_range(1..=config.max_pieces);
            next.extend(split(&kept, pieces, rng));
        }
        previous = next;
    }

    let clustering = RawClustering::new(levels, LevelOrder::CoarseToFine);
    let hierarchy = assemble(clustering, None).expect("generated clusters are never empty");
    HierarchyFixture {
        hierarchy,
        shape: config.shape,
        universe,
    }
}

/// Randomly assigns `members` to up to `pieces` groups, dropping empty ones.
fn split(members: &[NodeId], pieces: usize, rng: &mut SmallRng) -> Vec<Vec<NodeId>> {
    let mut groups = vec![Vec::new(); pieces.max(1)];
    for &member in members {
        let slot = rng.gen_range(0..groups.len());
        groups[slot].push(member);
    }
    groups.retain(|group| !group.is_empty());
    groups
}

fn generate_noisy(rng: &mut SmallRng) -> HierarchyFixture {
    let universe = rng.gen_range(MIN_NODES..=MAX_NODES);
    let all: Vec<NodeId> = (0..universe as NodeId).collect();
    let mut hierarchy = Hierarchy::new();

    let root_size = rng.gen_range(MIN_NODES / 2..=universe);
    let root_members: Vec<NodeId> = all.choose_multiple(rng, root_size).copied().collect();
    let mut members_of: Vec<(SystemId, Vec<NodeId>)> =
        vec![(hierarchy.insert(RawCluster::new(0, root_members.iter().copied())), root_members)];

    let extra = rng.gen_range(1..=MAX_NOISY_SYSTEMS);
    for _ in 0..extra {
        let parent_slot = rng.gen_range(0..members_of.len());
        let (parent, parent_members) = members_of[parent_slot].clone();
        let keep = rng.gen_range(0.4..=1.0);
        let mut child: BTreeSet<NodeId> = parent_members
            .iter()
            .copied()
            .filter(|_| rng.gen_bool(keep))
            .collect();
        for _ in 0..rng.gen_range(0..=3) {
            child.insert(rng.gen_range(0..universe as NodeId));
        }
        if child.is_empty() {
            continue;
        }
        let level = hierarchy.get(parent).map_or(0, |system| system.level() + 1);
        let id = hierarchy.insert(RawCluster::new(level, child.iter().copied()));
        hierarchy.link(parent, id).expect("new systems cannot close a cycle");
        members_of.push((id, child.into_iter().collect()));
    }

    HierarchyFixture {
        hierarchy,
        shape: HierarchyShape::Noisy,
        universe,
    }
}
