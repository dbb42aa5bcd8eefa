//! Jaccard merging of near-duplicate parent and child systems.

use tracing::debug;

use super::{Refiner, jaccard_index};
use crate::hierarchy::{
    arena::Hierarchy,
    system::{ContainmentEdge, SystemId},
    union_find::DisjointSet,
};

impl Refiner {
    /// Folds every child whose jaccard index with its parent reaches the
    /// threshold into that parent and returns the number of merges.
    ///
    /// Qualifying edges are resolved in `(parent, child)` order against the
    /// indices measured at the start of each round. A child always merges
    /// into the current representative of its parent, so a chain of
    /// near-duplicates ends up in its topmost system. Rounds repeat until no
    /// edge qualifies.
    pub fn merge_by_jaccard(&self, hierarchy: &mut Hierarchy) -> usize {
        let threshold = self.thresholds.jaccard;
        let mut sets = DisjointSet::new(hierarchy.id_bound());
        let mut merged = 0_usize;
        let mut grew = false;

        loop {
            let qualifying: Vec<ContainmentEdge> = hierarchy
                .edges()
                .into_iter()
                .filter(|edge| index_of(hierarchy, *edge) >= threshold)
                .collect();
            let mut progressed = false;

            for edge in qualifying {
                if !sets.is_root(edge.child.get()) {
                    continue;
                }
                let target = SystemId::new(sets.find(edge.parent.get()));
                if target == edge.child || !hierarchy.contains(target) {
                    continue;
                }
                sets.absorb(target.get(), edge.child.get());
                grew |= hierarchy.absorb(target, edge.child);
                merged += 1;
                progressed = true;
                debug!(child = %edge.child, into = %target, "merged near-duplicate system");
            }

            if !progressed {
                break;
            }
        }

        if grew {
            hierarchy.propagate_members();
        }
        merged
    }
}

fn index_of(hierarchy: &Hierarchy, edge: ContainmentEdge) -> f64 {
    match (hierarchy.get(edge.parent), hierarchy.get(edge.child)) {
        (Some(parent), Some(child)) => jaccard_index(parent.members(), child.members()),
        _ => 0.0,
    }
}
