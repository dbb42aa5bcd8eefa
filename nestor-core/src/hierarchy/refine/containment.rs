//! Containment-index pruning.

use tracing::debug;

use super::{ContainmentReport, Refiner, containment_index};
use crate::hierarchy::{
    arena::Hierarchy,
    system::{System, SystemId},
};

impl Refiner {
    /// Re-parents children whose containment index in their parent falls
    /// below the threshold.
    ///
    /// Parents are visited in topological order and their children by id. A
    /// failing child is linked to the nearest ancestor of its parent that
    /// encloses it well enough, or left top-level when none does and it has
    /// no other parent. Members are then propagated upward so every child is
    /// a subset of each of its parents.
    pub fn prune_by_containment(&self, hierarchy: &mut Hierarchy) -> ContainmentReport {
        let threshold = self.thresholds.containment;
        let mut report = ContainmentReport::default();

        for parent in hierarchy.topological_order() {
            let children: Vec<SystemId> = hierarchy
                .get(parent)
                .map(|system| system.children().iter().copied().collect())
                .unwrap_or_default();
            for child in children {
                if index_between(hierarchy, child, parent) >= threshold {
                    report.retained += 1;
                    continue;
                }
                hierarchy.unlink(parent, child);
                report.pruned += 1;

                let replacement = hierarchy
                    .ancestors(parent)
                    .into_iter()
                    .find(|&ancestor| index_between(hierarchy, child, ancestor) >= threshold);
                if let Some(ancestor) = replacement {
                    hierarchy.link_unchecked(ancestor, child);
                    report.reparented += 1;
                    debug!(%child, from = %parent, to = %ancestor, "re-parented system");
                } else if hierarchy.get(child).is_some_and(System::is_top_level) {
                    report.promoted += 1;
                    debug!(%child, from = %parent, "promoted system to top level");
                }
            }
        }

        hierarchy.propagate_members();
        report
    }
}

fn index_between(hierarchy: &Hierarchy, child: SystemId, parent: SystemId) -> f64 {
    match (hierarchy.get(child), hierarchy.get(parent)) {
        (Some(child), Some(parent)) => containment_index(child.members(), parent.members()),
        _ => 0.0,
    }
}
