//! Minimum-difference collapsing and minimum-size filtering.

use tracing::debug;

use super::Refiner;
use crate::hierarchy::{
    arena::Hierarchy,
    system::{System, SystemId},
};

impl Refiner {
    /// Collapses children that differ from their parent by fewer than
    /// `min_diff` members and returns the number of collapsed systems.
    ///
    /// Parents are visited top-down. A collapsed child's children are linked
    /// to the parent and checked against it in turn.
    pub fn enforce_min_diff(&self, hierarchy: &mut Hierarchy) -> usize {
        let min_diff = self.thresholds.min_diff;
        let mut collapsed = 0_usize;
        let mut grew = false;

        for parent in hierarchy.topological_order() {
            while let Some(child) = too_close_child(hierarchy, parent, min_diff) {
                grew |= hierarchy.absorb(parent, child);
                collapsed += 1;
                debug!(%child, into = %parent, "collapsed system into parent");
            }
        }

        if grew {
            hierarchy.propagate_members();
        }
        collapsed
    }

    /// Drops every system with fewer than `min_system_size` members and
    /// returns the number dropped.
    ///
    /// Children of a dropped system are linked to each of its former
    /// parents, or become top-level when it had none.
    pub fn filter_by_size(&self, hierarchy: &mut Hierarchy) -> usize {
        let min_size = self.thresholds.min_system_size;
        let small: Vec<SystemId> = hierarchy
            .systems()
            .filter(|system| system.len() < min_size)
            .map(System::id)
            .collect();
        for &id in &small {
            hierarchy.remove_and_reparent(id);
        }
        if !small.is_empty() {
            debug!(dropped = small.len(), min_size, "dropped small systems");
        }
        small.len()
    }
}

fn too_close_child(hierarchy: &Hierarchy, parent: SystemId, min_diff: usize) -> Option<SystemId> {
    let system = hierarchy.get(parent)?;
    let size = system.len();
    system.children().iter().copied().find(|&child| {
        hierarchy
            .get(child)
            .is_some_and(|entry| size.saturating_sub(entry.len()) < min_diff)
    })
}
