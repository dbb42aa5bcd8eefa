//! Containment hierarchy of systems: assembly and refinement.
//!
//! Raw clusters from several resolutions are first assembled into a candidate
//! DAG, where each cluster hangs under the smallest enclosing cluster of the
//! adjacent coarser level. The [`Refiner`] then prunes weak containment,
//! merges near-duplicates, collapses nearly identical parent/child pairs and
//! drops small systems.
//!
//! Systems live in an arena keyed by [`SystemId`]; links are id sets kept on
//! both endpoints. The assembler always yields a forest and the refinement
//! passes preserve that shape.

mod arena;
mod assemble;
mod refine;
mod system;
mod union_find;

pub use self::{
    arena::{Hierarchy, HierarchyError, HierarchyErrorCode},
    assemble::{AssemblyError, AssemblyErrorCode, assemble},
    refine::{
        ContainmentReport, RefinementReport, Refiner, Thresholds, containment_index,
        jaccard_index,
    },
    system::{ContainmentEdge, System, SystemId},
};

#[cfg(test)]
mod property;
