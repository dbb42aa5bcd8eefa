//! Arena of systems with explicit parent and child id sets.
//!
//! Systems are stored by [`SystemId`]; containment edges are kept as id sets
//! on both endpoints, so re-parenting rewrites ids and never touches the
//! member sets. Every mutation keeps the two sides of each link in sync.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use thiserror::Error;

use super::system::{ContainmentEdge, System, SystemId};
use crate::{cluster::RawCluster, error::define_error_codes, network::NodeId};

/// Structural problems detected in a [`Hierarchy`].
#[non_exhaustive]
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum HierarchyError {
    /// A link or lookup named a system that is not in the arena.
    #[error("system {id} does not exist")]
    UnknownSystem {
        /// Missing identifier.
        id: SystemId,
    },
    /// A system was linked to itself.
    #[error("system {id} cannot contain itself")]
    SelfLoop {
        /// Offending identifier.
        id: SystemId,
    },
    /// Linking would close a cycle.
    #[error("linking {parent} -> {child} would create a cycle")]
    Cycle {
        /// Proposed parent.
        parent: SystemId,
        /// Proposed child.
        child: SystemId,
    },
    /// A link was recorded on one endpoint only.
    #[error("link {parent} -> {child} is not recorded on both systems")]
    AsymmetricLink {
        /// Parent side.
        parent: SystemId,
        /// Child side.
        child: SystemId,
    },
    /// A child holds a member its parent lacks.
    #[error("{child} holds member {member} missing from parent {parent}")]
    ContainmentViolation {
        /// Parent side.
        parent: SystemId,
        /// Child side.
        child: SystemId,
        /// Member absent from the parent.
        member: NodeId,
    },
}

define_error_codes! {
    /// Stable codes describing [`HierarchyError`] variants.
    enum HierarchyErrorCode for HierarchyError {
        /// A link or lookup named a system that is not in the arena.
        UnknownSystem => UnknownSystem { .. } => "HIERARCHY_UNKNOWN_SYSTEM",
        /// A system was linked to itself.
        SelfLoop => SelfLoop { .. } => "HIERARCHY_SELF_LOOP",
        /// Linking would close a cycle.
        Cycle => Cycle { .. } => "HIERARCHY_CYCLE",
        /// A link was recorded on one endpoint only.
        AsymmetricLink => AsymmetricLink { .. } => "HIERARCHY_ASYMMETRIC_LINK",
        /// A child holds a member its parent lacks.
        ContainmentViolation => ContainmentViolation { .. } => "HIERARCHY_CONTAINMENT_VIOLATION",
    }
}

/// Containment DAG of systems.
///
/// # Examples
/// ```
/// use nestor_core::{Hierarchy, RawCluster};
///
/// let mut hierarchy = Hierarchy::new();
/// let root = hierarchy.insert(RawCluster::new(0, [1, 2, 3, 4]));
/// let leaf = hierarchy.insert(RawCluster::new(1, [1, 2]));
/// hierarchy.link(root, leaf)?;
///
/// assert_eq!(hierarchy.top_level(), vec![root]);
/// assert_eq!(hierarchy.edge_count(), 1);
/// hierarchy.validate()?;
/// # Ok::<(), nestor_core::HierarchyError>(())
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Hierarchy {
    systems: BTreeMap<SystemId, System>,
    next_id: usize,
}

impl Hierarchy {
    /// Creates an empty hierarchy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a top-level system built from `cluster` and returns its id.
    ///
    /// Ids are handed out sequentially from `0`.
    pub fn insert(&mut self, cluster: RawCluster) -> SystemId {
        let id = SystemId::new(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        let level = cluster.level();
        let (members, label, persistence) = cluster.into_parts();
        let mut system = System::new(id, level, members);
        system.label = label;
        system.persistence = persistence;
        self.systems.insert(id, system);
        id
    }

    /// Looks up a system.
    #[must_use]
    pub fn get(&self, id: SystemId) -> Option<&System> {
        self.systems.get(&id)
    }

    /// Returns whether `id` is present.
    #[must_use]
    pub fn contains(&self, id: SystemId) -> bool {
        self.systems.contains_key(&id)
    }

    /// Iterates over systems in id order.
    pub fn systems(&self) -> impl Iterator<Item = &System> {
        self.systems.values()
    }

    /// Returns the ids in ascending order.
    #[must_use]
    pub fn ids(&self) -> Vec<SystemId> {
        self.systems.keys().copied().collect()
    }

    /// Returns the number of systems.
    #[must_use]
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    /// Returns whether the hierarchy has no systems.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    /// Upper bound (exclusive) of every id handed out so far.
    pub(crate) fn id_bound(&self) -> usize {
        self.next_id
    }

    /// Returns systems without parents, in id order.
    #[must_use]
    pub fn top_level(&self) -> Vec<SystemId> {
        self.systems
            .values()
            .filter(|system| system.is_top_level())
            .map(System::id)
            .collect()
    }

    /// Returns all containment edges ordered by parent then child.
    #[must_use]
    pub fn edges(&self) -> Vec<ContainmentEdge> {
        self.systems
            .values()
            .flat_map(|system| {
                system
                    .children
                    .iter()
                    .map(move |&child| ContainmentEdge::new(system.id, child))
            })
            .collect()
    }

    /// Returns the number of containment edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.systems.values().map(|system| system.children.len()).sum()
    }

    /// Returns the union of all member sets.
    #[must_use]
    pub fn covered_members(&self) -> BTreeSet<NodeId> {
        self.systems
            .values()
            .flat_map(|system| system.members.iter().copied())
            .collect()
    }

    /// Adds a containment edge.
    ///
    /// Returns `false` when the edge already existed. Member sets are not
    /// checked; see [`Self::validate`].
    ///
    /// # Errors
    /// Returns [`HierarchyError`] when either id is unknown, when both ids are
    /// equal, or when the edge would close a cycle.
    pub fn link(&mut self, parent: SystemId, child: SystemId) -> Result<bool, HierarchyError> {
        for id in [parent, child] {
            if !self.contains(id) {
                return Err(HierarchyError::UnknownSystem { id });
            }
        }
        if parent == child {
            return Err(HierarchyError::SelfLoop { id: parent });
        }
        if self.is_ancestor(child, parent) {
            return Err(HierarchyError::Cycle { parent, child });
        }
        Ok(self.link_unchecked(parent, child))
    }

    /// Removes a containment edge, returning whether it existed.
    pub fn unlink(&mut self, parent: SystemId, child: SystemId) -> bool {
        let removed = self
            .systems
            .get_mut(&parent)
            .is_some_and(|system| system.children.remove(&child));
        if let Some(system) = self.systems.get_mut(&child) {
            system.parents.remove(&parent);
        }
        removed
    }

    /// Removes a system and every link touching it.
    pub fn remove(&mut self, id: SystemId) -> Option<System> {
        let system = self.systems.remove(&id)?;
        for parent in &system.parents {
            if let Some(entry) = self.systems.get_mut(parent) {
                entry.children.remove(&id);
            }
        }
        for child in &system.children {
            if let Some(entry) = self.systems.get_mut(child) {
                entry.parents.remove(&id);
            }
        }
        Some(system)
    }

    /// Removes a system and links its children to each of its former parents.
    ///
    /// Children of a top-level system become top-level.
    pub fn remove_and_reparent(&mut self, id: SystemId) -> Option<System> {
        let system = self.remove(id)?;
        for &parent in &system.parents {
            for &child in &system.children {
                self.link_unchecked(parent, child);
            }
        }
        Some(system)
    }

    /// Folds `absorbed` into `target`: members are united, the children of
    /// `absorbed` are linked to `target` and `absorbed` is removed.
    ///
    /// Returns whether `target` gained members.
    pub(crate) fn absorb(&mut self, target: SystemId, absorbed: SystemId) -> bool {
        if target == absorbed || !self.contains(target) {
            return false;
        }
        let Some(system) = self.remove(absorbed) else {
            return false;
        };
        for &child in &system.children {
            if child != target {
                self.link_unchecked(target, child);
            }
        }
        let Some(entry) = self.systems.get_mut(&target) else {
            return false;
        };
        let before = entry.members.len();
        entry.members.extend(system.members);
        if entry.persistence.is_none() {
            entry.persistence = system.persistence;
        }
        entry.members.len() > before
    }

    /// Returns ids ordered so that every parent precedes its children.
    ///
    /// Among systems whose parents have all been emitted, the lowest id comes
    /// first. Systems on a cycle are omitted.
    #[must_use]
    pub fn topological_order(&self) -> Vec<SystemId> {
        let mut pending: BTreeMap<SystemId, usize> = self
            .systems
            .values()
            .map(|system| (system.id, system.parents.len()))
            .collect();
        let mut ready: BTreeSet<SystemId> = pending
            .iter()
            .filter(|&(_, &count)| count == 0)
            .map(|(&id, _)| id)
            .collect();
        let mut order = Vec::with_capacity(self.systems.len());

        while let Some(id) = ready.pop_first() {
            order.push(id);
            let Some(system) = self.systems.get(&id) else {
                continue;
            };
            for child in &system.children {
                if let Some(count) = pending.get_mut(child) {
                    *count = count.saturating_sub(1);
                    if *count == 0 {
                        ready.insert(*child);
                    }
                }
            }
        }
        order
    }

    /// Returns the ancestors of `start` in breadth-first order, nearest first.
    pub(crate) fn ancestors(&self, start: SystemId) -> Vec<SystemId> {
        let mut seen = BTreeSet::new();
        let mut order = Vec::new();
        let mut queue: VecDeque<SystemId> = self
            .systems
            .get(&start)
            .map(|system| system.parents.iter().copied().collect())
            .unwrap_or_default();
        while let Some(id) = queue.pop_front() {
            if !seen.insert(id) {
                continue;
            }
            order.push(id);
            if let Some(system) = self.systems.get(&id) {
                queue.extend(system.parents.iter().copied());
            }
        }
        order
    }

    /// Unites every parent's members with those of its children, bottom-up.
    ///
    /// Returns the number of systems that gained members.
    pub fn propagate_members(&mut self) -> usize {
        let mut grown = BTreeSet::new();
        for id in self.topological_order().into_iter().rev() {
            let Some(system) = self.systems.get(&id) else {
                continue;
            };
            let members = system.members.clone();
            let parents: Vec<SystemId> = system.parents.iter().copied().collect();
            for parent in parents {
                if let Some(entry) = self.systems.get_mut(&parent) {
                    let before = entry.members.len();
                    entry.members.extend(members.iter().copied());
                    if entry.members.len() > before {
                        grown.insert(parent);
                    }
                }
            }
        }
        grown.len()
    }

    /// Checks link symmetry, containment and acyclicity.
    ///
    /// # Errors
    /// Returns the first [`HierarchyError`] found, scanning systems in id
    /// order.
    pub fn validate(&self) -> Result<(), HierarchyError> {
        for system in self.systems.values() {
            for &child in &system.children {
                let entry = self
                    .systems
                    .get(&child)
                    .ok_or(HierarchyError::UnknownSystem { id: child })?;
                if !entry.parents.contains(&system.id) {
                    return Err(HierarchyError::AsymmetricLink {
                        parent: system.id,
                        child,
                    });
                }
                if let Some(&member) = entry.members.difference(&system.members).next() {
                    return Err(HierarchyError::ContainmentViolation {
                        parent: system.id,
                        child,
                        member,
                    });
                }
            }
            for &parent in &system.parents {
                let entry = self
                    .systems
                    .get(&parent)
                    .ok_or(HierarchyError::UnknownSystem { id: parent })?;
                if !entry.children.contains(&system.id) {
                    return Err(HierarchyError::AsymmetricLink {
                        parent,
                        child: system.id,
                    });
                }
            }
        }

        let ordered: BTreeSet<SystemId> = self.topological_order().into_iter().collect();
        if let Some(system) = self.systems.values().find(|s| !ordered.contains(&s.id)) {
            let parent = system.parents.iter().copied().next().unwrap_or(system.id);
            return Err(HierarchyError::Cycle {
                parent,
                child: system.id,
            });
        }
        Ok(())
    }

    fn is_ancestor(&self, candidate: SystemId, of: SystemId) -> bool {
        candidate == of || self.ancestors(of).contains(&candidate)
    }

    /// Adds a link without the cycle check.
    pub(crate) fn link_unchecked(&mut self, parent: SystemId, child: SystemId) -> bool {
        let added = self
            .systems
            .get_mut(&parent)
            .is_some_and(|system| system.children.insert(child));
        if let Some(system) = self.systems.get_mut(&child) {
            system.parents.insert(parent);
        }
        added
    }
}
