//! Systems and containment edges stored in the hierarchy arena.

use std::{collections::BTreeSet, fmt};

use crate::network::NodeId;

/// Identifier of a system within a [`crate::Hierarchy`].
///
/// # Examples
/// ```
/// use nestor_core::SystemId;
///
/// let id = SystemId::new(4);
/// assert_eq!(id.get(), 4);
/// assert_eq!(id.to_string(), "C4");
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct SystemId(usize);

impl SystemId {
    /// Wraps a raw identifier.
    #[must_use]
    pub const fn new(raw: usize) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for SystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C{}", self.0)
    }
}

/// A directed containment edge from a parent system to a child system.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ContainmentEdge {
    /// Enclosing system.
    pub parent: SystemId,
    /// Enclosed system.
    pub child: SystemId,
}

impl ContainmentEdge {
    /// Creates an edge.
    #[must_use]
    pub const fn new(parent: SystemId, child: SystemId) -> Self {
        Self { parent, child }
    }
}

/// A node of the hierarchy: a set of network members at one resolution.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct System {
    pub(super) id: SystemId,
    pub(super) members: BTreeSet<NodeId>,
    pub(super) level: usize,
    pub(super) label: Option<String>,
    pub(super) persistence: Option<u32>,
    pub(super) parents: BTreeSet<SystemId>,
    pub(super) children: BTreeSet<SystemId>,
}

impl System {
    pub(super) fn new(id: SystemId, level: usize, members: BTreeSet<NodeId>) -> Self {
        Self {
            id,
            members,
            level,
            label: None,
            persistence: None,
            parents: BTreeSet::new(),
            children: BTreeSet::new(),
        }
    }

    /// Returns the identifier.
    #[must_use]
    pub fn id(&self) -> SystemId {
        self.id
    }

    /// Returns the member node ids.
    #[must_use]
    pub fn members(&self) -> &BTreeSet<NodeId> {
        &self.members
    }

    /// Returns the number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns whether the system has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Returns the resolution level the system was first seen at.
    #[must_use]
    pub fn level(&self) -> usize {
        self.level
    }

    /// Returns the producer label, if any.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Returns the producer persistence score, if any.
    #[must_use]
    pub fn persistence(&self) -> Option<u32> {
        self.persistence
    }

    /// Returns the direct parents.
    #[must_use]
    pub fn parents(&self) -> &BTreeSet<SystemId> {
        &self.parents
    }

    /// Returns the direct children.
    #[must_use]
    pub fn children(&self) -> &BTreeSet<SystemId> {
        &self.children
    }

    /// Returns whether the system has no parent.
    #[must_use]
    pub fn is_top_level(&self) -> bool {
        self.parents.is_empty()
    }
}
