//! Fixture types for hierarchy property tests.

use crate::hierarchy::{Hierarchy, Thresholds};

/// Shape of a generated candidate hierarchy.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) enum HierarchyShape {
    /// Assembled from clusters that split their parent cleanly.
    Nested,
    /// Assembled from clusters that mostly repeat their parent.
    Duplicated,
    /// Linked by hand with children that only partly overlap their parent.
    Noisy,
}

/// Candidate hierarchy plus the context needed to diagnose failures.
#[derive(Clone, Debug)]
pub(super) struct HierarchyFixture {
    /// Hierarchy before refinement.
    pub hierarchy: Hierarchy,
    /// Generator used.
    pub shape: HierarchyShape,
    /// Number of distinct node ids available to the generator.
    pub universe: usize,
}

/// Fixture paired with the thresholds to refine it with.
#[derive(Clone, Debug)]
pub(super) struct RefinementCase {
    /// Candidate hierarchy.
    pub fixture: HierarchyFixture,
    /// Thresholds under test.
    pub thresholds: Thresholds,
}
