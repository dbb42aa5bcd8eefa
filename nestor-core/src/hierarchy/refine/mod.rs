//! Refinement of a candidate hierarchy.
//!
//! Four passes run in a fixed order:
//!
//! 1. containment-index pruning re-parents children that are not really
//!    nested in their parent, then propagates members upward so containment
//!    holds exactly;
//! 2. jaccard merging folds near-duplicate children into their parents,
//!    transitively;
//! 3. minimum-difference enforcement collapses children that differ from
//!    their parent by too few members;
//! 4. minimum-size filtering drops small systems.
//!
//! Running [`Refiner::refine`] on its own output changes nothing.

mod collapse;
mod containment;
mod merge;

use std::collections::BTreeSet;

use tracing::{Span, field, info, instrument, warn};

use super::arena::Hierarchy;
use crate::{Result, error::NestorError, network::NodeId};

/// Refinement thresholds, validated on construction.
///
/// # Examples
/// ```
/// use nestor_core::Thresholds;
///
/// let thresholds = Thresholds::new(0.8, 0.95, 2, 5)?;
/// assert_eq!(thresholds.min_system_size(), 5);
/// assert!(Thresholds::new(1.5, 0.9, 1, 4).is_err());
/// # Ok::<(), nestor_core::NestorError>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Thresholds {
    containment: f64,
    jaccard: f64,
    min_diff: usize,
    min_system_size: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            containment: 0.75,
            jaccard: 0.9,
            min_diff: 1,
            min_system_size: 4,
        }
    }
}

impl Thresholds {
    /// Validates and stores the thresholds.
    ///
    /// # Errors
    /// Returns [`NestorError::InvalidThreshold`] when a ratio is not finite or
    /// lies outside `[0, 1]`.
    pub fn new(
        containment: f64,
        jaccard: f64,
        min_diff: usize,
        min_system_size: usize,
    ) -> Result<Self> {
        Ok(Self {
            containment: unit_ratio("containment_threshold", containment)?,
            jaccard: unit_ratio("jaccard_threshold", jaccard)?,
            min_diff,
            min_system_size,
        })
    }

    /// Minimum containment index for a retained edge.
    #[must_use]
    pub fn containment(&self) -> f64 {
        self.containment
    }

    /// Jaccard index at or above which a child merges into its parent.
    #[must_use]
    pub fn jaccard(&self) -> f64 {
        self.jaccard
    }

    /// Minimum member-count difference between a parent and a child.
    #[must_use]
    pub fn min_diff(&self) -> usize {
        self.min_diff
    }

    /// Minimum number of members a system must keep.
    #[must_use]
    pub fn min_system_size(&self) -> usize {
        self.min_system_size
    }
}

fn unit_ratio(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(NestorError::InvalidThreshold { name, value })
    }
}

/// Returns `|child ∩ parent| / |child|`, or `1` for an empty child.
///
/// # Examples
/// ```
/// use std::collections::BTreeSet;
/// use nestor_core::containment_index;
///
/// let parent: BTreeSet<u64> = [1, 2, 3].into();
/// let child: BTreeSet<u64> = [2, 3, 4, 5].into();
/// assert_eq!(containment_index(&child, &parent), 0.5);
/// ```
#[must_use]
pub fn containment_index(child: &BTreeSet<NodeId>, parent: &BTreeSet<NodeId>) -> f64 {
    ratio(child.intersection(parent).count(), child.len())
}

/// Returns `|a ∩ b| / |a ∪ b|`, or `1` when both sets are empty.
#[must_use]
pub fn jaccard_index(a: &BTreeSet<NodeId>, b: &BTreeSet<NodeId>) -> f64 {
    let shared = a.intersection(b).count();
    let union = a.len().saturating_add(b.len()).saturating_sub(shared);
    ratio(shared, union)
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        1.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Outcome of containment-index pruning.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ContainmentReport {
    /// Edges that met the threshold and were kept.
    pub retained: usize,
    /// Edges removed for falling below the threshold.
    pub pruned: usize,
    /// Pruned children linked to a qualifying ancestor.
    pub reparented: usize,
    /// Pruned children left without any parent.
    pub promoted: usize,
}

/// Per-pass counts reported by [`Refiner::refine`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RefinementReport {
    /// Containment pruning outcome.
    pub containment: ContainmentReport,
    /// Systems merged into a near-duplicate parent.
    pub merged: usize,
    /// Systems collapsed into a parent for violating the minimum difference.
    pub collapsed: usize,
    /// Systems dropped for being too small.
    pub removed: usize,
    /// Systems left after refinement.
    pub systems: usize,
    /// Containment edges left after refinement.
    pub edges: usize,
}

/// Applies the refinement passes with a fixed set of [`Thresholds`].
///
/// # Examples
/// ```
/// use nestor_core::{Hierarchy, RawCluster, Refiner, Thresholds};
///
/// let mut hierarchy = Hierarchy::new();
/// let root = hierarchy.insert(RawCluster::new(0, 1..=10));
/// let twin = hierarchy.insert(RawCluster::new(1, 1..=10));
/// hierarchy.link(root, twin)?;
///
/// let report = Refiner::new(Thresholds::default()).refine(&mut hierarchy);
/// assert_eq!(report.merged, 1);
/// assert_eq!(hierarchy.len(), 1);
/// # Ok::<(), nestor_core::HierarchyError>(())
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Refiner {
    thresholds: Thresholds,
}

impl Refiner {
    /// Creates a refiner.
    #[must_use]
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    /// Returns the thresholds in use.
    #[must_use]
    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Runs all four passes in order.
    #[instrument(
        name = "core.refine",
        skip(self, hierarchy),
        fields(systems_in = hierarchy.len(), systems_out = field::Empty),
    )]
    pub fn refine(&self, hierarchy: &mut Hierarchy) -> RefinementReport {
        let containment = self.prune_by_containment(hierarchy);
        let merged = self.merge_by_jaccard(hierarchy);
        let collapsed = self.enforce_min_diff(hierarchy);
        let removed = self.filter_by_size(hierarchy);

        let report = RefinementReport {
            containment,
            merged,
            collapsed,
            removed,
            systems: hierarchy.len(),
            edges: hierarchy.edge_count(),
        };
        Span::current().record("systems_out", report.systems);
        if hierarchy.is_empty() {
            warn!(
                min_system_size = self.thresholds.min_system_size,
                "refinement left no systems"
            );
        }
        info!(
            pruned = report.containment.pruned,
            reparented = report.containment.reparented,
            promoted = report.containment.promoted,
            merged = report.merged,
            collapsed = report.collapsed,
            removed = report.removed,
            systems = report.systems,
            edges = report.edges,
            "refined hierarchy"
        );
        report
    }
}
