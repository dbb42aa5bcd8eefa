//! Property runners for hierarchy refinement.

use std::collections::BTreeSet;

use proptest::test_runner::{TestCaseError, TestCaseResult};

use super::types::{HierarchyFixture, RefinementCase};
use crate::{
    hierarchy::{Hierarchy, Refiner, Thresholds},
    network::NodeId,
};

/// Ordered from most to least permissive.
const CONTAINMENT_LADDER: [f64; 6] = [0.0, 0.25, 0.5, 0.75, 0.9, 1.0];
const JACCARD_LADDER: [f64; 6] = [0.0, 0.5, 0.7, 0.8, 0.9, 1.0];

fn fail(case: &RefinementCase, message: impl std::fmt::Display) -> TestCaseError {
    TestCaseError::fail(format!(
        "{message} (shape={:?}, universe={}, systems={}, thresholds={:?})",
        case.fixture.shape,
        case.fixture.universe,
        case.fixture.hierarchy.len(),
        case.thresholds,
    ))
}

fn refined(case: &RefinementCase) -> Hierarchy {
    let mut hierarchy = case.fixture.hierarchy.clone();
    Refiner::new(case.thresholds).refine(&mut hierarchy);
    hierarchy
}

/// Every output edge has a child whose members are a subset of the parent's,
/// links are symmetric and the hierarchy is acyclic.
pub(super) fn run_containment_invariant(case: &RefinementCase) -> TestCaseResult {
    let hierarchy = refined(case);
    hierarchy
        .validate()
        .map_err(|error| fail(case, format!("refined hierarchy is invalid: {error}")))?;
    for edge in hierarchy.edges() {
        let (Some(parent), Some(child)) = (hierarchy.get(edge.parent), hierarchy.get(edge.child))
        else {
            return Err(fail(case, format!("edge {edge:?} names a missing system")));
        };
        if !child.members().is_subset(parent.members()) {
            return Err(fail(case, format!("{} is not contained in {}", child.id(), parent.id())));
        }
    }
    Ok(())
}

/// No system is smaller than `min_system_size` and every edge keeps at least
/// `min_diff` members between parent and child.
pub(super) fn run_size_guarantees(case: &RefinementCase) -> TestCaseResult {
    let hierarchy = refined(case);
    let thresholds = case.thresholds;
    if let Some(system) = hierarchy
        .systems()
        .find(|system| system.len() < thresholds.min_system_size())
    {
        return Err(fail(case, format!("{} has only {} members", system.id(), system.len())));
    }
    for edge in hierarchy.edges() {
        let parent = hierarchy.get(edge.parent).map_or(0, |system| system.len());
        let child = hierarchy.get(edge.child).map_or(0, |system| system.len());
        if parent.saturating_sub(child) < thresholds.min_diff() {
            return Err(fail(
                case,
                format!(
                    "{} and {} differ by {}",
                    edge.parent,
                    edge.child,
                    parent.saturating_sub(child)
                ),
            ));
        }
    }
    Ok(())
}

/// Refining the output again changes nothing.
pub(super) fn run_idempotence(case: &RefinementCase) -> TestCaseResult {
    let once = refined(case);
    let mut twice = once.clone();
    let report = Refiner::new(case.thresholds).refine(&mut twice);
    if once != twice {
        return Err(fail(
            case,
            format!("second refinement changed the hierarchy: {report:?}"),
        ));
    }
    Ok(())
}

/// Members disappear only when every system holding them is dropped for size.
pub(super) fn run_no_orphaned_members(case: &RefinementCase) -> TestCaseResult {
    let refiner = Refiner::new(case.thresholds);
    let mut hierarchy = case.fixture.hierarchy.clone();
    let initial = hierarchy.covered_members();

    refiner.prune_by_containment(&mut hierarchy);
    refiner.merge_by_jaccard(&mut hierarchy);
    refiner.enforce_min_diff(&mut hierarchy);
    let before_filter = hierarchy.covered_members();
    if before_filter != initial {
        return Err(fail(case, "members were lost before size filtering"));
    }

    let min_size = case.thresholds.min_system_size();
    let large_enough: BTreeSet<NodeId> = hierarchy
        .systems()
        .filter(|system| system.len() >= min_size)
        .flat_map(|system| system.members().iter().copied())
        .collect();
    refiner.filter_by_size(&mut hierarchy);
    let after_filter = hierarchy.covered_members();
    if after_filter != large_enough {
        return Err(fail(
            case,
            format!(
                "size filtering kept {} members, expected {}",
                after_filter.len(),
                large_enough.len()
            ),
        ));
    }
    Ok(())
}

/// Raising the containment threshold never adds edges after pruning.
pub(super) fn run_containment_monotonicity(fixture: &HierarchyFixture) -> TestCaseResult {
    let mut previous = usize::MAX;
    for containment in CONTAINMENT_LADDER {
        let thresholds = Thresholds::new(containment, 0.9, 1, 4)
            .map_err(|error| TestCaseError::fail(error.to_string()))?;
        let mut hierarchy = fixture.hierarchy.clone();
        Refiner::new(thresholds).prune_by_containment(&mut hierarchy);
        let edges = hierarchy.edge_count();
        if edges > previous {
            return Err(TestCaseError::fail(format!(
                "containment {containment} kept {edges} edges, more than {previous} at a lower \
                 threshold (shape={:?})",
                fixture.shape
            )));
        }
        previous = edges;
    }
    Ok(())
}

/// Raising the jaccard threshold never adds merges.
pub(super) fn run_jaccard_monotonicity(fixture: &HierarchyFixture) -> TestCaseResult {
    let mut pruned = fixture.hierarchy.clone();
    Refiner::default().prune_by_containment(&mut pruned);

    let mut previous = usize::MAX;
    for jaccard in JACCARD_LADDER {
        let thresholds = Thresholds::new(0.75, jaccard, 1, 4)
            .map_err(|error| TestCaseError::fail(error.to_string()))?;
        let mut hierarchy = pruned.clone();
        let merges = Refiner::new(thresholds).merge_by_jaccard(&mut hierarchy);
        if merges > previous {
            return Err(TestCaseError::fail(format!(
                "jaccard {jaccard} merged {merges} systems, more than {previous} at a lower \
                 threshold (shape={:?})",
                fixture.shape
            )));
        }
        previous = merges;
    }
    Ok(())
}
