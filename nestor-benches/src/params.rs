//! Benchmark parameter types.

use std::fmt;

/// Parameters shared by the assembly and refinement benchmarks.
#[derive(Clone, Debug)]
pub struct HierarchyBenchParams {
    /// Number of network nodes covered by the root cluster.
    pub node_count: usize,
    /// Number of resolution levels.
    pub levels: usize,
}

impl fmt::Display for HierarchyBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={},levels={}", self.node_count, self.levels)
    }
}

/// Parameters for a refinement threshold sweep.
#[derive(Clone, Debug)]
pub struct ThresholdBenchParams {
    /// Number of network nodes covered by the root cluster.
    pub node_count: usize,
    /// Containment threshold handed to the refiner.
    pub containment: f64,
}

impl fmt::Display for ThresholdBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={},ci={}", self.node_count, self.containment)
    }
}
