//! Shared test utilities for `nestor-core`.

use std::{cell::Cell, collections::BTreeSet};

use nestor_test_support::proptest_profile::ProptestRunProfile;
use proptest::test_runner::Config as ProptestConfig;

use crate::{
    cluster::{ClusterProducer, ClusterProducerError, ProduceRequest, RawClustering},
    hierarchy::{Hierarchy, SystemId},
    network::{Edge, Network, Node, NodeId},
};

/// Builds a proptest configuration from the shared run profile.
#[must_use]
pub(crate) fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = ProptestRunProfile::load(default_cases, false);
    ProptestConfig {
        cases: profile.cases(),
        fork: profile.fork(),
        ..ProptestConfig::default()
    }
}

/// [`ClusterProducer`] returning a fixed clustering and counting calls.
pub(crate) struct StaticProducer {
    outcome: Result<RawClustering, ClusterProducerError>,
    calls: Cell<usize>,
    edge_lists_seen: Cell<usize>,
}

impl StaticProducer {
    pub(crate) fn new(clustering: RawClustering) -> Self {
        Self::with_outcome(Ok(clustering))
    }

    pub(crate) fn failing(error: ClusterProducerError) -> Self {
        Self::with_outcome(Err(error))
    }

    fn with_outcome(outcome: Result<RawClustering, ClusterProducerError>) -> Self {
        Self {
            outcome,
            calls: Cell::new(0),
            edge_lists_seen: Cell::new(0),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.get()
    }

    pub(crate) fn edge_lists_seen(&self) -> usize {
        self.edge_lists_seen.get()
    }
}

impl ClusterProducer for StaticProducer {
    fn name(&self) -> &str {
        "static"
    }

    fn produce(&self, request: &ProduceRequest<'_>) -> Result<RawClustering, ClusterProducerError> {
        self.calls.set(self.calls.get() + 1);
        self.edge_lists_seen.set(request.edge_lists.len());
        self.outcome.clone()
    }
}

/// Network with nodes `ids` named `G<id>` and a path of edges through them.
pub(crate) fn path_network(ids: impl IntoIterator<Item = NodeId>) -> Network {
    let ids: Vec<NodeId> = ids.into_iter().collect();
    let mut network = Network::new();
    network.add_network_attribute("name", "path");
    for &id in &ids {
        network
            .add_node(Node::new(id).with_attribute("name", format!("G{id}")))
            .expect("node ids are unique");
    }
    for (edge, pair) in ids.windows(2).enumerate() {
        network
            .add_edge(Edge::new(edge as u64, pair[0], pair[1]))
            .expect("endpoints exist");
    }
    network
}

/// Member sets of a hierarchy keyed by id, for compact assertions.
pub(crate) fn member_sets(hierarchy: &Hierarchy) -> Vec<(SystemId, BTreeSet<NodeId>)> {
    hierarchy
        .systems()
        .map(|system| (system.id(), system.members().clone()))
        .collect()
}
