//! Tests for the synthetic clustering generator.

use super::*;
use rstest::rstest;

#[test]
fn root_level_covers_every_node() {
    let clustering = generate_clustering(&SyntheticClusteringConfig {
        noise_per_mille: 0,
        ..SyntheticClusteringConfig::new(32, 3)
    })
    .expect("configuration is valid");

    let root = clustering.levels().first().expect("root level");
    assert_eq!(root.len(), 1);
    assert_eq!(root.first().map(RawCluster::len), Some(32));
    let finest = clustering.levels().last().expect("finest level");
    assert_eq!(finest.len(), 16);
}

#[test]
fn generation_is_deterministic_for_a_seed() {
    let config = SyntheticClusteringConfig::new(200, 4);

    let first = generate_clustering(&config).expect("configuration is valid");
    let second = generate_clustering(&config).expect("configuration is valid");

    assert_eq!(first, second);
}

#[test]
fn noiseless_levels_are_exact_partitions() {
    let clustering = generate_clustering(&SyntheticClusteringConfig {
        noise_per_mille: 0,
        ..SyntheticClusteringConfig::new(64, 3)
    })
    .expect("configuration is valid");

    for level in clustering.levels() {
        let covered: usize = level.iter().map(RawCluster::len).sum();
        assert_eq!(covered, 64);
    }
}

#[rstest]
#[case::nodes(SyntheticClusteringConfig::new(0, 3), "node_count")]
#[case::levels(SyntheticClusteringConfig::new(10, 0), "levels")]
#[case::branching(SyntheticClusteringConfig { branching: 0, ..SyntheticClusteringConfig::new(10, 2) }, "branching")]
fn zero_sizes_are_rejected(#[case] config: SyntheticClusteringConfig, #[case] expected: &'static str) {
    let err = generate_clustering(&config).expect_err("zero sizes are invalid");

    assert_eq!(err, SyntheticError::ZeroValue { context: expected });
}

#[test]
fn excessive_noise_is_rejected() {
    let err = generate_clustering(&SyntheticClusteringConfig {
        noise_per_mille: 1001,
        ..SyntheticClusteringConfig::new(10, 2)
    })
    .expect_err("noise above one is invalid");

    assert_eq!(err, SyntheticError::NoiseOutOfRange { got: 1001 });
}

#[test]
fn path_network_links_consecutive_nodes() {
    let network = path_network(5).expect("network builds");

    assert_eq!(network.node_count(), 5);
    assert_eq!(network.edge_count(), 4);
    assert_eq!(network.node(4).and_then(Node::name), Some("N4"));
}
