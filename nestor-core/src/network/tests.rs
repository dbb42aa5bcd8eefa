//! Unit tests for the network model and the CX2 codec.

use std::io::Write;

use rstest::rstest;
use serde_json::{Value, json};

use super::*;

fn triangle() -> Network {
    let mut network = Network::new();
    network.add_network_attribute("name", "triangle");
    for id in 0..3 {
        network
            .add_node(Node::new(id).with_attribute("name", format!("G{id}")))
            .expect("fresh node id");
    }
    for (id, (s, t)) in [(0, 1), (1, 2), (2, 0)].into_iter().enumerate() {
        network
            .add_edge(Edge::new(id as EdgeId, s, t).with_attribute("weight", 0.5))
            .expect("endpoints exist");
    }
    network
}

fn aspect<'a>(document: &'a Value, name: &str) -> Option<&'a Value> {
    document
        .as_array()?
        .iter()
        .find_map(|entry| entry.get(name))
}

#[test]
fn rejects_duplicate_node_ids() {
    let mut network = Network::new();
    network.add_node(Node::new(1)).expect("first insert");
    let err = network.add_node(Node::new(1)).expect_err("duplicate id");
    assert_eq!(err.code(), NetworkFormatErrorCode::DuplicateNodeId);
}

#[test]
fn rejects_duplicate_edge_ids() {
    let mut network = triangle();
    let err = network
        .add_edge(Edge::new(0, 0, 2))
        .expect_err("edge id 0 is taken");
    assert_eq!(err.code(), NetworkFormatErrorCode::DuplicateEdgeId);
}

#[test]
fn rejects_dangling_edges() {
    let mut network = triangle();
    let err = network
        .add_edge(Edge::new(9, 0, 42))
        .expect_err("node 42 is missing");
    assert!(matches!(
        err,
        NetworkFormatError::DanglingEdge { edge: 9, node: 42 }
    ));
}

#[test]
fn removing_network_attribute_returns_previous_value() {
    let mut network = triangle();
    assert_eq!(
        network.remove_network_attribute("name"),
        Some(json!("triangle"))
    );
    assert_eq!(network.name(), None);
    assert_eq!(network.remove_network_attribute("name"), None);
}

#[test]
fn decodes_minimal_document() {
    let document = json!([
        { "CXVersion": "2.0", "hasFragments": false },
        { "metaData": [{ "name": "nodes", "elementCount": 2 }] },
        { "networkAttributes": [{ "name": "mini", "version": "1" }] },
        { "nodes": [{ "id": 10, "v": { "name": "A" } }, { "id": 11 }] },
        { "edges": [{ "id": 5, "s": 10, "t": 11 }] },
        { "cartesianLayout": [{ "node": 10, "x": 0.0, "y": 1.0 }] },
        { "status": [{ "error": "", "success": true }] }
    ]);

    let network = Network::from_cx2_value(document).expect("valid document");

    assert_eq!(network.name(), Some("mini"));
    assert_eq!(network.node_count(), 2);
    assert_eq!(network.node(10).and_then(Node::name), Some("A"));
    assert_eq!(network.edges(), &[Edge::new(5, 10, 11)]);
}

#[test]
fn decoding_applies_aliases_and_defaults() {
    let document = json!([
        { "CXVersion": "2.0", "hasFragments": false },
        { "attributeDeclarations": [{
            "nodes": { "name": { "d": "string", "a": "n" } },
            "edges": { "interaction": { "d": "string", "v": "pp" } }
        }] },
        { "nodes": [{ "id": 0, "v": { "n": "X" } }, { "id": 1, "v": { "n": "Y" } }] },
        { "edges": [{ "id": 0, "s": 0, "t": 1 }] }
    ]);

    let network = Network::from_cx2_value(document).expect("valid document");

    assert_eq!(network.node(1).and_then(Node::name), Some("Y"));
    let edge = network.edges().first().expect("one edge");
    assert_eq!(edge.attributes().get("interaction"), Some(&json!("pp")));
}

#[rstest]
#[case::object(json!({ "nodes": [] }), NetworkFormatErrorCode::NotAnArray)]
#[case::scalar_entry(json!([1]), NetworkFormatErrorCode::MalformedAspect)]
#[case::two_keys(json!([{ "nodes": [], "edges": [] }]), NetworkFormatErrorCode::MalformedAspect)]
#[case::bad_nodes(json!([{ "nodes": { "id": 1 } }]), NetworkFormatErrorCode::InvalidAspect)]
#[case::missing_id(json!([{ "nodes": [{ "v": {} }] }]), NetworkFormatErrorCode::InvalidAspect)]
#[case::dangling(
    json!([{ "nodes": [{ "id": 0 }] }, { "edges": [{ "id": 0, "s": 0, "t": 3 }] }]),
    NetworkFormatErrorCode::DanglingEdge
)]
fn rejects_malformed_documents(#[case] document: Value, #[case] expected: NetworkFormatErrorCode) {
    let err = Network::from_cx2_value(document).expect_err("document must be rejected");
    assert_eq!(err.code(), expected);
}

#[test]
fn edges_may_precede_nodes_in_the_document() {
    let document = json!([
        { "edges": [{ "id": 0, "s": 1, "t": 2 }] },
        { "nodes": [{ "id": 1 }, { "id": 2 }] }
    ]);
    let network = Network::from_cx2_value(document).expect("order of aspects is irrelevant");
    assert_eq!(network.edge_count(), 1);
}

#[test]
fn encoding_emits_aspects_in_canonical_order() {
    let document = triangle().to_cx2();
    let names: Vec<&str> = document
        .as_array()
        .expect("array document")
        .iter()
        .filter_map(|entry| entry.as_object()?.keys().next().map(String::as_str))
        .collect();

    assert_eq!(
        names,
        [
            "CXVersion",
            "metaData",
            "attributeDeclarations",
            "networkAttributes",
            "nodes",
            "edges",
            "status"
        ]
    );
}

#[test]
fn encoding_declares_attribute_types() {
    let document = triangle().to_cx2();
    let declarations = aspect(&document, "attributeDeclarations").expect("declarations present");

    assert_eq!(
        declarations.pointer("/0/nodes/name/d"),
        Some(&json!("string"))
    );
    assert_eq!(
        declarations.pointer("/0/edges/weight/d"),
        Some(&json!("double"))
    );
    assert_eq!(
        declarations.pointer("/0/networkAttributes/name/d"),
        Some(&json!("string"))
    );
}

#[test]
fn encoding_records_element_counts() {
    let document = triangle().to_cx2();
    let metadata = aspect(&document, "metaData").expect("metadata present");
    let nodes = metadata
        .as_array()
        .and_then(|items| items.iter().find(|item| item["name"] == "nodes"))
        .expect("nodes entry");
    assert_eq!(nodes["elementCount"], json!(3));
}

#[test]
fn encoded_document_decodes_to_same_network() {
    let network = triangle();
    let decoded = Network::from_cx2_value(network.to_cx2()).expect("round trip");
    assert_eq!(decoded, network);
}

#[test]
fn loads_from_path_and_reports_missing_files() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("net.cx2");
    let mut file = std::fs::File::create(&path).expect("create file");
    file.write_all(triangle().to_cx2().to_string().as_bytes())
        .expect("write document");
    drop(file);

    let loaded = Network::from_cx2_path(&path).expect("load document");
    assert_eq!(loaded.name(), Some("triangle"));

    let missing = dir.path().join("absent.cx2");
    let err = Network::from_cx2_path(&missing).expect_err("file is absent");
    assert_eq!(err.code(), NetworkFormatErrorCode::Io);
}

#[test]
fn rejects_invalid_json_from_reader() {
    let err = Network::from_cx2_reader(&b"[{"[..]).expect_err("truncated JSON");
    assert_eq!(err.code(), NetworkFormatErrorCode::Json);
}
