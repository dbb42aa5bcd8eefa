//! In-memory interaction network and its CX2 wire codec.
//!
//! A [`Network`] keeps network attributes, nodes and edges in the order they
//! were read so the edge extractor can replay edges exactly as the source
//! network listed them. Node and edge identifiers are unique and every edge
//! references nodes that exist.

mod cx2;

use std::{
    collections::{BTreeMap, BTreeSet},
    io,
    path::PathBuf,
};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::error::define_error_codes;

/// Identifier of a node in the interaction network.
pub type NodeId = u64;

/// Identifier of an edge in the interaction network.
pub type EdgeId = u64;

/// Ordered attribute map attached to networks, nodes and edges.
pub type AttributeMap = serde_json::Map<String, Value>;

/// Errors raised while decoding or mutating a [`Network`].
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum NetworkFormatError {
    /// The input was not valid JSON.
    #[error("invalid JSON: {source}")]
    Json {
        /// Underlying parser error.
        #[from]
        source: serde_json::Error,
    },
    /// The input file could not be read.
    #[error("failed to read `{}`: {source}", path.display())]
    Io {
        /// Path of the unreadable file.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The top-level JSON value was not an array of aspects.
    #[error("CX2 document must be a JSON array of aspects")]
    NotAnArray,
    /// An aspect entry did not have the expected shape.
    #[error("aspect entry {index} is malformed: {reason}")]
    MalformedAspect {
        /// Position of the entry in the top-level array.
        index: usize,
        /// Description of the problem.
        reason: &'static str,
    },
    /// The body of a known aspect could not be decoded.
    #[error("`{aspect}` aspect is malformed: {source}")]
    InvalidAspect {
        /// Aspect name.
        aspect: &'static str,
        /// Underlying decoding error.
        #[source]
        source: serde_json::Error,
    },
    /// Two nodes shared an identifier.
    #[error("node id {id} appears more than once")]
    DuplicateNodeId {
        /// Repeated node identifier.
        id: NodeId,
    },
    /// Two edges shared an identifier.
    #[error("edge id {id} appears more than once")]
    DuplicateEdgeId {
        /// Repeated edge identifier.
        id: EdgeId,
    },
    /// An edge referenced a node that does not exist.
    #[error("edge {edge} references unknown node {node}")]
    DanglingEdge {
        /// Offending edge.
        edge: EdgeId,
        /// Missing endpoint.
        node: NodeId,
    },
}

define_error_codes! {
    /// Stable codes describing [`NetworkFormatError`] variants.
    enum NetworkFormatErrorCode for NetworkFormatError {
        /// The input was not valid JSON.
        Json => Json { .. } => "NETWORK_INVALID_JSON",
        /// The input file could not be read.
        Io => Io { .. } => "NETWORK_IO",
        /// The top-level JSON value was not an array of aspects.
        NotAnArray => NotAnArray => "NETWORK_NOT_AN_ARRAY",
        /// An aspect entry did not have the expected shape.
        MalformedAspect => MalformedAspect { .. } => "NETWORK_MALFORMED_ASPECT",
        /// The body of a known aspect could not be decoded.
        InvalidAspect => InvalidAspect { .. } => "NETWORK_INVALID_ASPECT",
        /// Two nodes shared an identifier.
        DuplicateNodeId => DuplicateNodeId { .. } => "NETWORK_DUPLICATE_NODE_ID",
        /// Two edges shared an identifier.
        DuplicateEdgeId => DuplicateEdgeId { .. } => "NETWORK_DUPLICATE_EDGE_ID",
        /// An edge referenced a node that does not exist.
        DanglingEdge => DanglingEdge { .. } => "NETWORK_DANGLING_EDGE",
    }
}

/// A node and its attributes.
///
/// # Examples
/// ```
/// use nestor_core::Node;
///
/// let node = Node::new(7).with_attribute("name", "TP53");
/// assert_eq!(node.id(), 7);
/// assert_eq!(node.name(), Some("TP53"));
/// ```
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Node {
    id: NodeId,
    #[serde(rename = "v", default, skip_serializing_if = "AttributeMap::is_empty")]
    attributes: AttributeMap,
}

impl Node {
    /// Creates a node without attributes.
    #[must_use]
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            attributes: AttributeMap::new(),
        }
    }

    /// Adds or replaces an attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Returns the node identifier.
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Returns all node attributes.
    #[must_use]
    pub fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }

    /// Returns a single attribute.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Returns the `name` attribute when it is a string.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.attribute("name").and_then(Value::as_str)
    }
}

/// A directed edge between two nodes.
///
/// # Examples
/// ```
/// use nestor_core::Edge;
///
/// let edge = Edge::new(0, 1, 2);
/// assert_eq!((edge.source(), edge.target()), (1, 2));
/// ```
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Edge {
    id: EdgeId,
    #[serde(rename = "s")]
    source: NodeId,
    #[serde(rename = "t")]
    target: NodeId,
    #[serde(rename = "v", default, skip_serializing_if = "AttributeMap::is_empty")]
    attributes: AttributeMap,
}

impl Edge {
    /// Creates an edge without attributes.
    #[must_use]
    pub fn new(id: EdgeId, source: NodeId, target: NodeId) -> Self {
        Self {
            id,
            source,
            target,
            attributes: AttributeMap::new(),
        }
    }

    /// Adds or replaces an attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Returns the edge identifier.
    #[must_use]
    pub fn id(&self) -> EdgeId {
        self.id
    }

    /// Returns the source node.
    #[must_use]
    pub fn source(&self) -> NodeId {
        self.source
    }

    /// Returns the target node.
    #[must_use]
    pub fn target(&self) -> NodeId {
        self.target
    }

    /// Returns all edge attributes.
    #[must_use]
    pub fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }
}

/// Interaction network with ordered nodes and edges.
///
/// # Examples
/// ```
/// use nestor_core::{Edge, Network, Node};
///
/// let mut network = Network::new();
/// network.add_node(Node::new(0))?;
/// network.add_node(Node::new(1))?;
/// network.add_edge(Edge::new(0, 0, 1))?;
/// network.add_network_attribute("name", "demo");
/// assert_eq!(network.name(), Some("demo"));
/// assert_eq!(network.edge_count(), 1);
/// # Ok::<(), nestor_core::NetworkFormatError>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Network {
    attributes: AttributeMap,
    nodes: Vec<Node>,
    node_index: BTreeMap<NodeId, usize>,
    edges: Vec<Edge>,
    edge_ids: BTreeSet<EdgeId>,
}

impl Network {
    /// Creates an empty network.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the network-level attributes.
    #[must_use]
    pub fn network_attributes(&self) -> &AttributeMap {
        &self.attributes
    }

    /// Returns a single network attribute.
    #[must_use]
    pub fn network_attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Adds or replaces a network attribute.
    pub fn add_network_attribute(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Removes a network attribute, returning its previous value.
    pub fn remove_network_attribute(&mut self, name: &str) -> Option<Value> {
        self.attributes.remove(name)
    }

    /// Returns the `name` network attribute when it is a string.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.network_attribute("name").and_then(Value::as_str)
    }

    /// Returns nodes in insertion order.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Looks up a node by identifier.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.node_index
            .get(&id)
            .and_then(|&position| self.nodes.get(position))
    }

    /// Returns the set of node identifiers.
    #[must_use]
    pub fn node_ids(&self) -> BTreeSet<NodeId> {
        self.node_index.keys().copied().collect()
    }

    /// Returns edges in insertion order.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Appends a node.
    ///
    /// # Errors
    /// Returns [`NetworkFormatError::DuplicateNodeId`] when the identifier is
    /// already taken.
    pub fn add_node(&mut self, node: Node) -> Result<(), NetworkFormatError> {
        if self.node_index.contains_key(&node.id) {
            return Err(NetworkFormatError::DuplicateNodeId { id: node.id });
        }
        self.node_index.insert(node.id, self.nodes.len());
        self.nodes.push(node);
        Ok(())
    }

    /// Appends an edge.
    ///
    /// # Errors
    /// Returns [`NetworkFormatError::DuplicateEdgeId`] when the identifier is
    /// already taken and [`NetworkFormatError::DanglingEdge`] when either
    /// endpoint is missing.
    pub fn add_edge(&mut self, edge: Edge) -> Result<(), NetworkFormatError> {
        if self.edge_ids.contains(&edge.id) {
            return Err(NetworkFormatError::DuplicateEdgeId { id: edge.id });
        }
        for endpoint in [edge.source, edge.target] {
            if !self.node_index.contains_key(&endpoint) {
                return Err(NetworkFormatError::DanglingEdge {
                    edge: edge.id,
                    node: endpoint,
                });
            }
        }
        self.edge_ids.insert(edge.id);
        self.edges.push(edge);
        Ok(())
    }
}

#[cfg(test)]
mod tests;
