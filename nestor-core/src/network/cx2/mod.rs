//! CX2 decoding and encoding for [`Network`].
//!
//! A CX2 document is a JSON array whose entries are single-key objects, one
//! per aspect. The first entry is a version descriptor; the last is usually a
//! `status` aspect. Only the aspects needed to rebuild the network are
//! interpreted: `attributeDeclarations`, `networkAttributes`, `nodes` and
//! `edges`. Others are skipped.

mod declarations;

use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, instrument};

use super::{AttributeMap, Edge, Network, NetworkFormatError, Node};

use self::declarations::{Declarations, infer_scope};

const CX_VERSION: &str = "2.0";
const NETWORK_SCOPE: &str = "networkAttributes";
const NODE_SCOPE: &str = "nodes";
const EDGE_SCOPE: &str = "edges";

impl Network {
    /// Decodes a CX2 document from a reader.
    ///
    /// # Errors
    /// Returns [`NetworkFormatError`] when the input is not valid JSON or not
    /// a well-formed CX2 document.
    pub fn from_cx2_reader<R: Read>(reader: R) -> Result<Self, NetworkFormatError> {
        let value: Value = serde_json::from_reader(reader)?;
        Self::from_cx2_value(value)
    }

    /// Decodes a CX2 document stored at `path`.
    ///
    /// # Errors
    /// Returns [`NetworkFormatError::Io`] when the file cannot be opened and
    /// any decoding error raised by [`Self::from_cx2_reader`].
    #[instrument(name = "core.load_cx2", err, skip(path), fields(path = %path.display()))]
    pub fn from_cx2_path(path: &Path) -> Result<Self, NetworkFormatError> {
        let file = File::open(path).map_err(|source| NetworkFormatError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_cx2_reader(BufReader::new(file))
    }

    /// Decodes an already-parsed CX2 document.
    ///
    /// # Errors
    /// Returns [`NetworkFormatError`] when an aspect is malformed, an
    /// identifier repeats, or an edge references an unknown node.
    ///
    /// # Examples
    /// ```
    /// use nestor_core::Network;
    /// use serde_json::json;
    ///
    /// let network = Network::from_cx2_value(json!([
    ///     { "CXVersion": "2.0", "hasFragments": false },
    ///     { "networkAttributes": [{ "name": "demo" }] },
    ///     { "nodes": [{ "id": 0 }, { "id": 1 }] },
    ///     { "edges": [{ "id": 0, "s": 0, "t": 1 }] },
    ///     { "status": [{ "error": "", "success": true }] }
    /// ]))?;
    /// assert_eq!(network.name(), Some("demo"));
    /// assert_eq!(network.edge_count(), 1);
    /// # Ok::<(), nestor_core::NetworkFormatError>(())
    /// ```
    pub fn from_cx2_value(value: Value) -> Result<Self, NetworkFormatError> {
        let Value::Array(entries) = value else {
            return Err(NetworkFormatError::NotAnArray);
        };

        let mut declarations = Declarations::default();
        let mut attributes = AttributeMap::new();
        let mut nodes: Vec<Node> = Vec::new();
        let mut edges: Vec<Edge> = Vec::new();

        for (index, entry) in entries.into_iter().enumerate() {
            let Value::Object(aspect) = entry else {
                return Err(NetworkFormatError::MalformedAspect {
                    index,
                    reason: "entry must be an object",
                });
            };
            if aspect.contains_key("CXVersion") {
                continue;
            }
            if aspect.len() != 1 {
                return Err(NetworkFormatError::MalformedAspect {
                    index,
                    reason: "entry must hold exactly one aspect",
                });
            }
            let Some((name, body)) = aspect.into_iter().next() else {
                continue;
            };
            match name.as_str() {
                "attributeDeclarations" => {
                    declarations.extend(decode_aspect("attributeDeclarations", body)?);
                }
                NETWORK_SCOPE => {
                    let maps: Vec<AttributeMap> = decode_aspect(NETWORK_SCOPE, body)?;
                    attributes.extend(maps.into_iter().flatten());
                }
                NODE_SCOPE => nodes.extend(decode_aspect::<Vec<Node>>(NODE_SCOPE, body)?),
                EDGE_SCOPE => edges.extend(decode_aspect::<Vec<Edge>>(EDGE_SCOPE, body)?),
                "metaData" | "status" => {}
                other => debug!(aspect = other, "skipping unsupported CX2 aspect"),
            }
        }

        let mut network = Self::new();
        network.attributes = declarations.expand(NETWORK_SCOPE, attributes);
        for mut node in nodes {
            node.attributes = declarations.expand(NODE_SCOPE, node.attributes);
            network.add_node(node)?;
        }
        for mut edge in edges {
            edge.attributes = declarations.expand(EDGE_SCOPE, edge.attributes);
            network.add_edge(edge)?;
        }
        Ok(network)
    }

    /// Encodes the network as a CX2 document.
    ///
    /// Attribute declarations are inferred from attribute values and a
    /// `metaData` aspect records element counts.
    ///
    /// # Examples
    /// ```
    /// use nestor_core::{Network, Node};
    ///
    /// let mut network = Network::new();
    /// network.add_node(Node::new(3).with_attribute("name", "C3"))?;
    /// let encoded = network.to_cx2();
    /// let decoded = Network::from_cx2_value(encoded)?;
    /// assert_eq!(decoded, network);
    /// # Ok::<(), nestor_core::NetworkFormatError>(())
    /// ```
    #[must_use]
    pub fn to_cx2(&self) -> Value {
        let declarations = json!([{
            NETWORK_SCOPE: infer_scope([&self.attributes]),
            NODE_SCOPE: infer_scope(self.nodes.iter().map(|node| &node.attributes)),
            EDGE_SCOPE: infer_scope(self.edges.iter().map(|edge| &edge.attributes)),
        }]);
        let metadata = json!([
            { "name": "attributeDeclarations", "elementCount": 1 },
            { "name": NETWORK_SCOPE, "elementCount": 1 },
            { "name": NODE_SCOPE, "elementCount": self.nodes.len() },
            { "name": EDGE_SCOPE, "elementCount": self.edges.len() },
        ]);

        json!([
            { "CXVersion": CX_VERSION, "hasFragments": false },
            { "metaData": metadata },
            { "attributeDeclarations": declarations },
            { NETWORK_SCOPE: [self.attributes] },
            { NODE_SCOPE: self.nodes },
            { EDGE_SCOPE: self.edges },
            { "status": [{ "error": "", "success": true }] },
        ])
    }
}

fn decode_aspect<T: DeserializeOwned>(
    aspect: &'static str,
    body: Value,
) -> Result<T, NetworkFormatError> {
    serde_json::from_value(body)
        .map_err(|source| NetworkFormatError::InvalidAspect { aspect, source })
}
