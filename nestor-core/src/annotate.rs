//! Rendering of a refined hierarchy as an annotated CX2 network.

use serde_json::Value;
use tracing::{info, instrument};

use crate::{
    hierarchy::Hierarchy,
    network::{Edge, Network, NetworkFormatError, Node, NodeId},
};

/// Default value of the hierarchy's `name` network attribute.
pub const DEFAULT_HIERARCHY_NAME: &str = "Hierarchy generated by community detection service app";

/// Attribute names written by [`annotate`].
pub mod attributes {
    /// Display name of the network or a node.
    pub const NAME: &str = "name";
    /// Free-text description of how the hierarchy was built.
    pub const DESCRIPTION: &str = "description";
    /// Schema marker identifying a hierarchy network.
    pub const NDEX_SCHEMA: &str = "ndexSchema";
    /// Value of [`NDEX_SCHEMA`].
    pub const HIERARCHY_SCHEMA: &str = "hierarchy_v0.1";
    /// Number of model files that make up the hierarchy.
    pub const MODEL_FILE_COUNT: &str = "HCX::modelFileCount";
    /// Tool that produced the hierarchy.
    pub const GENERATED_BY: &str = "prov:wasGeneratedBy";
    /// Identifier of the interaction network on the network server.
    pub const INTERACTION_NETWORK_UUID: &str = "HCX::interactionNetworkUUID";
    /// Name of the interaction network.
    pub const INTERACTION_NETWORK_NAME: &str = "HCX::interactionNetworkName";
    /// Space-separated member names of a system.
    pub const MEMBER_LIST: &str = "CD_MemberList";
    /// Number of members of a system.
    pub const MEMBER_LIST_SIZE: &str = "CD_MemberList_Size";
    /// Whether a system carries a curated label.
    pub const LABELED: &str = "CD_Labeled";
    /// Curated label of a system.
    pub const COMMUNITY_NAME: &str = "CD_CommunityName";
    /// Whether a system is top-level.
    pub const IS_ROOT: &str = "HCX::isRoot";
    /// Interaction network node ids of a system's members.
    pub const MEMBERS: &str = "HCX::members";
    /// Persistence reported by the cluster producer.
    pub const PERSISTENCE: &str = "HiDeF_persistence";
}

/// Reference from the hierarchy back to the interaction network.
///
/// # Examples
/// ```
/// use nestor_core::InteractomeRef;
///
/// let by_uuid = InteractomeRef::resolve(Some("0f5c"), Some("BioPlex"));
/// assert_eq!(by_uuid, Some(InteractomeRef::Uuid("0f5c".to_owned())));
///
/// let by_name = InteractomeRef::resolve(None, Some("BioPlex"));
/// assert_eq!(by_name, Some(InteractomeRef::Name("BioPlex".to_owned())));
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum InteractomeRef {
    /// Identifier of the stored interaction network.
    Uuid(String),
    /// Name of the interaction network.
    Name(String),
}

impl InteractomeRef {
    /// Prefers an explicit identifier and falls back to the network name.
    #[must_use]
    pub fn resolve(uuid: Option<&str>, name: Option<&str>) -> Option<Self> {
        match (uuid, name) {
            (Some(uuid), _) if !uuid.is_empty() => Some(Self::Uuid(uuid.to_owned())),
            (_, Some(name)) => Some(Self::Name(name.to_owned())),
            _ => None,
        }
    }
}

/// Writes the interactome reference, keeping the two forms exclusive.
pub fn apply_interactome(network: &mut Network, reference: &InteractomeRef) {
    match reference {
        InteractomeRef::Uuid(uuid) => {
            network.remove_network_attribute(attributes::INTERACTION_NETWORK_NAME);
            network.add_network_attribute(attributes::INTERACTION_NETWORK_UUID, uuid.as_str());
        }
        InteractomeRef::Name(name) => {
            network.remove_network_attribute(attributes::INTERACTION_NETWORK_UUID);
            network.add_network_attribute(attributes::INTERACTION_NETWORK_NAME, name.as_str());
        }
    }
}

/// Network-level settings applied by [`annotate`].
#[derive(Clone, Debug, PartialEq)]
pub struct AnnotationOptions {
    /// Value of the `name` attribute.
    pub name: String,
    /// Value of the `description` attribute, when known.
    pub description: Option<String>,
    /// Link back to the interaction network.
    pub interactome: Option<InteractomeRef>,
}

impl Default for AnnotationOptions {
    fn default() -> Self {
        Self {
            name: DEFAULT_HIERARCHY_NAME.to_owned(),
            description: None,
            interactome: None,
        }
    }
}

/// Renders `hierarchy` as a network whose nodes are systems and whose edges
/// point from parent to child.
///
/// Member names are looked up in `parent`; members without a `name`
/// attribute are listed by id.
///
/// # Errors
/// Returns [`NetworkFormatError`] if the hierarchy cannot be expressed as a
/// network, which only happens when system ids collide.
///
/// # Examples
/// ```
/// use nestor_core::{AnnotationOptions, Hierarchy, Network, Node, RawCluster, annotate};
///
/// let mut parent = Network::new();
/// for (id, name) in [(1, "A"), (2, "B")] {
///     parent.add_node(Node::new(id).with_attribute("name", name))?;
/// }
/// let mut hierarchy = Hierarchy::new();
/// hierarchy.insert(RawCluster::new(0, [1, 2]));
///
/// let rendered = annotate(&hierarchy, &parent, &AnnotationOptions::default())?;
/// let node = &rendered.nodes()[0];
/// assert_eq!(node.name(), Some("C0"));
/// assert_eq!(node.attribute("CD_MemberList").and_then(|v| v.as_str()), Some("A B"));
/// # Ok::<(), nestor_core::NetworkFormatError>(())
/// ```
#[instrument(
    name = "core.annotate",
    err,
    skip(hierarchy, parent, options),
    fields(systems = hierarchy.len(), edges = hierarchy.edge_count()),
)]
pub fn annotate(
    hierarchy: &Hierarchy,
    parent: &Network,
    options: &AnnotationOptions,
) -> Result<Network, NetworkFormatError> {
    let mut network = Network::new();
    network.add_network_attribute(attributes::NAME, options.name.as_str());
    network.add_network_attribute(attributes::NDEX_SCHEMA, attributes::HIERARCHY_SCHEMA);
    network.add_network_attribute(attributes::MODEL_FILE_COUNT, 2);
    if let Some(description) = &options.description {
        network.add_network_attribute(attributes::DESCRIPTION, description.as_str());
    }
    network.add_network_attribute(
        attributes::GENERATED_BY,
        concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION")),
    );
    if let Some(reference) = &options.interactome {
        apply_interactome(&mut network, reference);
    }

    for system in hierarchy.systems() {
        let members: Vec<NodeId> = system.members().iter().copied().collect();
        let names: Vec<String> = members
            .iter()
            .map(|&member| member_name(parent, member))
            .collect();
        let mut node = Node::new(system.id().get() as NodeId)
            .with_attribute(attributes::NAME, system.id().to_string())
            .with_attribute(attributes::MEMBER_LIST, names.join(" "))
            .with_attribute(attributes::MEMBER_LIST_SIZE, members.len())
            .with_attribute(attributes::LABELED, false)
            .with_attribute(attributes::COMMUNITY_NAME, "")
            .with_attribute(attributes::IS_ROOT, system.is_top_level())
            .with_attribute(attributes::MEMBERS, members);
        if let Some(persistence) = system.persistence() {
            node = node.with_attribute(attributes::PERSISTENCE, persistence);
        }
        network.add_node(node)?;
    }

    for (index, edge) in hierarchy.edges().into_iter().enumerate() {
        network.add_edge(Edge::new(
            index as u64,
            edge.parent.get() as NodeId,
            edge.child.get() as NodeId,
        ))?;
    }

    info!(
        nodes = network.node_count(),
        edges = network.edge_count(),
        "annotated hierarchy"
    );
    Ok(network)
}

fn member_name(parent: &Network, member: NodeId) -> String {
    parent
        .node(member)
        .and_then(|node| node.attribute(attributes::NAME))
        .and_then(Value::as_str)
        .map_or_else(|| member.to_string(), str::to_owned)
}
