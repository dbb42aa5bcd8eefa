//! Nestor core library.
//!
//! Builds a multi-resolution hierarchy of nested systems from an interaction
//! network. Raw clusters produced at several resolutions by an external
//! [`ClusterProducer`] are assembled into a containment DAG, refined by
//! containment pruning, jaccard merging, minimum-difference collapsing and
//! size filtering, and finally annotated as a CX2 [`Network`].
#![cfg_attr(docsrs, feature(doc_cfg))]

mod annotate;
mod builder;
mod cluster;
mod edgelist;
mod error;
mod hierarchy;
mod nestor;
mod network;

#[cfg(test)]
mod test_utils;

pub use crate::{
    annotate::{
        AnnotationOptions, DEFAULT_HIERARCHY_NAME, InteractomeRef, annotate, apply_interactome,
        attributes,
    },
    builder::NestorBuilder,
    cluster::{
        ClusterProducer, ClusterProducerError, ClusterProducerErrorCode, LevelOrder,
        ProduceRequest, RawCluster, RawClustering, ResolutionParams,
    },
    edgelist::{EDGE_LIST_FILE_NAME, write_edge_list, write_edge_list_file},
    error::{NestorError, NestorErrorCode, Result, Stage},
    hierarchy::{
        AssemblyError, AssemblyErrorCode, ContainmentEdge, ContainmentReport, Hierarchy,
        HierarchyError, HierarchyErrorCode, RefinementReport, Refiner, System, SystemId,
        Thresholds, assemble, containment_index, jaccard_index,
    },
    nestor::Nestor,
    network::{
        AttributeMap, Edge, EdgeId, Network, NetworkFormatError, NetworkFormatErrorCode, Node,
        NodeId,
    },
};
