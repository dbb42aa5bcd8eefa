//! Pipeline orchestration for the Nestor library.
//!
//! Provides the [`Nestor`] entry point which chains edge extraction, the
//! external [`ClusterProducer`], assembly, refinement and annotation.

use std::{path::Path, sync::Arc};

use tracing::{Span, field, info, instrument, warn};

use crate::{
    Result,
    annotate::{AnnotationOptions, InteractomeRef, annotate},
    cluster::{ClusterProducer, ProduceRequest, ResolutionParams},
    edgelist::write_edge_list_file,
    error::NestorError,
    hierarchy::{Hierarchy, Refiner, Thresholds, assemble},
    network::Network,
};

/// Entry point for building a hierarchy from an interaction network.
///
/// # Examples
/// ```
/// use nestor_core::{
///     ClusterProducer, ClusterProducerError, Edge, LevelOrder, NestorBuilder, Network, Node,
///     ProduceRequest, RawCluster, RawClustering,
/// };
///
/// struct OneCluster;
///
/// impl ClusterProducer for OneCluster {
///     fn name(&self) -> &str { "one" }
///     fn produce(&self, _: &ProduceRequest<'_>) -> Result<RawClustering, ClusterProducerError> {
///         Ok(RawClustering::new(vec![vec![RawCluster::new(0, 0..5)]], LevelOrder::CoarseToFine))
///     }
/// }
///
/// let mut network = Network::new();
/// for id in 0..5 {
///     network.add_node(Node::new(id))?;
/// }
/// network.add_edge(Edge::new(0, 0, 1))?;
///
/// let scratch = tempfile::tempdir()?;
/// let nestor = NestorBuilder::new().build()?;
/// let hierarchy = nestor.run(&network, &OneCluster, scratch.path(), None)?;
/// assert_eq!(hierarchy.node_count(), 1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Nestor {
    thresholds: Thresholds,
    params: ResolutionParams,
    hierarchy_name: String,
}

impl Nestor {
    pub(crate) fn new(
        thresholds: Thresholds,
        params: ResolutionParams,
        hierarchy_name: String,
    ) -> Self {
        Self {
            thresholds,
            params,
            hierarchy_name,
        }
    }

    /// Returns the refinement thresholds.
    #[must_use]
    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Returns the parameters forwarded to the cluster producer.
    #[must_use]
    pub fn resolution_params(&self) -> &ResolutionParams {
        &self.params
    }

    /// Returns the `name` attribute given to emitted hierarchies.
    #[must_use]
    pub fn hierarchy_name(&self) -> &str {
        &self.hierarchy_name
    }

    /// Runs the full pipeline and renders the hierarchy as a CX2 network.
    ///
    /// `interactome_uuid` links the hierarchy to a stored interaction
    /// network; without it the input network's `name` is referenced instead.
    ///
    /// # Errors
    /// Returns [`NestorError::Io`] when the edge list cannot be written,
    /// [`NestorError::Clustering`] when the producer fails,
    /// [`NestorError::Assembly`] when its output does not match the network,
    /// and [`NestorError::Hierarchy`] if refinement broke containment.
    pub fn run<P>(
        &self,
        network: &Network,
        producer: &P,
        scratch: &Path,
        interactome_uuid: Option<&str>,
    ) -> Result<Network>
    where
        P: ClusterProducer + ?Sized,
    {
        let hierarchy = self.build_hierarchy(network, producer, scratch)?;
        let options = AnnotationOptions {
            name: self.hierarchy_name.clone(),
            description: Some(self.description()),
            interactome: InteractomeRef::resolve(interactome_uuid, network.name()),
        };
        Ok(annotate(&hierarchy, network, &options)?)
    }

    /// Runs the pipeline up to refinement and returns the hierarchy itself.
    ///
    /// An edgeless network yields an empty hierarchy without invoking the
    /// producer.
    ///
    /// # Errors
    /// See [`Nestor::run`].
    #[instrument(
        name = "core.run",
        err,
        skip(self, network, producer, scratch),
        fields(
            producer = %producer.name(),
            nodes = network.node_count(),
            edges = network.edge_count(),
            systems = field::Empty,
        ),
    )]
    pub fn build_hierarchy<P>(
        &self,
        network: &Network,
        producer: &P,
        scratch: &Path,
    ) -> Result<Hierarchy>
    where
        P: ClusterProducer + ?Sized,
    {
        if network.edge_count() == 0 {
            warn!("network has no edges, returning an empty hierarchy");
            Span::current().record("systems", 0);
            return Ok(Hierarchy::new());
        }

        let edge_list = write_edge_list_file(network, scratch)?;
        let edge_lists = [edge_list];
        let request = ProduceRequest {
            edge_lists: &edge_lists,
            scratch_dir: scratch,
            params: &self.params,
        };
        let clustering = producer
            .produce(&request)
            .map_err(|error| NestorError::Clustering {
                producer: Arc::from(producer.name()),
                error,
            })?;
        info!(
            levels = clustering.level_count(),
            clusters = clustering.cluster_count(),
            "cluster producer finished"
        );

        let mut hierarchy = assemble(clustering, Some(&network.node_ids()))?;
        Refiner::new(self.thresholds).refine(&mut hierarchy);
        hierarchy.validate()?;
        Span::current().record("systems", hierarchy.len());
        Ok(hierarchy)
    }

    fn description(&self) -> String {
        let thresholds = &self.thresholds;
        format!(
            "Hierarchy built with {} (maxres={}, k={}), refined with containment_threshold={}, \
             jaccard_threshold={}, min_diff={}, min_system_size={}",
            self.params.algorithm,
            self.params.max_resolution,
            self.params.k,
            thresholds.containment(),
            thresholds.jaccard(),
            thresholds.min_diff(),
            thresholds.min_system_size(),
        )
    }
}
