use nestor_core::{
    ClusterProducer, ClusterProducerError, LevelOrder, ProduceRequest, RawCluster, RawClustering,
};
use serde_json::{Value, json};

/// Producer that replays fixed member lists, one group per level.
#[derive(Clone)]
pub struct Replay {
    levels: Vec<Vec<Vec<u64>>>,
    order: LevelOrder,
}

impl Replay {
    #[must_use]
    pub fn coarse_to_fine(levels: Vec<Vec<Vec<u64>>>) -> Self {
        Self {
            levels,
            order: LevelOrder::CoarseToFine,
        }
    }

    #[must_use]
    pub fn fine_to_coarse(levels: Vec<Vec<Vec<u64>>>) -> Self {
        Self {
            levels,
            order: LevelOrder::FineToCoarse,
        }
    }
}

impl ClusterProducer for Replay {
    fn name(&self) -> &str {
        "replay"
    }

    fn produce(&self, request: &ProduceRequest<'_>) -> Result<RawClustering, ClusterProducerError> {
        if request.edge_lists.iter().any(|path| !path.is_file()) {
            return Err(ClusterProducerError::MissingOutput {
                path: request.scratch_dir.to_path_buf(),
            });
        }
        let levels = self
            .levels
            .iter()
            .enumerate()
            .map(|(level, clusters)| {
                clusters
                    .iter()
                    .map(|members| RawCluster::new(level, members.iter().copied()))
                    .collect()
            })
            .collect();
        Ok(RawClustering::new(levels, self.order))
    }
}

/// CX2 document with `nodes` genes named `G<id>` joined in a ring.
#[must_use]
pub fn ring_cx2(nodes: u64) -> Value {
    let node_entries: Vec<Value> = (0..nodes)
        .map(|id| json!({ "id": id, "v": { "n": format!("G{id}") } }))
        .collect();
    let edge_entries: Vec<Value> = (0..nodes)
        .map(|id| json!({ "id": id, "s": id, "t": (id + 1) % nodes }))
        .collect();
    json!([
        { "CXVersion": "2.0", "hasFragments": false },
        { "metaData": [
            { "name": "nodes", "elementCount": nodes },
            { "name": "edges", "elementCount": nodes }
        ] },
        { "attributeDeclarations": [{
            "networkAttributes": { "name": { "d": "string" } },
            "nodes": { "name": { "d": "string", "a": "n" } }
        }] },
        { "networkAttributes": [{ "name": "ring" }] },
        { "nodes": node_entries },
        { "edges": edge_entries },
        { "visualProperties": [{ "default": {} }] },
        { "status": [{ "error": "", "success": true }] }
    ])
}
