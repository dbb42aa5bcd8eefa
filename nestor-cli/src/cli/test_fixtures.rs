//! Inputs and producers shared by the CLI unit tests.

use std::{
    cell::RefCell,
    fs,
    io,
    path::{Path, PathBuf},
};

use nestor_core::{
    ClusterProducer, ClusterProducerError, LevelOrder, ProduceRequest, RawCluster, RawClustering,
};
use serde_json::{Value, json};

/// Producer returning fixed clusters and remembering the scratch directory.
pub(super) struct FixedProducer {
    outcome: Result<RawClustering, ClusterProducerError>,
    scratch_seen: RefCell<Option<PathBuf>>,
}

impl FixedProducer {
    pub(super) fn nested() -> Self {
        Self::with_outcome(Ok(RawClustering::new(
            vec![
                vec![RawCluster::new(0, 1..=8)],
                vec![RawCluster::new(1, 1..=4), RawCluster::new(1, 5..=8)],
            ],
            LevelOrder::CoarseToFine,
        )))
    }

    pub(super) fn failing(error: ClusterProducerError) -> Self {
        Self::with_outcome(Err(error))
    }

    fn with_outcome(outcome: Result<RawClustering, ClusterProducerError>) -> Self {
        Self {
            outcome,
            scratch_seen: RefCell::new(None),
        }
    }

    pub(super) fn scratch_seen(&self) -> Option<PathBuf> {
        self.scratch_seen.borrow().clone()
    }
}

impl ClusterProducer for FixedProducer {
    fn name(&self) -> &str {
        "fixed"
    }

    fn produce(&self, request: &ProduceRequest<'_>) -> Result<RawClustering, ClusterProducerError> {
        *self.scratch_seen.borrow_mut() = Some(request.scratch_dir.to_path_buf());
        self.outcome.clone()
    }
}

/// CX2 document with genes `1..=8` linked in a path.
pub(super) fn path_document() -> Value {
    let nodes: Vec<Value> = (1..=8)
        .map(|id| json!({ "id": id, "v": { "name": format!("G{id}") } }))
        .collect();
    let edges: Vec<Value> = (1..8)
        .map(|id| json!({ "id": id, "s": id, "t": id + 1 }))
        .collect();
    json!([
        { "CXVersion": "2.0", "hasFragments": false },
        { "networkAttributes": [{ "name": "path" }] },
        { "nodes": nodes },
        { "edges": edges },
        { "status": [{ "error": "", "success": true }] }
    ])
}

/// CX2 document with a single node and no edges.
pub(super) fn edgeless_document() -> Value {
    json!([
        { "CXVersion": "2.0", "hasFragments": false },
        { "nodes": [{ "id": 1 }] }
    ])
}

pub(super) fn write_document(dir: &Path, name: &str, document: &Value) -> io::Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, serde_json::to_vec(document)?)?;
    Ok(path)
}
