//! Edge extraction into the tab-separated format consumed by producers.

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use tracing::{Span, field, instrument};

use crate::{Result, error::NestorError, network::Network};

/// File name used for the extracted edge list.
pub const EDGE_LIST_FILE_NAME: &str = "edgelist.tsv";

/// Writes one `source\ttarget` line per edge in network order.
///
/// # Errors
/// Returns any error raised by `writer`.
///
/// # Examples
/// ```
/// use nestor_core::{Edge, Network, Node, write_edge_list};
///
/// let mut network = Network::new();
/// network.add_node(Node::new(1))?;
/// network.add_node(Node::new(2))?;
/// network.add_edge(Edge::new(0, 2, 1))?;
///
/// let mut out = Vec::new();
/// write_edge_list(&network, &mut out)?;
/// assert_eq!(out, b"2\t1\n");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn write_edge_list<W: Write>(network: &Network, mut writer: W) -> io::Result<()> {
    for edge in network.edges() {
        writeln!(writer, "{}\t{}", edge.source(), edge.target())?;
    }
    writer.flush()
}

/// Writes the edge list of `network` to `dir/edgelist.tsv`.
///
/// # Errors
/// Returns [`NestorError::Io`] when the file cannot be created or written.
#[instrument(
    name = "core.write_edge_list",
    err,
    skip(network, dir),
    fields(edges = network.edge_count(), path = field::Empty),
)]
pub fn write_edge_list_file(network: &Network, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(EDGE_LIST_FILE_NAME);
    Span::current().record("path", field::display(path.display()));
    let io_error = |source| NestorError::Io {
        path: path.clone(),
        source,
    };
    let file = File::create(&path).map_err(io_error)?;
    write_edge_list(network, BufWriter::new(file)).map_err(io_error)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Edge, NestorErrorCode, Node};

    fn chain() -> Network {
        let mut network = Network::new();
        for id in [10, 20, 30] {
            network.add_node(Node::new(id)).expect("fresh node");
        }
        network.add_edge(Edge::new(1, 20, 30)).expect("edge 1");
        network.add_edge(Edge::new(0, 10, 20)).expect("edge 0");
        network
    }

    #[test]
    fn preserves_network_edge_order() {
        let mut out = Vec::new();
        write_edge_list(&chain(), &mut out).expect("write to memory");
        assert_eq!(String::from_utf8(out).expect("utf-8"), "20\t30\n10\t20\n");
    }

    #[test]
    fn edgeless_network_writes_empty_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = write_edge_list_file(&Network::new(), dir.path()).expect("write file");
        assert_eq!(path, dir.path().join(EDGE_LIST_FILE_NAME));
        assert_eq!(std::fs::read(&path).expect("read back").len(), 0);
    }

    #[test]
    fn missing_directory_surfaces_io_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let missing = dir.path().join("absent");
        let err = write_edge_list_file(&chain(), &missing).expect_err("directory is absent");
        assert_eq!(err.code(), NestorErrorCode::Io);
        assert!(err.to_string().contains(EDGE_LIST_FILE_NAME));
    }
}
