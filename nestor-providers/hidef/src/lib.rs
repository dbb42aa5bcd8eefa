//! Cluster producer backed by the external HiDeF community finder.
//!
//! [`HidefProducer`] runs the finder as a subprocess over the edge lists
//! written by `nestor-core`, then parses the `.nodes` file it leaves in the
//! scratch directory into a [`nestor_core::RawClustering`].

mod errors;
mod nodes;
mod producer;

pub use errors::{HidefError, NodesFormatError};
pub use nodes::{parse_nodes, parse_nodes_file};
pub use producer::{DEFAULT_HIDEF_COMMAND, HidefProducer, OUTPUT_PREFIX};

#[cfg(test)]
mod tests;
