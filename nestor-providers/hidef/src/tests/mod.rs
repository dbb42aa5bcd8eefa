pub(crate) use super::{HidefError, HidefProducer, NodesFormatError, parse_nodes, parse_nodes_file};
