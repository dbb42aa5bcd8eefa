//! Command-line interface for building a community hierarchy.
//!
//! Parses the service-style arguments, loads the CX2 input, runs the
//! pipeline inside a scratch directory and renders the hierarchy as a
//! one-element JSON array.

mod commands;

pub use commands::{Cli, CliError, render_hierarchy, run_cli, run_with_producer};

#[cfg(test)]
mod test_fixtures;
