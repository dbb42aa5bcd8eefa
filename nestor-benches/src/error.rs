//! Benchmark setup error type.
//!
//! Lets setup functions propagate failures with `?` instead of `.expect()`.

use nestor_core::{AssemblyError, HierarchyError, NestorError, NetworkFormatError};

use crate::source::SyntheticError;

/// Errors that may occur during benchmark setup.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// Synthetic clustering generation failed.
    #[error("synthetic clustering generation failed: {0}")]
    Synthetic(#[from] SyntheticError),
    /// Assembling the synthetic clustering failed.
    #[error("assembly failed: {0}")]
    Assembly(#[from] AssemblyError),
    /// The hierarchy broke containment.
    #[error("hierarchy check failed: {0}")]
    Hierarchy(#[from] HierarchyError),
    /// Building the synthetic network failed.
    #[error("network construction failed: {0}")]
    Network(#[from] NetworkFormatError),
    /// Pipeline configuration or execution failed.
    #[error("pipeline failed: {0}")]
    Pipeline(#[from] NestorError),
    /// Creating the scratch directory failed.
    #[error("scratch directory could not be created: {0}")]
    Scratch(#[from] std::io::Error),
}
