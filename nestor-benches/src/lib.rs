//! Benchmark support crate for nestor.
//!
//! Provides a seeded generator of multi-resolution clusterings, plus the
//! matching parameter and error types, for the Criterion benchmarks of
//! assembly, refinement and the end-to-end pipeline.

pub mod error;
pub mod params;
pub mod source;
