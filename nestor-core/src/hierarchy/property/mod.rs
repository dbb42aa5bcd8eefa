//! Property-based tests for hierarchy assembly and refinement.
//!
//! Fixtures are generated from seeded random clusterings in three shapes:
//! cleanly nested clusterings, clusterings dense with near-duplicates, and
//! hand-linked forests whose children leak members outside their parents.
//! The runners check the containment invariant, the size and difference
//! guarantees, idempotence, member coverage and threshold monotonicity.

mod properties;
mod strategies;
mod types;
