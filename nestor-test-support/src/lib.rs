//! Shared test utilities used across nestor crates.
//!
//! [`recording`] captures spans and events so suites can assert on
//! instrumentation; [`proptest_profile`] reads the environment overrides that
//! tune property-test runs.

pub mod proptest_profile;
pub mod recording;
