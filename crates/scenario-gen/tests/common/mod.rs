//! Shared test utilities for scenario-gen integration tests.
//!
//! - `TestHarness` for isolated runs with temp directories and a file-backed store
//! - Test doubles for the generator and store collaborators

pub mod doubles;
pub mod harness;

pub use doubles::*;
pub use harness::TestHarness;
