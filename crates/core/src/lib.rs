//! progress-core
//!
//! Core library for measuring decompilation progress of a large native codebase.
//!
//! The crate turns three batches of reverse-engineering facts (class names with
//! their dependencies, per-function metadata, curated status overrides) into a
//! classified namespace hierarchy:
//! - `demangle`: mangled symbol -> qualified name.
//! - `classify`: class + matched functions + overrides -> status.
//! - `graph`: classified classes -> deduplicated tree or flat graph.
//! - `report`: the whole pipeline, plus summary numbers.
//!
//! All substantive logic lives here so it is fully testable and reusable from
//! multiple frontends. Reading the input files and writing the artifacts is
//! left to the frontend.

pub mod model;
pub mod demangle;
pub mod classify;
pub mod graph;
pub mod report;
pub mod project;

/// Returns the library version as encoded at compile time.
///
/// Useful for tests and for frontends to report consistent version info.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
