//! Project layout and configuration.
//!
//! A project is a directory holding the input snapshots under `data/`, the
//! curated override tables under `data/overrides/`, and generated reports
//! under `reports/`. Its configuration lives at `.progress/project.json`.
//!
//! Nothing here touches the analysis itself; frontends use it to find inputs
//! and decide where outputs go.

pub mod config;
pub mod context;
pub mod layout;

pub use config::{InputPaths, OutputPaths, ProjectConfig, DEFAULT_NAMESPACES};
pub use context::{load_project_config, ProjectContext};
pub use layout::ProjectLayout;
