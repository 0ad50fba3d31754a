use serde::{Deserialize, Serialize};

use crate::report::NamespaceFilter;

/// Top-level namespaces recognized when no list is configured.
pub const DEFAULT_NAMESPACES: &[&str] = &["ksys", "uking"];

/// Where the input snapshots live, relative to the project root unless absolute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputPaths {
    /// Class set with dependencies (JSON object) or bare class list (JSON array).
    pub classes: String,
    /// Function metadata table (CSV or JSON).
    pub functions: String,
    /// Directory of per-namespace override tables (YAML or JSON).
    pub overrides_dir: String,
}

impl Default for InputPaths {
    fn default() -> Self {
        Self {
            classes: "data/classes.json".to_string(),
            functions: "data/functions.csv".to_string(),
            overrides_dir: "data/overrides".to_string(),
        }
    }
}

/// Where generated reports are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputPaths {
    pub tree: String,
    pub graph: String,
    pub summary: String,
}

impl Default for OutputPaths {
    fn default() -> Self {
        Self {
            tree: "reports/tree.json".to_string(),
            graph: "reports/graph.json".to_string(),
            summary: "reports/summary.json".to_string(),
        }
    }
}

/// Serializable configuration describing a progress project.
///
/// This lives at `.progress/project.json` in the project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Human-friendly project name.
    pub name: String,
    /// Optional description / notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Schema/config version. This is about the config format, not the codebase.
    pub config_version: String,
    /// Recognized top-level namespaces; empty keeps every class.
    #[serde(default = "default_namespaces")]
    pub namespaces: Vec<String>,
    #[serde(default)]
    pub inputs: InputPaths,
    #[serde(default)]
    pub outputs: OutputPaths,
}

fn default_namespaces() -> Vec<String> {
    DEFAULT_NAMESPACES.iter().map(|ns| ns.to_string()).collect()
}

impl ProjectConfig {
    /// Create a new project configuration with default paths and namespaces.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            config_version: "0.1.0".to_string(),
            namespaces: default_namespaces(),
            inputs: InputPaths::default(),
            outputs: OutputPaths::default(),
        }
    }

    pub fn namespace_filter(&self) -> NamespaceFilter {
        NamespaceFilter::new(self.namespaces.iter().cloned())
    }
}
