use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::project::{ProjectConfig, ProjectLayout};

/// Load the project config JSON from disk for a given layout.
pub fn load_project_config(layout: &ProjectLayout) -> Result<ProjectConfig> {
    let config_json = std::fs::read_to_string(&layout.project_config_path).with_context(|| {
        format!("Failed to read project config at {}", layout.project_config_path.display())
    })?;
    let config: ProjectConfig =
        serde_json::from_str(&config_json).context("Failed to parse project config JSON")?;
    Ok(config)
}

/// Convenience wrapper bundling layout and config.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    pub layout: ProjectLayout,
    pub config: ProjectConfig,
}

impl ProjectContext {
    /// Load the project config for a given root.
    pub fn from_root(root: impl AsRef<Path>) -> Result<Self> {
        let layout = ProjectLayout::new(root);
        let config = load_project_config(&layout)?;
        Ok(Self { layout, config })
    }

    pub fn classes_path(&self) -> PathBuf {
        self.layout.resolve(&self.config.inputs.classes)
    }

    pub fn functions_path(&self) -> PathBuf {
        self.layout.resolve(&self.config.inputs.functions)
    }

    pub fn overrides_dir(&self) -> PathBuf {
        self.layout.resolve(&self.config.inputs.overrides_dir)
    }
}
