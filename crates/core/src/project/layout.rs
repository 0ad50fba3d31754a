use std::path::{Path, PathBuf};

/// Logical layout of a project on disk.
///
/// This is derived from a chosen root path. It does *not* perform any IO itself.
/// The CLI or other frontends are responsible for actually creating directories
/// and files based on this layout.
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    /// Root directory of the project.
    pub root: PathBuf,
    /// Directory for internal metadata (.progress).
    pub meta_dir: PathBuf,
    /// Path to the project config file (JSON).
    pub project_config_path: PathBuf,
    /// Directory for input snapshots (data).
    pub data_dir: PathBuf,
    /// Directory for per-namespace override tables (data/overrides).
    pub overrides_dir: PathBuf,
    /// Directory for generated reports (reports).
    pub reports_dir: PathBuf,
}

impl ProjectLayout {
    /// Compute the default layout for a project rooted at `root`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        let meta_dir = root.join(".progress");
        let project_config_path = meta_dir.join("project.json");
        let data_dir = root.join("data");
        let overrides_dir = data_dir.join("overrides");
        let reports_dir = root.join("reports");

        Self { root, meta_dir, project_config_path, data_dir, overrides_dir, reports_dir }
    }

    /// Resolve a configured path: absolute paths are kept, relative ones are
    /// joined onto the project root.
    pub fn resolve(&self, configured: &str) -> PathBuf {
        let path = Path::new(configured);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Express `path` relative to the root when it lives under it.
    pub fn relative_string(&self, path: &Path) -> String {
        match path.strip_prefix(&self.root) {
            Ok(rel) => rel.to_string_lossy().to_string(),
            Err(_) => path.to_string_lossy().to_string(),
        }
    }
}
