use std::fs;

use anyhow::{Context, Result};
use progress_core::project::{ProjectConfig, ProjectContext, ProjectLayout};
use serde::Serialize;

use crate::commands::{print_dir_status, print_file_status};
use crate::{canonicalize_or_current, infer_project_name};

#[derive(Serialize)]
pub struct ProjectInfoSnapshot {
    pub name: String,
    pub root: String,
    pub config_file: String,
    pub config_version: String,
    pub namespaces: Vec<String>,
    pub inputs: ProjectInfoInputs,
    pub layout: ProjectInfoLayout,
}

/// Input paths, relative to the project root when they live under it.
#[derive(Serialize)]
pub struct ProjectInfoInputs {
    pub classes: String,
    pub classes_present: bool,
    pub functions: String,
    pub functions_present: bool,
    pub overrides_dir: String,
    pub overrides_present: bool,
}

#[derive(Serialize)]
pub struct ProjectInfoLayout {
    pub meta_dir: String,
    pub data_dir: String,
    pub overrides_dir: String,
    pub reports_dir: String,
}

/// Initialize a new project at `root`.
pub fn init_project_command(root: &str, name: Option<String>) -> Result<()> {
    let root_path = canonicalize_or_current(root)?;
    let layout = ProjectLayout::new(&root_path);

    // Derive project name if not provided.
    let project_name = match name {
        Some(n) => n,
        None => infer_project_name(&root_path),
    };

    // Ensure directories exist.
    fs::create_dir_all(&layout.meta_dir)
        .with_context(|| format!("Failed to create meta dir: {}", layout.meta_dir.display()))?;
    fs::create_dir_all(&layout.overrides_dir).with_context(|| {
        format!("Failed to create overrides dir: {}", layout.overrides_dir.display())
    })?;
    fs::create_dir_all(&layout.reports_dir).with_context(|| {
        format!("Failed to create reports dir: {}", layout.reports_dir.display())
    })?;

    let config = ProjectConfig::new(&project_name);
    let json = serde_json::to_string_pretty(&config)?;
    fs::write(&layout.project_config_path, json).with_context(|| {
        format!("Failed to write project config: {}", layout.project_config_path.display())
    })?;

    println!("Initialized decompilation progress project:");
    println!("  Name: {}", project_name);
    println!("  Root: {}", layout.root.display());
    println!("  Config: {}", layout.project_config_path.display());
    println!("  Namespaces: {}", config.namespaces.join(", "));
    println!("  Data dir: {}", layout.data_dir.display());
    println!("  Overrides dir: {}", layout.overrides_dir.display());
    println!("  Reports dir: {}", layout.reports_dir.display());

    Ok(())
}

/// Show basic information about an existing project.
pub fn project_info_command(root: &str, json: bool) -> Result<()> {
    let root_path = canonicalize_or_current(root)?;
    let ctx = ProjectContext::from_root(&root_path)?;
    let (layout, config) = (&ctx.layout, &ctx.config);

    let classes = ctx.classes_path();
    let functions = ctx.functions_path();
    let overrides = ctx.overrides_dir();

    if json {
        let snapshot = ProjectInfoSnapshot {
            name: config.name.clone(),
            root: layout.root.display().to_string(),
            config_file: layout.project_config_path.display().to_string(),
            config_version: config.config_version.clone(),
            namespaces: config.namespaces.clone(),
            inputs: ProjectInfoInputs {
                classes: layout.relative_string(&classes),
                classes_present: classes.is_file(),
                functions: layout.relative_string(&functions),
                functions_present: functions.is_file(),
                overrides_dir: layout.relative_string(&overrides),
                overrides_present: overrides.is_dir(),
            },
            layout: ProjectInfoLayout {
                meta_dir: layout.meta_dir.display().to_string(),
                data_dir: layout.data_dir.display().to_string(),
                overrides_dir: layout.overrides_dir.display().to_string(),
                reports_dir: layout.reports_dir.display().to_string(),
            },
        };
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    println!("Decompilation Progress Project Info");
    println!("===================================");
    println!("Name: {}", config.name);
    println!("Root: {}", layout.root.display());
    println!("Config file: {}", layout.project_config_path.display());
    println!("Config version: {}", config.config_version);
    if config.namespaces.is_empty() {
        println!("Namespaces: (all)");
    } else {
        println!("Namespaces: {}", config.namespaces.join(", "));
    }
    println!();

    println!("Inputs:");
    print_file_status("Classes", &classes);
    print_file_status("Functions", &functions);
    print_dir_status("Overrides dir", &overrides);
    println!();

    println!("Directories:");
    print_dir_status("Meta dir (.progress)", &layout.meta_dir);
    print_dir_status("Data dir", &layout.data_dir);
    print_dir_status("Reports dir", &layout.reports_dir);

    Ok(())
}
