use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use progress_core::project::ProjectContext;
use progress_core::report::{build_report, ProgressSummary, Report, ReportFormat};
use serde::{Deserialize, Serialize};

use crate::commands::{load_inputs, override_files, write_json};
use crate::{canonicalize_or_current, sha256_file};

pub fn parse_report_format(format: &str) -> Result<ReportFormat> {
    match format {
        "tree" => Ok(ReportFormat::Tree),
        "graph" => Ok(ReportFormat::Graph),
        "both" => Ok(ReportFormat::Both),
        other => Err(anyhow!("Invalid format '{}'. Allowed: tree, graph, both", other)),
    }
}

/// SHA-256 of each input snapshot, identifying what a report was built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputHashes {
    pub classes: String,
    pub functions: String,
    /// `file name -> hash` for each override table.
    #[serde(default)]
    pub overrides: Vec<(String, String)>,
}

/// Contents of `summary.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryFile {
    pub project: String,
    pub tool_version: String,
    pub inputs: InputHashes,
    pub summary: ProgressSummary,
}

/// Paths written by one report run.
#[derive(Debug, Clone, Default)]
pub struct WrittenArtifacts {
    pub tree: Option<PathBuf>,
    pub graph: Option<PathBuf>,
    pub summary: PathBuf,
}

fn hash_inputs(ctx: &ProjectContext) -> Result<InputHashes> {
    let mut overrides = Vec::new();
    for path in override_files(&ctx.overrides_dir())? {
        let name = path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
        overrides.push((name, sha256_file(&path)?));
    }
    Ok(InputHashes {
        classes: sha256_file(&ctx.classes_path())?,
        functions: sha256_file(&ctx.functions_path())?,
        overrides,
    })
}

/// Load the project inputs and run the pipeline.
pub fn run_report(root: &Path, format: ReportFormat) -> Result<(ProjectContext, Report)> {
    let ctx = ProjectContext::from_root(root)?;
    let inputs = load_inputs(&ctx)?;
    let report = build_report(&inputs, &ctx.config.namespace_filter(), format)
        .context("Failed to build class hierarchy")?;
    Ok((ctx, report))
}

/// Write the report artifacts configured for the project.
pub fn write_report(ctx: &ProjectContext, report: &Report) -> Result<WrittenArtifacts> {
    let mut written = WrittenArtifacts::default();
    if let Some(tree) = &report.tree {
        let path = ctx.layout.resolve(&ctx.config.outputs.tree);
        write_json(&path, tree)?;
        written.tree = Some(path);
    }
    if let Some(graph) = &report.graph {
        let path = ctx.layout.resolve(&ctx.config.outputs.graph);
        write_json(&path, graph)?;
        written.graph = Some(path);
    }

    let summary = SummaryFile {
        project: ctx.config.name.clone(),
        tool_version: progress_core::version().to_string(),
        inputs: hash_inputs(ctx)?,
        summary: report.summary.clone(),
    };
    written.summary = ctx.layout.resolve(&ctx.config.outputs.summary);
    write_json(&written.summary, &summary)?;
    Ok(written)
}

/// Build the progress report and write (or print) the artifacts.
pub fn build_report_command(root: &str, format: &str, stdout: bool) -> Result<()> {
    let format = parse_report_format(format)?;
    let root_path = canonicalize_or_current(root)?;
    let (ctx, report) = run_report(&root_path, format)?;

    if stdout {
        match (&report.tree, &report.graph) {
            (Some(tree), None) => println!("{}", serde_json::to_string_pretty(tree)?),
            (None, Some(graph)) => println!("{}", serde_json::to_string_pretty(graph)?),
            _ => println!("{}", serde_json::to_string_pretty(&report)?),
        }
        return Ok(());
    }

    let written = write_report(&ctx, &report)?;
    let summary = &report.summary;
    println!("Built progress report for {}:", ctx.config.name);
    println!("  Classes: {}", summary.classes);
    println!("  Decompiled: {}", summary.counts.decompiled);
    println!("  Partially decompiled: {}", summary.counts.partial);
    println!("  Undecompiled: {}", summary.counts.undecompiled);
    println!("  Matched methods: {} of {} functions", summary.methods, summary.functions);
    if let Some(path) = &written.tree {
        println!("  Tree: {}", path.display());
    }
    if let Some(path) = &written.graph {
        println!("  Graph: {}", path.display());
    }
    println!("  Summary: {}", written.summary.display());

    Ok(())
}
