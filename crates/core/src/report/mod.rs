//! End-to-end report pipeline.
//!
//! Takes the three materialized input batches (classes with dependencies, raw
//! function rows, overrides), demangles function names, classifies every
//! class, and folds the result into the requested hierarchy shapes.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::classify::{FunctionIndex, OverrideTable};
use crate::demangle::demangle;
use crate::graph::{build_graph, build_tree, DependencyMap, FlatGraph, GraphError, TreeNode};
use crate::model::{ClassStatus, ClassStatusKind, FunctionQuality, FunctionRecord, QualifiedName};

/// Function row as handed over by the metadata collaborator, name still raw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawFunction {
    pub address: u64,
    pub quality: FunctionQuality,
    pub size: u64,
    pub name: String,
}

impl RawFunction {
    /// Resolve the raw symbol into a [`FunctionRecord`].
    pub fn resolve(&self) -> FunctionRecord {
        FunctionRecord::new(self.address, self.quality, self.size, demangle(&self.name))
    }
}

/// Keeps only names whose top-level namespace is recognized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceFilter {
    namespaces: BTreeSet<String>,
}

impl NamespaceFilter {
    pub fn new<I, S>(namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { namespaces: namespaces.into_iter().map(Into::into).collect() }
    }

    /// An empty filter accepts every name.
    pub fn accepts(&self, name: &QualifiedName) -> bool {
        self.namespaces.is_empty() || self.namespaces.contains(name.top_level())
    }
}

/// Everything the pipeline needs, fully in memory.
#[derive(Debug, Clone, Default)]
pub struct ReportInputs {
    pub classes: DependencyMap,
    pub functions: Vec<RawFunction>,
    pub overrides: OverrideTable,
}

/// Which hierarchy shapes to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Tree,
    Graph,
    #[default]
    Both,
}

impl ReportFormat {
    pub fn wants_tree(self) -> bool {
        matches!(self, ReportFormat::Tree | ReportFormat::Both)
    }

    pub fn wants_graph(self) -> bool {
        matches!(self, ReportFormat::Graph | ReportFormat::Both)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub undecompiled: usize,
    pub partial: usize,
    pub decompiled: usize,
}

impl StatusCounts {
    fn record(&mut self, status: ClassStatusKind) {
        match status {
            ClassStatusKind::Undecompiled => self.undecompiled += 1,
            ClassStatusKind::Partial => self.partial += 1,
            ClassStatusKind::Decompiled => self.decompiled += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.undecompiled + self.partial + self.decompiled
    }
}

/// Aggregate progress numbers for a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSummary {
    pub classes: usize,
    pub counts: StatusCounts,
    pub methods: usize,
    pub total_binary_size: u64,
    pub functions: usize,
    pub overrides: usize,
    /// Counts by top-level namespace.
    pub per_namespace: BTreeMap<String, StatusCounts>,
}

impl ProgressSummary {
    pub fn from_statuses(statuses: &[ClassStatus]) -> Self {
        let mut summary = ProgressSummary { classes: statuses.len(), ..Default::default() };
        for status in statuses {
            summary.counts.record(status.status);
            summary
                .per_namespace
                .entry(status.class.top_level().to_string())
                .or_default()
                .record(status.status);
            summary.methods += status.method_count;
            summary.total_binary_size =
                summary.total_binary_size.saturating_add(status.total_binary_size);
        }
        summary
    }
}

/// Output of one pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub statuses: Vec<ClassStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tree: Option<TreeNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graph: Option<FlatGraph>,
    pub summary: ProgressSummary,
}

/// Restrict classes and their dependency targets to recognized namespaces.
pub fn filter_classes(classes: &DependencyMap, filter: &NamespaceFilter) -> DependencyMap {
    let mut kept = DependencyMap::new();
    let mut dropped = 0usize;
    for (class, deps) in classes {
        if !filter.accepts(class) {
            dropped += 1;
            continue;
        }
        let deps = deps.iter().filter(|d| filter.accepts(d) && *d != class).cloned().collect();
        kept.insert(class.clone(), deps);
    }
    if dropped > 0 {
        warn!(dropped, "classes outside recognized namespaces were skipped");
    }
    kept
}

/// Demangle every function row.
pub fn resolve_functions(functions: &[RawFunction]) -> Vec<FunctionRecord> {
    functions.iter().map(RawFunction::resolve).collect()
}

/// Class names in lexicographic order of their joined form.
///
/// This differs from the map's segment-wise key order when a segment is a
/// prefix of a sibling (`ksys::a0` sorts before `ksys::a::X`).
pub fn class_order(classes: &DependencyMap) -> Vec<&QualifiedName> {
    let mut names: Vec<&QualifiedName> = classes.keys().collect();
    names.sort_by_cached_key(|name| name.joined());
    names
}

/// Classify every class in lexicographic order of its joined name.
pub fn classify_all(
    classes: &DependencyMap,
    functions: &[FunctionRecord],
    overrides: &OverrideTable,
) -> Vec<ClassStatus> {
    let index = FunctionIndex::build(functions);
    debug!(
        functions = functions.len(),
        free_functions = index.free_functions(),
        "function index built"
    );
    class_order(classes).into_iter().map(|class| index.classify(class, overrides)).collect()
}

/// Run the whole pipeline.
///
/// Classes are taken in lexicographic order of their joined names (see
/// [`class_order`]), so node ids are stable across runs.
pub fn build_report(
    inputs: &ReportInputs,
    filter: &NamespaceFilter,
    format: ReportFormat,
) -> Result<Report, GraphError> {
    let classes = filter_classes(&inputs.classes, filter);
    let functions = resolve_functions(&inputs.functions);
    let statuses = classify_all(&classes, &functions, &inputs.overrides);

    let tree = if format.wants_tree() { Some(build_tree(&statuses)?) } else { None };
    let graph = if format.wants_graph() { Some(build_graph(&statuses, &classes)?) } else { None };

    let mut summary = ProgressSummary::from_statuses(&statuses);
    summary.functions = functions.len();
    summary.overrides = inputs.overrides.len();
    info!(
        classes = summary.classes,
        decompiled = summary.counts.decompiled,
        partial = summary.counts.partial,
        "report built"
    );

    Ok(Report { statuses, tree, graph, summary })
}
