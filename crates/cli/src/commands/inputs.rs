use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use progress_core::classify::OverrideTable;
use progress_core::graph::DependencyMap;
use progress_core::model::{FunctionQuality, QualifiedName};
use progress_core::report::{RawFunction, ReportInputs};
use serde::Deserialize;
use tracing::debug;

/// Class snapshot: either `class -> [referenced classes]` or a bare class list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ClassesFile {
    WithDependencies(BTreeMap<String, Vec<String>>),
    Plain(Vec<String>),
}

/// One row of the function table as written on disk.
#[derive(Debug, Clone, Deserialize)]
pub struct FunctionRow {
    pub address: String,
    pub quality: String,
    pub size: u64,
    pub name: String,
}

impl FunctionRow {
    pub fn into_raw(self) -> Result<RawFunction> {
        let address = parse_address(&self.address)?;
        Ok(RawFunction {
            address,
            quality: FunctionQuality::from_code(&self.quality),
            size: self.size,
            name: self.name,
        })
    }
}

/// Override entry inside a per-namespace table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OverrideEntry {
    #[serde(default)]
    pub status: String,
}

/// `namespace -> class short name -> entry`.
pub type OverrideFile = BTreeMap<String, BTreeMap<String, OverrideEntry>>;

/// Parse a hex address with or without a `0x` prefix.
pub fn parse_address(text: &str) -> Result<u64> {
    let trimmed = text.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    u64::from_str_radix(digits, 16).with_context(|| format!("Invalid hex address '{text}'"))
}

/// Load the class snapshot.
pub fn load_classes(path: &Path) -> Result<DependencyMap> {
    let body = fs::read_to_string(path)
        .with_context(|| format!("Failed to read classes file at {}", path.display()))?;
    let parsed: ClassesFile = serde_json::from_str(&body)
        .with_context(|| format!("Failed to parse classes JSON at {}", path.display()))?;

    let classes: DependencyMap = match parsed {
        ClassesFile::WithDependencies(map) => map
            .into_iter()
            .map(|(class, deps)| {
                let deps: BTreeSet<QualifiedName> =
                    deps.iter().map(|d| QualifiedName::parse(d)).collect();
                (QualifiedName::parse(&class), deps)
            })
            .collect(),
        ClassesFile::Plain(list) => {
            list.iter().map(|class| (QualifiedName::parse(class), BTreeSet::new())).collect()
        }
    };
    debug!(classes = classes.len(), path = %path.display(), "loaded classes");
    Ok(classes)
}

/// Load the function table (`.json` or CSV).
pub fn load_functions(path: &Path) -> Result<Vec<RawFunction>> {
    let body = fs::read_to_string(path)
        .with_context(|| format!("Failed to read functions file at {}", path.display()))?;
    let is_json = path.extension().and_then(|e| e.to_str()) == Some("json");
    let functions = if is_json {
        let rows: Vec<FunctionRow> = serde_json::from_str(&body)
            .with_context(|| format!("Failed to parse functions JSON at {}", path.display()))?;
        rows.into_iter().map(FunctionRow::into_raw).collect::<Result<Vec<_>>>()?
    } else {
        parse_functions_csv(&body)
            .with_context(|| format!("Failed to parse functions CSV at {}", path.display()))?
    };
    debug!(functions = functions.len(), path = %path.display(), "loaded functions");
    Ok(functions)
}

/// Parse a function table with an `Address,Quality,Size,Name` header.
///
/// Columns are located by header name, so extra columns and other orders are
/// fine. Blank lines are skipped.
pub fn parse_functions_csv(body: &str) -> Result<Vec<RawFunction>> {
    let mut lines = body.lines().enumerate().filter(|(_, line)| !line.trim().is_empty());
    let (_, header) = lines.next().ok_or_else(|| anyhow!("Functions CSV is empty"))?;
    let header = split_csv_line(header);
    let column = |name: &str| {
        header
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
            .ok_or_else(|| anyhow!("Functions CSV is missing the '{name}' column"))
    };
    let (address_col, quality_col, size_col, name_col) =
        (column("Address")?, column("Quality")?, column("Size")?, column("Name")?);

    let mut functions = Vec::new();
    for (index, line) in lines {
        let line_no = index + 1;
        let fields = split_csv_line(line);
        let field = |col: usize| {
            fields
                .get(col)
                .map(|f| f.trim())
                .ok_or_else(|| anyhow!("Line {line_no}: expected at least {} fields", col + 1))
        };
        let size_text = field(size_col)?;
        let size = size_text
            .parse::<u64>()
            .with_context(|| format!("Line {line_no}: invalid size '{size_text}'"))?;
        let address = parse_address(field(address_col)?)
            .with_context(|| format!("Line {line_no}: bad address"))?;
        functions.push(RawFunction {
            address,
            quality: FunctionQuality::from_code(field(quality_col)?),
            size,
            name: field(name_col)?.to_string(),
        });
    }
    Ok(functions)
}

/// Split one CSV line, honouring double-quoted fields and `""` escapes.
pub fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match (c, in_quotes) {
            ('"', true) if chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            ('"', _) => in_quotes = !in_quotes,
            (',', false) => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

/// Override table files (`*.yaml`, `*.yml`, `*.json`) directly under `dir`,
/// sorted by path. A missing directory yields an empty list.
pub fn override_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    if !dir.is_dir() {
        return Ok(paths);
    }
    for entry in fs::read_dir(dir).with_context(|| format!("Failed to read {}", dir.display()))? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
        if matches!(ext, "yaml" | "yml" | "json") {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Load every override table under `dir` in file-name order.
///
/// A missing directory means no overrides. Later files replace earlier
/// entries for the same class.
pub fn load_overrides(dir: &Path) -> Result<OverrideTable> {
    let mut table = OverrideTable::new();
    let paths = override_files(dir)?;
    for path in paths {
        let body = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read override table {}", path.display()))?;
        let file: OverrideFile = if path.extension().and_then(|e| e.to_str()) == Some("json") {
            serde_json::from_str(&body)
                .with_context(|| format!("Failed to parse override table {}", path.display()))?
        } else {
            serde_yaml::from_str(&body)
                .with_context(|| format!("Failed to parse override table {}", path.display()))?
        };
        for (namespace, entries) in &file {
            table.extend_namespace(
                namespace,
                entries.iter().map(|(class, entry)| (class.as_str(), entry.status.as_str())),
            );
        }
    }
    debug!(overrides = table.len(), dir = %dir.display(), "loaded overrides");
    Ok(table)
}

/// Load all three input batches described by a project.
pub fn load_inputs(ctx: &progress_core::project::ProjectContext) -> Result<ReportInputs> {
    Ok(ReportInputs {
        classes: load_classes(&ctx.classes_path())?,
        functions: load_functions(&ctx.functions_path())?,
        overrides: load_overrides(&ctx.overrides_dir())?,
    })
}
