use anyhow::Result;
use progress_core::classify::FunctionIndex;
use progress_core::demangle::{demangle, is_mangled};
use progress_core::model::{ClassStatus, QualifiedName};
use progress_core::project::ProjectContext;
use progress_core::report::resolve_functions;
use serde::Serialize;

use crate::canonicalize_or_current;
use crate::commands::{load_functions, load_overrides};

#[derive(Debug, Serialize)]
pub struct DemangledSymbol {
    pub raw: String,
    pub mangled: bool,
    pub name: QualifiedName,
    pub segments: Vec<String>,
}

/// Demangle each symbol and describe the result.
pub fn demangle_symbols(symbols: &[String]) -> Vec<DemangledSymbol> {
    symbols
        .iter()
        .map(|raw| {
            let name = demangle(raw);
            DemangledSymbol {
                raw: raw.clone(),
                mangled: is_mangled(raw),
                segments: name.segments().to_vec(),
                name,
            }
        })
        .collect()
}

/// Print the qualified name behind each symbol.
pub fn demangle_command(symbols: &[String], json: bool) -> Result<()> {
    let demangled = demangle_symbols(symbols);
    if json {
        println!("{}", serde_json::to_string_pretty(&demangled)?);
        return Ok(());
    }
    for entry in demangled {
        println!("{} -> {}", entry.raw, entry.name);
    }
    Ok(())
}

/// Classify a single class against the project's inputs.
///
/// Only the function table and overrides are read; the class does not need
/// to be part of the class snapshot.
pub fn classify_class(root: &str, name: &str) -> Result<ClassStatus> {
    let root_path = canonicalize_or_current(root)?;
    let ctx = ProjectContext::from_root(&root_path)?;
    let functions = resolve_functions(&load_functions(&ctx.functions_path())?);
    let overrides = load_overrides(&ctx.overrides_dir())?;
    let index = FunctionIndex::build(&functions);
    Ok(index.classify(&QualifiedName::parse(name), &overrides))
}

pub fn classify_class_command(root: &str, name: &str, json: bool) -> Result<()> {
    let status = classify_class(root, name)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }
    println!("Class: {}", status.class);
    println!("  Status: {}", status.status.as_str());
    println!("  Methods: {}", status.method_count);
    println!("  Total binary size: {:#x}", status.total_binary_size);
    Ok(())
}
