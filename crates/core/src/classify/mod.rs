//! Class status classification.
//!
//! A class's status is derived from the functions whose owner segment matches
//! the class's short name, unless a curated override says otherwise.
//!
//! Matching is by short name only: `ksys::act::Foo` and `uking::Foo` both see
//! every `*::Foo::method`. Function symbols don't carry enough scope to do
//! better in general, so this is reported as-is.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::model::{ClassStatus, ClassStatusKind, FunctionQuality, FunctionRecord, QualifiedName};

/// Manual status hint from the curated override tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverrideHint {
    /// Work in progress; reported as a partially decompiled class.
    Pending,
    /// Done; reported as a decompiled class.
    Final,
}

impl OverrideHint {
    /// Decode the `status` field of an override entry.
    ///
    /// Exactly `"pending"` is recognized; anything else means final.
    pub fn from_status(status: &str) -> Self {
        if status == "pending" {
            OverrideHint::Pending
        } else {
            OverrideHint::Final
        }
    }

    pub fn status(self) -> ClassStatusKind {
        match self {
            OverrideHint::Pending => ClassStatusKind::Partial,
            OverrideHint::Final => ClassStatusKind::Decompiled,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusOverride {
    pub class: QualifiedName,
    pub hint: OverrideHint,
}

/// Overrides keyed by the full class name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideTable {
    entries: HashMap<QualifiedName, StatusOverride>,
}

impl OverrideTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the override for `class`.
    pub fn insert(&mut self, class: QualifiedName, hint: OverrideHint) -> &mut Self {
        self.entries.insert(class.clone(), StatusOverride { class, hint });
        self
    }

    /// Add every entry of a per-namespace table: `class short name -> status`.
    pub fn extend_namespace<'a, I>(&mut self, namespace: &str, entries: I) -> &mut Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (class, status) in entries {
            let full = if namespace.is_empty() {
                QualifiedName::parse(class)
            } else {
                QualifiedName::parse(&format!("{namespace}::{class}"))
            };
            self.insert(full, OverrideHint::from_status(status));
        }
        self
    }

    pub fn get(&self, class: &QualifiedName) -> Option<&StatusOverride> {
        self.entries.get(class)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Derive a class's status by scanning every function.
///
/// This is the reference behaviour; [`FunctionIndex::classify`] gives the
/// same answers without rescanning.
pub fn classify(
    class: &QualifiedName,
    functions: &[FunctionRecord],
    overrides: &OverrideTable,
) -> ClassStatus {
    let short_name = class.last();
    let matched = functions.iter().filter(|f| f.name.owner() == Some(short_name));
    status_from_matches(class, matched, overrides)
}

/// Inverted index of functions grouped by owner short name.
///
/// Built once per snapshot; classes then look up their bucket directly.
#[derive(Debug, Clone, Default)]
pub struct FunctionIndex<'a> {
    by_owner: HashMap<&'a str, Vec<&'a FunctionRecord>>,
    free_functions: usize,
}

impl<'a> FunctionIndex<'a> {
    pub fn build(functions: &'a [FunctionRecord]) -> Self {
        let mut by_owner: HashMap<&'a str, Vec<&'a FunctionRecord>> = HashMap::new();
        let mut free_functions = 0;
        for function in functions {
            match function.name.owner() {
                Some(owner) => by_owner.entry(owner).or_default().push(function),
                None => free_functions += 1,
            }
        }
        Self { by_owner, free_functions }
    }

    /// Functions owned by any class called `short_name`.
    pub fn functions_for(&self, short_name: &str) -> &[&'a FunctionRecord] {
        self.by_owner.get(short_name).map(Vec::as_slice).unwrap_or_default()
    }

    /// Number of single-segment names, which never match a class.
    pub fn free_functions(&self) -> usize {
        self.free_functions
    }

    pub fn classify(&self, class: &QualifiedName, overrides: &OverrideTable) -> ClassStatus {
        let matched = self.functions_for(class.last()).iter().copied();
        status_from_matches(class, matched, overrides)
    }
}

fn status_from_matches<'f>(
    class: &QualifiedName,
    matched: impl Iterator<Item = &'f FunctionRecord>,
    overrides: &OverrideTable,
) -> ClassStatus {
    let mut method_count = 0;
    let mut total_binary_size: u64 = 0;
    let mut qualities = BTreeSet::new();
    for function in matched {
        method_count += 1;
        total_binary_size = total_binary_size.saturating_add(function.size);
        qualities.insert(function.quality);
    }

    let status = match overrides.get(class) {
        Some(entry) => entry.hint.status(),
        None => status_from_qualities(&qualities),
    };

    ClassStatus { class: class.clone(), status, method_count, total_binary_size }
}

fn status_from_qualities(qualities: &BTreeSet<FunctionQuality>) -> ClassStatusKind {
    let only = |quality| qualities.len() == 1 && qualities.contains(&quality);
    if qualities.is_empty() || only(FunctionQuality::Unknown) {
        ClassStatusKind::Undecompiled
    } else if only(FunctionQuality::Decompiled) {
        ClassStatusKind::Decompiled
    } else {
        ClassStatusKind::Partial
    }
}
