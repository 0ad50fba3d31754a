//! Core data model for classes, functions, and their decompilation status.
//!
//! Everything here is an immutable value type. The pipeline derives all of it
//! from input batches in one pass and throws it away once the report is built.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Scope separator used when displaying or parsing a qualified name.
pub const SCOPE_SEPARATOR: &str = "::";

/// Ordered, non-empty sequence of scope segments (e.g. `ksys::act::BaseProcLink`).
///
/// Segments are opaque strings; equality is segment-wise, so `["a::b", "c"]`
/// and `["a", "b", "c"]` are different names even though they display the same.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub struct QualifiedName {
    segments: Vec<String>,
}

impl QualifiedName {
    /// Build a name from explicit segments.
    ///
    /// An empty iterator yields a single empty segment so the name is never empty.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            segments.push(String::new());
        }
        Self { segments }
    }

    /// Parse a `::`-joined name. This never fails: a string without separators
    /// becomes a single-segment name.
    pub fn parse(joined: &str) -> Self {
        Self::from_segments(joined.split(SCOPE_SEPARATOR))
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false; kept for clippy's `len_without_is_empty`.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Trailing segment, i.e. the short name of a class or function.
    pub fn last(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    /// Second-to-last segment: the owning class of a member function.
    ///
    /// Single-segment (free) names have no owner.
    pub fn owner(&self) -> Option<&str> {
        let n = self.segments.len();
        if n >= 2 {
            Some(self.segments[n - 2].as_str())
        } else {
            None
        }
    }

    /// First segment, i.e. the top-level namespace.
    pub fn top_level(&self) -> &str {
        self.segments.first().map(String::as_str).unwrap_or_default()
    }

    /// Joined form of the leading `count` segments.
    pub fn prefix_string(&self, count: usize) -> String {
        self.segments[..count.min(self.segments.len())].join(SCOPE_SEPARATOR)
    }

    /// Joined form of the whole name.
    pub fn joined(&self) -> String {
        self.segments.join(SCOPE_SEPARATOR)
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.joined())
    }
}

impl FromStr for QualifiedName {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<String> for QualifiedName {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<&str> for QualifiedName {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<QualifiedName> for String {
    fn from(value: QualifiedName) -> Self {
        value.joined()
    }
}

/// Per-function evidence tag from the function metadata table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FunctionQuality {
    /// Not yet re-implemented (`U`).
    Unknown,
    /// Any other code: minor/major mismatches, library code, etc.
    Other,
    /// Confirmed re-implemented (`O`).
    Decompiled,
}

impl FunctionQuality {
    /// Decode the one-letter quality code used by function tables.
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "O" => FunctionQuality::Decompiled,
            "U" => FunctionQuality::Unknown,
            _ => FunctionQuality::Other,
        }
    }
}

/// One row of function metadata with its name already demangled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionRecord {
    pub address: u64,
    pub quality: FunctionQuality,
    pub size: u64,
    pub name: QualifiedName,
}

impl FunctionRecord {
    pub fn new(address: u64, quality: FunctionQuality, size: u64, name: QualifiedName) -> Self {
        Self { address, quality, size, name }
    }
}

/// Derived decompilation status of a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ClassStatusKind {
    #[serde(rename = "undecompiled_class")]
    Undecompiled,
    #[serde(rename = "partially_decompiled_class")]
    Partial,
    #[serde(rename = "decompiled_class")]
    Decompiled,
}

impl ClassStatusKind {
    /// Wire name used by the visualization front end.
    pub fn as_str(self) -> &'static str {
        match self {
            ClassStatusKind::Undecompiled => "undecompiled_class",
            ClassStatusKind::Partial => "partially_decompiled_class",
            ClassStatusKind::Decompiled => "decompiled_class",
        }
    }
}

/// Classification result for one class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassStatus {
    pub class: QualifiedName,
    pub status: ClassStatusKind,
    pub method_count: usize,
    pub total_binary_size: u64,
}

impl ClassStatus {
    /// Status of a class with no evidence at all.
    pub fn undecompiled(class: QualifiedName) -> Self {
        Self { class, status: ClassStatusKind::Undecompiled, method_count: 0, total_binary_size: 0 }
    }
}
