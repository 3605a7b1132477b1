//! Transport-facing result values
//!
//! These are the per-query value types the query and refactoring engines
//! produce and the result formatter renders. They are created per request
//! and never persisted. Lines and columns are 1-based here; the crossing
//! from internal 0-based coordinates happens exactly once, when one of
//! these values is built.

pub mod mcp;

use serde::{Deserialize, Serialize};

/// How much detail a read operation should attach to its results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Detail {
    #[default]
    Compact,
    Full,
}

impl Detail {
    pub fn is_full(self) -> bool {
        matches!(self, Detail::Full)
    }
}

/// A symbol found by a query, shaped for transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolResult {
    pub name: String,
    pub fully_qualified_name: String,
    pub kind: String,
    pub signature: String,
    /// Path relative to the solution directory when inside it
    pub file_path: String,
    /// 1-based
    pub line: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_body: Option<String>,
}

/// A single reference / caller / usage hit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceResult {
    pub file_path: String,
    /// 1-based
    pub line: u32,
    /// 1-based
    pub column: u32,
    pub code_snippet: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub context_before: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub context_after: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub containing_symbol: Option<String>,
}

/// Base-type chain and interface set for one type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeHierarchyResult {
    pub type_name: String,
    pub kind: String,
    /// Nearest base first, ending with the universal root label
    pub base_types: Vec<String>,
    /// Transitive interface set, sorted
    pub interfaces: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub members: Option<Vec<SymbolResult>>,
}

/// One package reference of a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageEntry {
    pub name: String,
    pub version: String,
}

/// Summary view of one project.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInfo {
    pub name: String,
    pub file_path: String,
    pub target_framework: String,
    pub output_type: String,
    pub source_file_count: usize,
    pub project_references: Vec<String>,
    pub package_references: Vec<PackageEntry>,
}

/// One compiler diagnostic, warning severity or higher.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticInfo {
    pub id: String,
    pub severity: String,
    pub message: String,
    pub file_path: String,
    /// 1-based; 0 when the diagnostic has no location
    pub line: u32,
}
