//! Analysis result records

use serde::{Deserialize, Serialize};

/// Severity of one finding. Ordering is report order: critical first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SmellSeverity {
    Critical,
    Warning,
    Info,
}

impl SmellSeverity {
    pub fn display(self) -> &'static str {
        match self {
            Self::Critical => "Critical",
            Self::Warning => "Warning",
            Self::Info => "Info",
        }
    }
}

/// One code-smell finding, surfaced as text only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Smell {
    pub severity: SmellSeverity,
    /// Smell name, e.g. "Long method"
    pub name: &'static str,
    /// Threshold text shown in the group header
    pub threshold: &'static str,
    /// Display name of the offending symbol
    pub symbol: String,
    /// Measured value or explanation, e.g. "132 lines"
    pub detail: String,
    /// Relative path of the declaration
    pub file_path: String,
    /// 1-based; 0 when the symbol has no source location
    pub line: u32,
}
