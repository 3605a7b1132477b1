//! On-wire shape of an exported semantic snapshot

use lens_semantic::{ReferenceHit, Solution, SymbolId};
use serde::{Deserialize, Serialize};

/// All references to one symbol, excluding its declarations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolReferences {
    pub symbol: SymbolId,
    pub hits: Vec<ReferenceHit>,
}

/// A complete exported semantic model for one solution.
///
/// Document texts may be left empty in the export; the provider resolves
/// them against the files on disk at load time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticSnapshot {
    pub solution: Solution,
    #[serde(default)]
    pub references: Vec<SymbolReferences>,
}
