//! The semantic-model provider contract
//!
//! Whole-solution services the core cannot compute from the data model
//! alone: loading, reference and caller search, hierarchy walks, and the
//! name-preserving rename. Implementations live outside the core; the
//! repository ships a snapshot-backed one in `lens-provider`.

use crate::model::{Solution, SymbolId, TextSpan};
use async_trait::async_trait;
use lens_foundation::LensResult;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One reference hit produced by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceHit {
    pub file: PathBuf,
    /// 0-based
    pub line: u32,
    /// 0-based
    pub column: u32,
    pub span: TextSpan,
    /// True for hits the compiler synthesized (e.g. implicit conversions)
    #[serde(default)]
    pub is_implicit: bool,
}

/// A calling symbol and the locations it calls from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallerInfo {
    /// The calling symbol, when it could be determined
    pub caller: Option<SymbolId>,
    pub call_sites: Vec<ReferenceHit>,
}

/// Options of the rename service.
///
/// The engine always renames definitions and references, never overloads,
/// and performs any file rename itself. String and comment rename extend
/// to doc-comment `cref` references.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenameOptions {
    pub rename_in_strings: bool,
    pub rename_in_comments: bool,
}

/// Services supplied by the semantic-model provider.
#[async_trait]
pub trait SemanticProvider: Send + Sync {
    /// Build a `Solution` from a solution-file or single-project-file
    /// entry point.
    async fn load_solution(&self, path: &Path) -> LensResult<Solution>;

    /// All references to the symbol across the solution.
    async fn find_references(
        &self,
        solution: &Solution,
        symbol: SymbolId,
    ) -> LensResult<Vec<ReferenceHit>>;

    /// All direct callers of a method.
    async fn find_callers(
        &self,
        solution: &Solution,
        method: SymbolId,
    ) -> LensResult<Vec<CallerInfo>>;

    /// Methods overriding the given virtual/abstract method.
    async fn find_overrides(
        &self,
        solution: &Solution,
        method: SymbolId,
    ) -> LensResult<Vec<SymbolId>>;

    /// Types implementing the given interface.
    async fn find_implementations(
        &self,
        solution: &Solution,
        interface: SymbolId,
    ) -> LensResult<Vec<SymbolId>>;

    /// Classes derived (transitively) from the given class.
    async fn find_derived_classes(
        &self,
        solution: &Solution,
        class: SymbolId,
    ) -> LensResult<Vec<SymbolId>>;

    /// Name-preserving rename producing a new solution value. The old
    /// solution is left untouched.
    async fn rename(
        &self,
        solution: &Solution,
        symbol: SymbolId,
        new_name: &str,
        options: &RenameOptions,
    ) -> LensResult<Solution>;

    /// Does the class already provide an implementation for the given
    /// interface member?
    async fn is_member_implemented(
        &self,
        solution: &Solution,
        class: SymbolId,
        member: SymbolId,
    ) -> LensResult<bool>;
}
