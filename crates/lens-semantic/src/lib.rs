//! Semantic model consumed by the Lens core
//!
//! The core never parses or type-checks source itself; it walks the data
//! model in this crate and calls through the [`provider::SemanticProvider`]
//! trait for whole-solution services (loading, reference search, rename).
//! The [`syntax`] module is the lightweight syntactic facility used by the
//! text-splicing refactors.

pub mod body;
pub mod model;
pub mod provider;
pub mod syntax;

pub use body::{BodyNode, BodyNodeKind, MethodBody};
pub use model::{
    Accessibility, Accessors, Compilation, Diagnostic, DiagnosticSeverity, Document, Location,
    MethodKind, Modifiers, Namespace, PackageReference, ParamModifier, ParameterInfo, Project,
    Signature, Solution, Symbol, SymbolId, SymbolKind, TextSpan,
};
pub use provider::{CallerInfo, ReferenceHit, RenameOptions, SemanticProvider};
