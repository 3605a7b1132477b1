//! The solution / project / document / symbol data model
//!
//! Instances are produced by a semantic-model provider (an exporter on the
//! language side) and treated as immutable snapshots by everything else.
//! Lines and columns in this module are 0-based; the transport layer adds
//! one when formatting.

use lens_foundation::paths::paths_equal_ci;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Identity of a symbol within one `Solution` snapshot.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct SymbolId(pub u32);

/// Half-open byte span into a document's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSpan {
    pub start: usize,
    pub end: usize,
}

impl TextSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end
    }
}

/// A declaration site of a symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub file: PathBuf,
    /// 0-based
    pub line: u32,
    /// 0-based
    pub column: u32,
    /// Span of the name token
    pub span: TextSpan,
    /// Span of the whole declaration, when the exporter recorded it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decl_span: Option<TextSpan>,
    /// False for metadata-only declarations
    pub in_source: bool,
}

/// Symbol classification, mirroring the source language's declaration kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SymbolKind {
    Class,
    Struct,
    Interface,
    Enum,
    Delegate,
    Method,
    Property,
    Field,
    Event,
    Namespace,
    Local,
    Parameter,
    TypeParameter,
}

impl SymbolKind {
    pub fn is_type(self) -> bool {
        matches!(
            self,
            Self::Class | Self::Struct | Self::Interface | Self::Enum | Self::Delegate
        )
    }

    /// Lowercase kind string used in transport results.
    pub fn display(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Struct => "struct",
            Self::Interface => "interface",
            Self::Enum => "enum",
            Self::Delegate => "delegate",
            Self::Method => "method",
            Self::Property => "property",
            Self::Field => "field",
            Self::Event => "event",
            Self::Namespace => "namespace",
            Self::Local => "local",
            Self::Parameter => "parameter",
            Self::TypeParameter => "type-parameter",
        }
    }
}

/// Sub-kind of method symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MethodKind {
    #[default]
    Ordinary,
    Constructor,
    Destructor,
    Operator,
    PropertyGetter,
    PropertySetter,
    EventAccessor,
    LocalFunction,
}

/// Declared accessibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Accessibility {
    Public,
    Internal,
    Protected,
    ProtectedInternal,
    PrivateProtected,
    #[default]
    Private,
}

impl Accessibility {
    /// Lowercase keyword form used in signature text.
    pub fn display(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Internal => "internal",
            Self::Protected => "protected",
            Self::ProtectedInternal => "protected internal",
            Self::PrivateProtected => "private protected",
            Self::Private => "private",
        }
    }
}

/// Declaration modifiers relevant to signatures and analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Modifiers {
    pub is_static: bool,
    pub is_async: bool,
    pub is_virtual: bool,
    pub is_override: bool,
    pub is_abstract: bool,
    pub is_sealed: bool,
    pub is_readonly: bool,
}

/// Parameter passing modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParamModifier {
    Ref,
    Out,
    In,
    Params,
}

impl ParamModifier {
    pub fn display(self) -> &'static str {
        match self {
            Self::Ref => "ref",
            Self::Out => "out",
            Self::In => "in",
            Self::Params => "params",
        }
    }
}

/// One declared parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterInfo {
    pub ty: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifier: Option<ParamModifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

impl ParameterInfo {
    /// `ref int x` / `string name = "y"` rendering used in signatures.
    pub fn display(&self) -> String {
        let mut out = String::new();
        if let Some(modifier) = self.modifier {
            out.push_str(modifier.display());
            out.push(' ');
        }
        out.push_str(&self.ty);
        out.push(' ');
        out.push_str(&self.name);
        if let Some(default) = &self.default_value {
            out.push_str(" = ");
            out.push_str(default);
        }
        out
    }
}

/// Property accessor set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Accessors {
    pub get: bool,
    pub set: bool,
    pub init: bool,
}

/// Signature data for members: return/member type plus parameters.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Signature {
    pub return_type: String,
    pub parameters: Vec<ParameterInfo>,
    pub type_parameters: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accessors: Option<Accessors>,
}

/// A semantic entity: type, member, namespace, or local.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Symbol {
    pub id: SymbolId,
    pub name: String,
    /// Fully qualified display form, e.g. `App.Services.Greeter.Hello`
    pub display: String,
    pub kind: SymbolKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method_kind: Option<MethodKind>,
    #[serde(default)]
    pub accessibility: Accessibility,
    #[serde(default)]
    pub modifiers: Modifiers,
    #[serde(default)]
    pub locations: Vec<Location>,
    #[serde(default)]
    pub attributes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub containing_type: Option<SymbolId>,
    /// Fully qualified namespace; empty for the global namespace
    #[serde(default)]
    pub containing_namespace: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<Signature>,
    /// Member ids, types only
    #[serde(default)]
    pub members: Vec<SymbolId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_type: Option<SymbolId>,
    /// Directly declared interfaces
    #[serde(default)]
    pub interfaces: Vec<SymbolId>,
    #[serde(default)]
    pub type_parameters: Vec<String>,
    #[serde(default)]
    pub implicitly_declared: bool,
    #[serde(default)]
    pub is_record: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<crate::body::MethodBody>,
}

impl Symbol {
    /// At least one declaration location is in a source document.
    pub fn is_in_source(&self) -> bool {
        self.locations.iter().any(|l| l.in_source)
    }

    /// Compiler-generated and implicitly-declared symbols are excluded
    /// from every listing.
    pub fn is_compiler_generated(&self) -> bool {
        self.implicitly_declared || self.name.starts_with('<')
    }

    /// First in-source location, falling back to the first location.
    pub fn primary_location(&self) -> Option<&Location> {
        self.locations
            .iter()
            .find(|l| l.in_source)
            .or_else(|| self.locations.first())
    }

    pub fn is_ordinary_method(&self) -> bool {
        self.kind == SymbolKind::Method
            && matches!(self.method_kind.unwrap_or_default(), MethodKind::Ordinary)
    }
}

/// Namespace tree node of one compilation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Namespace {
    /// Short name; empty for the global namespace
    pub name: String,
    /// Fully qualified display; empty for the global namespace
    pub display: String,
    pub types: Vec<SymbolId>,
    pub namespaces: Vec<Namespace>,
}

/// Severity of a compiler diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DiagnosticSeverity {
    Hidden,
    Info,
    Warning,
    Error,
}

impl DiagnosticSeverity {
    pub fn display(self) -> &'static str {
        match self {
            Self::Hidden => "hidden",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// One compiler diagnostic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub id: String,
    pub severity: DiagnosticSeverity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// 0-based
    #[serde(default)]
    pub line: u32,
}

/// Compiled view of one project.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Compilation {
    pub global_namespace: Namespace,
    pub diagnostics: Vec<Diagnostic>,
}

/// One package reference of a project file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageReference {
    pub name: String,
    pub version: String,
}

/// A single source file known to a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub path: PathBuf,
    pub text: String,
}

impl Document {
    /// 0-based line lookup.
    pub fn line_text(&self, line: u32) -> Option<&str> {
        self.text.lines().nth(line as usize)
    }

    /// 0-based line and column of a byte offset.
    pub fn position_of(&self, offset: usize) -> (u32, u32) {
        let clamped = offset.min(self.text.len());
        let mut line = 0u32;
        let mut line_start = 0usize;
        for (idx, ch) in self.text.char_indices() {
            if idx >= clamped {
                break;
            }
            if ch == '\n' {
                line += 1;
                line_start = idx + 1;
            }
        }
        (line, (clamped - line_start) as u32)
    }
}

/// A compilation unit with its own target and documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub name: String,
    /// Project file path
    pub path: PathBuf,
    /// Project directory
    pub root: PathBuf,
    #[serde(default)]
    pub target_framework: String,
    #[serde(default)]
    pub output_type: String,
    #[serde(default)]
    pub documents: Vec<Document>,
    #[serde(default)]
    pub project_references: Vec<String>,
    #[serde(default)]
    pub package_references: Vec<PackageReference>,
    #[serde(default)]
    pub compilation: Compilation,
}

impl Project {
    pub fn find_document(&self, path: &Path) -> Option<&Document> {
        self.documents.iter().find(|d| paths_equal_ci(&d.path, path))
    }
}

/// A top-level grouping of projects with a common build-system root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Solution {
    /// Solution (or single-project) entry-point path
    pub path: PathBuf,
    /// Directory every displayed path is made relative to
    pub directory: PathBuf,
    pub projects: Vec<Project>,
    /// Solution-wide symbol table indexed by `SymbolId`
    pub symbols: Vec<Symbol>,
}

impl Solution {
    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.0 as usize]
    }

    pub fn try_symbol(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.0 as usize)
    }

    pub fn project_named(&self, name: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.name == name)
    }

    /// Case-insensitive document lookup across all projects.
    pub fn find_document(&self, path: &Path) -> Option<&Document> {
        self.projects.iter().find_map(|p| p.find_document(path))
    }

    /// Project owning the given document path.
    pub fn project_of_document(&self, path: &Path) -> Option<&Project> {
        self.projects
            .iter()
            .find(|p| p.find_document(path).is_some())
    }

    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.projects.iter().flat_map(|p| p.documents.iter())
    }

    /// The symbol whose recorded declaration span encloses the given
    /// offset most tightly, used for containing-declaration rendering.
    pub fn enclosing_declaration(&self, file: &Path, offset: usize) -> Option<&Symbol> {
        self.symbols
            .iter()
            .filter(|s| !s.is_compiler_generated())
            .filter_map(|s| {
                s.locations
                    .iter()
                    .filter(|l| l.in_source && paths_equal_ci(&l.file, file))
                    .filter_map(|l| l.decl_span)
                    .find(|span| span.contains(offset))
                    .map(|span| (s, span.len()))
            })
            .min_by_key(|(_, len)| *len)
            .map(|(s, _)| s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_contains_is_half_open() {
        let span = TextSpan::new(4, 8);
        assert!(span.contains(4));
        assert!(span.contains(7));
        assert!(!span.contains(8));
        assert_eq!(span.len(), 4);
    }

    #[test]
    fn position_of_counts_lines_and_columns() {
        let doc = Document {
            path: PathBuf::from("/x/A.cs"),
            text: "class A\n{\n    void M() { }\n}\n".to_string(),
        };
        let offset = doc.text.find("void").unwrap();
        assert_eq!(doc.position_of(offset), (2, 4));
        assert_eq!(doc.line_text(0), Some("class A"));
    }

    #[test]
    fn compiler_generated_symbols_are_flagged() {
        let sym = Symbol {
            id: SymbolId(0),
            name: "<Main>$".to_string(),
            display: "<Main>$".to_string(),
            kind: SymbolKind::Method,
            method_kind: Some(MethodKind::Ordinary),
            accessibility: Accessibility::Private,
            modifiers: Modifiers::default(),
            locations: vec![],
            attributes: vec![],
            containing_type: None,
            containing_namespace: String::new(),
            doc_summary: None,
            signature: None,
            members: vec![],
            base_type: None,
            interfaces: vec![],
            type_parameters: vec![],
            implicitly_declared: false,
            is_record: false,
            body: None,
        };
        assert!(sym.is_compiler_generated());
        assert!(!sym.is_in_source());
    }
}
