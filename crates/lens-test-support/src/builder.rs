//! Fixture solution builder
//!
//! Symbols are anchored to patterns in document text rather than fixed
//! offsets, so a rebuilt fixture picks up whatever is on disk - including
//! the result of a rename - exactly like an exporter re-running.

use lens_foundation::{LensError, LensResult};
use lens_provider::{SemanticSnapshot, SnapshotProvider, SymbolReferences};
use lens_semantic::syntax::{classify, matching_brace, ByteClass};
use lens_semantic::{
    Accessibility, Accessors, Compilation, Diagnostic, DiagnosticSeverity, Document, MethodBody,
    MethodKind, Modifiers, Namespace, PackageReference, ParamModifier, ParameterInfo, Project,
    ReferenceHit, Signature, Solution, Symbol, SymbolId, SymbolKind, TextSpan,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Handle to a symbol spec inside a builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolKey(usize);

impl SymbolKey {
    /// The `SymbolId` this key resolves to in the built solution.
    pub fn id(self) -> SymbolId {
        SymbolId(self.0 as u32)
    }
}

/// How a symbol's name token is located in its document.
#[derive(Debug, Clone)]
pub enum Anchor {
    /// The identifier following the first occurrence of a pattern,
    /// e.g. `Anchor::after("class ")`. Survives renames on reload.
    AfterPattern(String),
    /// The nth whole-word occurrence of the symbol's fixed name (0-based).
    Occurrence(usize),
}

impl Anchor {
    pub fn after(pattern: &str) -> Self {
        Self::AfterPattern(pattern.to_string())
    }

    pub fn nth(occurrence: usize) -> Self {
        Self::Occurrence(occurrence)
    }
}

#[derive(Debug, Clone)]
struct SymbolSpec {
    name: String,
    kind: SymbolKind,
    method_kind: Option<MethodKind>,
    accessibility: Accessibility,
    modifiers: Modifiers,
    namespace: String,
    owner: Option<SymbolKey>,
    document: Option<String>,
    anchor: Option<Anchor>,
    signature: Option<Signature>,
    attributes: Vec<String>,
    doc_summary: Option<String>,
    type_parameters: Vec<String>,
    implicitly_declared: bool,
    is_record: bool,
    base: Option<SymbolKey>,
    interfaces: Vec<SymbolKey>,
    body: Option<MethodBody>,
}

#[derive(Debug, Clone)]
struct ProjectSpec {
    name: String,
    documents: Vec<(String, String)>,
    project_references: Vec<String>,
    package_references: Vec<PackageReference>,
    target_framework: String,
    output_type: String,
    diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone)]
struct ReferenceSpec {
    symbol: SymbolKey,
    document: String,
    occurrence: usize,
}

/// Describes a whole solution fixture.
pub struct SolutionBuilder {
    path: PathBuf,
    directory: PathBuf,
    projects: Vec<ProjectSpec>,
    current_project: Option<usize>,
    symbols: Vec<SymbolSpec>,
    references: Vec<ReferenceSpec>,
}

impl SolutionBuilder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let directory = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self {
            path,
            directory,
            projects: Vec::new(),
            current_project: None,
            symbols: Vec::new(),
            references: Vec::new(),
        }
    }

    /// Start (or switch to) a project; subsequent documents and project
    /// metadata apply to it.
    pub fn project(&mut self, name: &str) -> &mut Self {
        if let Some(index) = self.projects.iter().position(|p| p.name == name) {
            self.current_project = Some(index);
        } else {
            self.projects.push(ProjectSpec {
                name: name.to_string(),
                documents: Vec::new(),
                project_references: Vec::new(),
                package_references: Vec::new(),
                target_framework: "net8.0".to_string(),
                output_type: "Library".to_string(),
                diagnostics: Vec::new(),
            });
            self.current_project = Some(self.projects.len() - 1);
        }
        self
    }

    fn current(&mut self) -> &mut ProjectSpec {
        if self.current_project.is_none() {
            self.project("App");
        }
        let index = self.current_project.unwrap();
        &mut self.projects[index]
    }

    pub fn framework(&mut self, framework: &str) -> &mut Self {
        self.current().target_framework = framework.to_string();
        self
    }

    pub fn output_type(&mut self, output_type: &str) -> &mut Self {
        self.current().output_type = output_type.to_string();
        self
    }

    pub fn project_reference(&mut self, name: &str) -> &mut Self {
        self.current().project_references.push(name.to_string());
        self
    }

    pub fn package(&mut self, name: &str, version: &str) -> &mut Self {
        self.current().package_references.push(PackageReference {
            name: name.to_string(),
            version: version.to_string(),
        });
        self
    }

    pub fn document(&mut self, rel_path: &str, text: &str) -> &mut Self {
        self.current()
            .documents
            .push((rel_path.to_string(), text.to_string()));
        self
    }

    pub fn diagnostic(
        &mut self,
        id: &str,
        severity: DiagnosticSeverity,
        message: &str,
        location: Option<(&str, u32)>,
    ) -> &mut Self {
        let directory = self.directory.clone();
        self.current().diagnostics.push(Diagnostic {
            id: id.to_string(),
            severity,
            message: message.to_string(),
            file: location.map(|(rel, _)| directory.join(rel)),
            line: location.map(|(_, line)| line).unwrap_or(0),
        });
        self
    }

    fn symbol(&mut self, name: &str, kind: SymbolKind) -> SymbolBuilder<'_> {
        SymbolBuilder {
            spec: SymbolSpec {
                name: name.to_string(),
                kind,
                method_kind: if kind == SymbolKind::Method {
                    Some(MethodKind::Ordinary)
                } else {
                    None
                },
                accessibility: Accessibility::Public,
                modifiers: Modifiers::default(),
                namespace: String::new(),
                owner: None,
                document: None,
                anchor: None,
                signature: None,
                attributes: Vec::new(),
                doc_summary: None,
                type_parameters: Vec::new(),
                implicitly_declared: false,
                is_record: false,
                base: None,
                interfaces: Vec::new(),
                body: None,
            },
            builder: self,
        }
    }

    pub fn class(&mut self, name: &str) -> SymbolBuilder<'_> {
        self.symbol(name, SymbolKind::Class)
    }

    pub fn struct_(&mut self, name: &str) -> SymbolBuilder<'_> {
        self.symbol(name, SymbolKind::Struct)
    }

    pub fn interface_(&mut self, name: &str) -> SymbolBuilder<'_> {
        self.symbol(name, SymbolKind::Interface)
    }

    pub fn enum_(&mut self, name: &str) -> SymbolBuilder<'_> {
        self.symbol(name, SymbolKind::Enum)
    }

    pub fn delegate(&mut self, name: &str) -> SymbolBuilder<'_> {
        self.symbol(name, SymbolKind::Delegate)
    }

    pub fn method(&mut self, owner: SymbolKey, name: &str) -> SymbolBuilder<'_> {
        let mut b = self.symbol(name, SymbolKind::Method);
        b.spec.owner = Some(owner);
        b
    }

    pub fn constructor(&mut self, owner: SymbolKey) -> SymbolBuilder<'_> {
        let mut b = self.symbol(".ctor", SymbolKind::Method);
        b.spec.owner = Some(owner);
        b.spec.method_kind = Some(MethodKind::Constructor);
        b
    }

    pub fn property(&mut self, owner: SymbolKey, name: &str) -> SymbolBuilder<'_> {
        let mut b = self.symbol(name, SymbolKind::Property);
        b.spec.owner = Some(owner);
        b
    }

    pub fn field(&mut self, owner: SymbolKey, name: &str) -> SymbolBuilder<'_> {
        let mut b = self.symbol(name, SymbolKind::Field);
        b.spec.owner = Some(owner);
        b
    }

    pub fn event(&mut self, owner: SymbolKey, name: &str) -> SymbolBuilder<'_> {
        let mut b = self.symbol(name, SymbolKind::Event);
        b.spec.owner = Some(owner);
        b
    }

    /// Record the nth whole-word occurrence of the symbol's name in a
    /// document as a reference hit (0-based, counting every occurrence).
    pub fn reference(&mut self, symbol: SymbolKey, document: &str, occurrence: usize) -> &mut Self {
        self.references.push(ReferenceSpec {
            symbol,
            document: document.to_string(),
            occurrence,
        });
        self
    }

    pub fn into_fixture(self) -> SolutionFixture {
        SolutionFixture {
            inner: Arc::new(FixtureData {
                path: self.path,
                directory: self.directory,
                projects: self.projects,
                symbols: self.symbols,
                references: self.references,
            }),
        }
    }
}

/// Fluent configuration of one symbol; `key()` commits it.
pub struct SymbolBuilder<'a> {
    builder: &'a mut SolutionBuilder,
    spec: SymbolSpec,
}

impl SymbolBuilder<'_> {
    pub fn at(mut self, document: &str, anchor: Anchor) -> Self {
        self.spec.document = Some(document.to_string());
        self.spec.anchor = Some(anchor);
        self
    }

    /// Metadata-only symbol with no source declaration.
    pub fn metadata(mut self) -> Self {
        self.spec.document = None;
        self.spec.anchor = None;
        self
    }

    pub fn namespace(mut self, namespace: &str) -> Self {
        self.spec.namespace = namespace.to_string();
        self
    }

    pub fn accessibility(mut self, accessibility: Accessibility) -> Self {
        self.spec.accessibility = accessibility;
        self
    }

    pub fn private(self) -> Self {
        self.accessibility(Accessibility::Private)
    }

    pub fn internal(self) -> Self {
        self.accessibility(Accessibility::Internal)
    }

    pub fn static_(mut self) -> Self {
        self.spec.modifiers.is_static = true;
        self
    }

    pub fn async_(mut self) -> Self {
        self.spec.modifiers.is_async = true;
        self
    }

    pub fn virtual_(mut self) -> Self {
        self.spec.modifiers.is_virtual = true;
        self
    }

    pub fn override_(mut self) -> Self {
        self.spec.modifiers.is_override = true;
        self
    }

    pub fn abstract_(mut self) -> Self {
        self.spec.modifiers.is_abstract = true;
        self
    }

    pub fn sealed_(mut self) -> Self {
        self.spec.modifiers.is_sealed = true;
        self
    }

    pub fn readonly_(mut self) -> Self {
        self.spec.modifiers.is_readonly = true;
        self
    }

    pub fn returns(mut self, ty: &str) -> Self {
        self.signature_mut().return_type = ty.to_string();
        self
    }

    pub fn param(mut self, ty: &str, name: &str) -> Self {
        self.signature_mut().parameters.push(ParameterInfo {
            ty: ty.to_string(),
            name: name.to_string(),
            modifier: None,
            default_value: None,
        });
        self
    }

    pub fn param_mod(mut self, ty: &str, name: &str, modifier: ParamModifier) -> Self {
        self.signature_mut().parameters.push(ParameterInfo {
            ty: ty.to_string(),
            name: name.to_string(),
            modifier: Some(modifier),
            default_value: None,
        });
        self
    }

    pub fn param_default(mut self, ty: &str, name: &str, default: &str) -> Self {
        self.signature_mut().parameters.push(ParameterInfo {
            ty: ty.to_string(),
            name: name.to_string(),
            modifier: None,
            default_value: Some(default.to_string()),
        });
        self
    }

    pub fn accessors(mut self, get: bool, set: bool, init: bool) -> Self {
        self.signature_mut().accessors = Some(Accessors { get, set, init });
        self
    }

    pub fn type_param(mut self, name: &str) -> Self {
        self.spec.type_parameters.push(name.to_string());
        self
    }

    pub fn attribute(mut self, name: &str) -> Self {
        self.spec.attributes.push(name.to_string());
        self
    }

    pub fn doc_summary(mut self, text: &str) -> Self {
        self.spec.doc_summary = Some(text.to_string());
        self
    }

    pub fn record(mut self) -> Self {
        self.spec.is_record = true;
        self
    }

    pub fn implicit(mut self) -> Self {
        self.spec.implicitly_declared = true;
        self
    }

    pub fn base(mut self, base: SymbolKey) -> Self {
        self.spec.base = Some(base);
        self
    }

    pub fn implements(mut self, interface: SymbolKey) -> Self {
        self.spec.interfaces.push(interface);
        self
    }

    pub fn body(mut self, body: MethodBody) -> Self {
        self.spec.body = Some(body);
        self
    }

    fn signature_mut(&mut self) -> &mut Signature {
        self.spec.signature.get_or_insert_with(Signature::default)
    }

    /// Commit the spec and get its key.
    pub fn key(self) -> SymbolKey {
        self.builder.symbols.push(self.spec);
        SymbolKey(self.builder.symbols.len() - 1)
    }
}

struct FixtureData {
    path: PathBuf,
    directory: PathBuf,
    projects: Vec<ProjectSpec>,
    symbols: Vec<SymbolSpec>,
    references: Vec<ReferenceSpec>,
}

/// An immutable, rebuildable fixture.
#[derive(Clone)]
pub struct SolutionFixture {
    inner: Arc<FixtureData>,
}

impl SolutionFixture {
    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    pub fn directory(&self) -> &Path {
        &self.inner.directory
    }

    /// Write the solution file and every document to disk so that reloads
    /// (and refactors) operate on real files.
    pub fn write_to_disk(&self) -> LensResult<()> {
        let write = |path: &Path, text: &str| -> LensResult<()> {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    LensError::load_failed(format!("cannot create {}: {}", parent.display(), e))
                })?;
            }
            std::fs::write(path, text).map_err(|e| {
                LensError::load_failed(format!("cannot write {}: {}", path.display(), e))
            })
        };

        write(
            &self.inner.path,
            "Microsoft Visual Studio Solution File, Format Version 12.00\n",
        )?;
        for project in &self.inner.projects {
            let project_path = self.inner.directory.join(format!("{}.csproj", project.name));
            write(&project_path, "<Project Sdk=\"Microsoft.NET.Sdk\" />\n")?;
            for (rel, text) in &project.documents {
                write(&self.inner.directory.join(rel), text)?;
            }
        }
        Ok(())
    }

    /// Install this fixture's factory on the provider. Every load rebuilds
    /// from the current document text. The canonical form of the path is
    /// registered too, since the workspace manager normalizes before
    /// asking the provider.
    pub fn install(&self, provider: &SnapshotProvider) {
        let fixture = self.clone();
        let factory: lens_provider::SnapshotFactory = Arc::new(move |_path: &Path| fixture.build());
        provider.install(self.inner.path.clone(), factory.clone());
        if let Ok(canonical) = self.inner.path.canonicalize() {
            provider.install(canonical, factory);
        }
    }

    /// Build the snapshot from current document text (disk wins over the
    /// text the fixture was described with).
    pub fn build(&self) -> LensResult<SemanticSnapshot> {
        let data = &self.inner;

        // Current text per relative path
        let mut texts: HashMap<String, String> = HashMap::new();
        for project in &data.projects {
            for (rel, initial) in &project.documents {
                let on_disk = std::fs::read_to_string(data.directory.join(rel)).ok();
                texts.insert(rel.clone(), on_disk.unwrap_or_else(|| initial.clone()));
            }
        }

        // Resolve symbols in declaration order
        let mut symbols: Vec<Symbol> = Vec::with_capacity(data.symbols.len());
        for (index, spec) in data.symbols.iter().enumerate() {
            let id = SymbolId(index as u32);
            let mut name = spec.name.clone();
            let mut locations = Vec::new();

            if let (Some(rel), Some(anchor)) = (&spec.document, &spec.anchor) {
                let text = texts.get(rel).ok_or_else(|| {
                    LensError::load_failed(format!("fixture references unknown document {rel}"))
                })?;
                let name_span = match anchor {
                    Anchor::AfterPattern(pattern) => {
                        let at = text.find(pattern).ok_or_else(|| {
                            LensError::load_failed(format!(
                                "pattern '{pattern}' not found in {rel}"
                            ))
                        })?;
                        let start = skip_ws(text.as_bytes(), at + pattern.len());
                        let end = ident_end(text.as_bytes(), start);
                        if end == start {
                            return Err(LensError::load_failed(format!(
                                "no identifier after pattern '{pattern}' in {rel}"
                            )));
                        }
                        name = text[start..end].to_string();
                        TextSpan::new(start, end)
                    }
                    Anchor::Occurrence(nth) => {
                        let start =
                            nth_word_occurrence(text, &spec.name, *nth).ok_or_else(|| {
                                LensError::load_failed(format!(
                                    "occurrence {nth} of '{}' not found in {rel}",
                                    spec.name
                                ))
                            })?;
                        TextSpan::new(start, start + spec.name.len())
                    }
                };
                let (line, column) = position(text, name_span.start);
                let decl_span = declaration_extent(text, name_span);
                locations.push(lens_semantic::Location {
                    file: data.directory.join(rel),
                    line,
                    column,
                    span: name_span,
                    decl_span,
                    in_source: true,
                });
            }

            let namespace = if spec.namespace.is_empty() {
                spec.owner
                    .map(|o| symbols[o.0].containing_namespace.clone())
                    .unwrap_or_default()
            } else {
                spec.namespace.clone()
            };

            let mut display = String::new();
            if !namespace.is_empty() {
                display.push_str(&namespace);
                display.push('.');
            }
            if let Some(owner) = spec.owner {
                let owner_symbol = &symbols[owner.0];
                // Owner display already carries the namespace
                display = format!("{}.", owner_symbol.display);
            }
            display.push_str(&name);
            if spec.kind == SymbolKind::Method {
                let params = spec
                    .signature
                    .as_ref()
                    .map(|s| {
                        s.parameters
                            .iter()
                            .map(|p| p.ty.clone())
                            .collect::<Vec<_>>()
                            .join(", ")
                    })
                    .unwrap_or_default();
                display.push_str(&format!("({params})"));
            }

            symbols.push(Symbol {
                id,
                name,
                display,
                kind: spec.kind,
                method_kind: spec.method_kind,
                accessibility: spec.accessibility,
                modifiers: spec.modifiers,
                locations,
                attributes: spec.attributes.clone(),
                containing_type: spec.owner.map(SymbolKey::id),
                containing_namespace: namespace,
                doc_summary: spec.doc_summary.clone(),
                signature: spec.signature.clone(),
                members: Vec::new(),
                base_type: spec.base.map(SymbolKey::id),
                interfaces: spec.interfaces.iter().map(|k| k.id()).collect(),
                type_parameters: spec.type_parameters.clone(),
                implicitly_declared: spec.implicitly_declared,
                is_record: spec.is_record,
                body: spec.body.clone(),
            });
        }

        // Fill member lists
        for index in 0..data.symbols.len() {
            if let Some(owner) = data.symbols[index].owner {
                let id = SymbolId(index as u32);
                symbols[owner.0].members.push(id);
            }
        }

        // Projects with documents and namespace trees
        let mut projects = Vec::new();
        for project_spec in &data.projects {
            let documents: Vec<Document> = project_spec
                .documents
                .iter()
                .map(|(rel, _)| Document {
                    path: data.directory.join(rel),
                    text: texts.get(rel).cloned().unwrap_or_default(),
                })
                .collect();

            let mut global_namespace = Namespace::default();
            for (index, spec) in data.symbols.iter().enumerate() {
                if !symbols[index].kind.is_type() || spec.owner.is_some() {
                    continue;
                }
                let in_project = match &spec.document {
                    Some(rel) => project_spec.documents.iter().any(|(r, _)| r == rel),
                    // Metadata types are visible to every compilation
                    None => true,
                };
                if in_project {
                    insert_into_namespace(
                        &mut global_namespace,
                        &symbols[index].containing_namespace.clone(),
                        SymbolId(index as u32),
                    );
                }
            }

            projects.push(Project {
                name: project_spec.name.clone(),
                path: data.directory.join(format!("{}.csproj", project_spec.name)),
                root: data.directory.clone(),
                target_framework: project_spec.target_framework.clone(),
                output_type: project_spec.output_type.clone(),
                documents,
                project_references: project_spec.project_references.clone(),
                package_references: project_spec.package_references.clone(),
                compilation: Compilation {
                    global_namespace,
                    diagnostics: project_spec.diagnostics.clone(),
                },
            });
        }

        // Reference index
        let mut references: Vec<SymbolReferences> = Vec::new();
        for spec in &data.references {
            let text = texts.get(&spec.document).ok_or_else(|| {
                LensError::load_failed(format!(
                    "reference names unknown document {}",
                    spec.document
                ))
            })?;
            let name = &symbols[spec.symbol.0].name;
            let start = nth_word_occurrence(text, name, spec.occurrence).ok_or_else(|| {
                LensError::load_failed(format!(
                    "occurrence {} of '{}' not found in {}",
                    spec.occurrence, name, spec.document
                ))
            })?;
            let (line, column) = position(text, start);
            let hit = ReferenceHit {
                file: data.directory.join(&spec.document),
                line,
                column,
                span: TextSpan::new(start, start + name.len()),
                is_implicit: false,
            };
            match references
                .iter_mut()
                .find(|r| r.symbol == spec.symbol.id())
            {
                Some(existing) => existing.hits.push(hit),
                None => references.push(SymbolReferences {
                    symbol: spec.symbol.id(),
                    hits: vec![hit],
                }),
            }
        }

        Ok(SemanticSnapshot {
            solution: Solution {
                path: data.path.clone(),
                directory: data.directory.clone(),
                projects,
                symbols,
            },
            references,
        })
    }
}

fn skip_ws(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

fn ident_end(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
        i += 1;
    }
    i
}

fn nth_word_occurrence(text: &str, word: &str, nth: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut from = 0usize;
    let mut seen = 0usize;
    while from + word.len() <= text.len() {
        let pos = text[from..].find(word)? + from;
        from = pos + 1;
        let left_ok = pos == 0 || !(bytes[pos - 1].is_ascii_alphanumeric() || bytes[pos - 1] == b'_');
        let end = pos + word.len();
        let right_ok =
            end >= bytes.len() || !(bytes[end].is_ascii_alphanumeric() || bytes[end] == b'_');
        if left_ok && right_ok {
            if seen == nth {
                return Some(pos);
            }
            seen += 1;
        }
    }
    None
}

fn position(text: &str, offset: usize) -> (u32, u32) {
    let clamped = offset.min(text.len());
    let mut line = 0u32;
    let mut line_start = 0usize;
    for (idx, ch) in text.char_indices() {
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

/// Declaration extent: from the start of the name's line to the matching
/// close brace (when a brace opens before any `;`) or through the `;`.
fn declaration_extent(text: &str, name_span: TextSpan) -> Option<TextSpan> {
    let bytes = text.as_bytes();
    let classes = classify(text);
    let start = text[..name_span.start]
        .rfind('\n')
        .map(|i| i + 1)
        .unwrap_or(0);

    let mut i = name_span.end;
    while i < bytes.len() {
        if classes[i] == ByteClass::Code {
            if bytes[i] == b'{' {
                let close = matching_brace(text, &classes, i)?;
                return Some(TextSpan::new(start, close + 1));
            }
            if bytes[i] == b';' {
                return Some(TextSpan::new(start, i + 1));
            }
        }
        i += 1;
    }
    None
}

fn insert_into_namespace(root: &mut Namespace, namespace: &str, type_id: SymbolId) {
    if namespace.is_empty() {
        root.types.push(type_id);
        return;
    }
    let mut node = root;
    let mut display = String::new();
    for part in namespace.split('.') {
        if !display.is_empty() {
            display.push('.');
        }
        display.push_str(part);
        let index = match node.namespaces.iter().position(|n| n.name == part) {
            Some(index) => index,
            None => {
                node.namespaces.push(Namespace {
                    name: part.to_string(),
                    display: display.clone(),
                    types: Vec::new(),
                    namespaces: Vec::new(),
                });
                node.namespaces.len() - 1
            }
        };
        node = &mut node.namespaces[index];
    }
    node.types.push(type_id);
}
