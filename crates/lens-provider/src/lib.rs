//! Snapshot-backed semantic-model provider
//!
//! Lens does not parse or type-check the analyzed language. This provider
//! serves a pre-exported semantic snapshot: the symbol graph, reference
//! index and document inventory a language-side exporter produced. The
//! default source is a `<solution>.lens.json` sidecar next to the solution
//! file; test fixtures install in-memory snapshot factories instead.
//!
//! Hierarchy queries (overrides, implementations, derived classes) and
//! caller grouping are derived from the symbol graph; rename is span-precise
//! text splicing over the reference index.

mod snapshot;

pub use snapshot::{SemanticSnapshot, SymbolReferences};

use async_trait::async_trait;
use lens_foundation::{LensError, LensResult};
use lens_semantic::syntax;
use lens_semantic::{
    CallerInfo, ReferenceHit, RenameOptions, SemanticProvider, Solution, Symbol, SymbolId,
    SymbolKind,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// Factory producing a fresh snapshot for a solution path. Called on every
/// (re)load so the snapshot reflects the current state on disk.
pub type SnapshotFactory =
    Arc<dyn Fn(&Path) -> LensResult<SemanticSnapshot> + Send + Sync>;

/// The shipped `SemanticProvider` implementation.
pub struct SnapshotProvider {
    /// Installed in-memory snapshot factories, keyed by entry-point path
    sources: Mutex<HashMap<PathBuf, SnapshotFactory>>,
    /// Reference index of the most recent load per solution path.
    /// A reader holding an older handle keeps valid symbol data; reference
    /// queries answer from the latest index, which reloads keep current.
    indexes: Mutex<HashMap<PathBuf, Arc<HashMap<SymbolId, Vec<ReferenceHit>>>>>,
}

impl SnapshotProvider {
    pub fn new() -> Self {
        Self {
            sources: Mutex::new(HashMap::new()),
            indexes: Mutex::new(HashMap::new()),
        }
    }

    /// Install an in-memory snapshot factory for an entry-point path.
    pub fn install(&self, path: impl Into<PathBuf>, factory: SnapshotFactory) {
        self.sources.lock().unwrap().insert(path.into(), factory);
    }

    fn lookup_factory(&self, path: &Path) -> Option<SnapshotFactory> {
        self.sources.lock().unwrap().get(path).cloned()
    }

    /// Load the sidecar snapshot for a solution / project entry point.
    async fn load_sidecar(&self, path: &Path) -> LensResult<SemanticSnapshot> {
        if !path.exists() {
            return Err(LensError::not_found(format!(
                "solution or project file not found: {}",
                path.display()
            )));
        }
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        if extension != "sln" && extension != "csproj" {
            return Err(LensError::invalid_input(format!(
                "not a solution or project file: {}",
                path.display()
            )));
        }

        let sidecar = sidecar_path(path);
        let raw = tokio::fs::read_to_string(&sidecar).await.map_err(|e| {
            LensError::load_failed(format!(
                "no semantic snapshot at {}: {}",
                sidecar.display(),
                e
            ))
        })?;
        let mut snapshot: SemanticSnapshot = serde_json::from_str(&raw).map_err(|e| {
            LensError::load_failed(format!(
                "malformed semantic snapshot {}: {}",
                sidecar.display(),
                e
            ))
        })?;

        // Document texts are resolved against the current files on disk so
        // a reload observes edits made since the export.
        for project in &mut snapshot.solution.projects {
            for document in &mut project.documents {
                match tokio::fs::read_to_string(&document.path).await {
                    Ok(text) => document.text = text,
                    Err(e) if document.text.is_empty() => {
                        return Err(LensError::load_failed(format!(
                            "cannot read document {}: {}",
                            document.path.display(),
                            e
                        )));
                    }
                    Err(e) => {
                        warn!(
                            file = %document.path.display(),
                            error = %e,
                            "keeping exported text for unreadable document"
                        );
                    }
                }
            }
        }
        Ok(snapshot)
    }

    fn index_for(&self, solution: &Solution) -> LensResult<Arc<HashMap<SymbolId, Vec<ReferenceHit>>>> {
        self.indexes
            .lock()
            .unwrap()
            .get(&solution.path)
            .cloned()
            .ok_or_else(|| {
                LensError::analysis_failed(format!(
                    "no reference index for solution {}",
                    solution.path.display()
                ))
            })
    }

    /// Base-type chain of a type, nearest first.
    fn base_chain(solution: &Solution, ty: SymbolId) -> Vec<SymbolId> {
        let mut chain = Vec::new();
        let mut current = solution.try_symbol(ty).and_then(|s| s.base_type);
        while let Some(id) = current {
            if chain.contains(&id) {
                break;
            }
            chain.push(id);
            current = solution.try_symbol(id).and_then(|s| s.base_type);
        }
        chain
    }

    /// Transitive interface set of a type, including bases' interfaces.
    fn all_interfaces(solution: &Solution, ty: SymbolId) -> Vec<SymbolId> {
        let mut seen = Vec::new();
        let mut stack: Vec<SymbolId> = std::iter::once(ty)
            .chain(Self::base_chain(solution, ty))
            .collect();
        while let Some(id) = stack.pop() {
            if let Some(sym) = solution.try_symbol(id) {
                for &iface in &sym.interfaces {
                    if !seen.contains(&iface) {
                        seen.push(iface);
                        stack.push(iface);
                    }
                }
            }
        }
        seen
    }

    fn parameter_types(symbol: &Symbol) -> Vec<&str> {
        symbol
            .signature
            .as_ref()
            .map(|s| s.parameters.iter().map(|p| p.ty.as_str()).collect())
            .unwrap_or_default()
    }
}

impl Default for SnapshotProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// `<solution>.lens.json` next to the entry point.
pub fn sidecar_path(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_owned();
    os.push(".lens.json");
    PathBuf::from(os)
}

#[async_trait]
impl SemanticProvider for SnapshotProvider {
    async fn load_solution(&self, path: &Path) -> LensResult<Solution> {
        let snapshot = match self.lookup_factory(path) {
            Some(factory) => factory(path)?,
            None => self.load_sidecar(path).await?,
        };

        let mut index: HashMap<SymbolId, Vec<ReferenceHit>> = HashMap::new();
        for entry in snapshot.references {
            index.entry(entry.symbol).or_default().extend(entry.hits);
        }
        debug!(
            solution = %snapshot.solution.path.display(),
            projects = snapshot.solution.projects.len(),
            symbols = snapshot.solution.symbols.len(),
            "Loaded semantic snapshot"
        );
        self.indexes
            .lock()
            .unwrap()
            .insert(snapshot.solution.path.clone(), Arc::new(index));
        Ok(snapshot.solution)
    }

    async fn find_references(
        &self,
        solution: &Solution,
        symbol: SymbolId,
    ) -> LensResult<Vec<ReferenceHit>> {
        let index = self.index_for(solution)?;
        Ok(index.get(&symbol).cloned().unwrap_or_default())
    }

    async fn find_callers(
        &self,
        solution: &Solution,
        method: SymbolId,
    ) -> LensResult<Vec<CallerInfo>> {
        let index = self.index_for(solution)?;
        let hits = index.get(&method).cloned().unwrap_or_default();

        // Group call sites by the declaration enclosing each hit
        let mut order: Vec<Option<SymbolId>> = Vec::new();
        let mut grouped: HashMap<Option<SymbolId>, Vec<ReferenceHit>> = HashMap::new();
        for hit in hits {
            let caller = solution
                .enclosing_declaration(&hit.file, hit.span.start)
                .map(|s| s.id);
            if !order.contains(&caller) {
                order.push(caller);
            }
            grouped.entry(caller).or_default().push(hit);
        }
        Ok(order
            .into_iter()
            .map(|caller| CallerInfo {
                caller,
                call_sites: grouped.remove(&caller).unwrap_or_default(),
            })
            .collect())
    }

    async fn find_overrides(
        &self,
        solution: &Solution,
        method: SymbolId,
    ) -> LensResult<Vec<SymbolId>> {
        let target = solution
            .try_symbol(method)
            .ok_or_else(|| LensError::analysis_failed("unknown method symbol"))?;
        let Some(declaring_type) = target.containing_type else {
            return Ok(Vec::new());
        };
        let mut found = Vec::new();
        for sym in &solution.symbols {
            if sym.kind != SymbolKind::Method || !sym.modifiers.is_override {
                continue;
            }
            if sym.name != target.name {
                continue;
            }
            let Some(owner) = sym.containing_type else {
                continue;
            };
            if Self::base_chain(solution, owner).contains(&declaring_type) {
                found.push(sym.id);
            }
        }
        Ok(found)
    }

    async fn find_implementations(
        &self,
        solution: &Solution,
        interface: SymbolId,
    ) -> LensResult<Vec<SymbolId>> {
        Ok(solution
            .symbols
            .iter()
            .filter(|s| s.kind.is_type() && s.kind != SymbolKind::Interface)
            .filter(|s| Self::all_interfaces(solution, s.id).contains(&interface))
            .map(|s| s.id)
            .collect())
    }

    async fn find_derived_classes(
        &self,
        solution: &Solution,
        class: SymbolId,
    ) -> LensResult<Vec<SymbolId>> {
        Ok(solution
            .symbols
            .iter()
            .filter(|s| s.kind == SymbolKind::Class)
            .filter(|s| Self::base_chain(solution, s.id).contains(&class))
            .map(|s| s.id)
            .collect())
    }

    async fn rename(
        &self,
        solution: &Solution,
        symbol: SymbolId,
        new_name: &str,
        options: &RenameOptions,
    ) -> LensResult<Solution> {
        let index = self.index_for(solution)?;
        let target = solution
            .try_symbol(symbol)
            .ok_or_else(|| LensError::analysis_failed("unknown symbol"))?;
        let old_name = target.name.clone();

        // Collect name-token spans per document: declarations plus the
        // reference index. Overloads have distinct ids and are untouched.
        let mut edits: HashMap<PathBuf, Vec<lens_semantic::TextSpan>> = HashMap::new();
        for location in target.locations.iter().filter(|l| l.in_source) {
            edits
                .entry(location.file.clone())
                .or_default()
                .push(location.span);
        }
        for hit in index.get(&symbol).into_iter().flatten() {
            edits.entry(hit.file.clone()).or_default().push(hit.span);
        }

        let mut renamed = solution.clone();
        for project in &mut renamed.projects {
            for document in &mut project.documents {
                let Some(spans) = edits.get(&document.path) else {
                    if options.rename_in_strings || options.rename_in_comments {
                        document.text = syntax::replace_word_in_regions(
                            &document.text,
                            &old_name,
                            new_name,
                            options.rename_in_strings,
                            options.rename_in_comments,
                        );
                    }
                    continue;
                };
                let mut spans = spans.clone();
                spans.sort_by(|a, b| b.start.cmp(&a.start));
                spans.dedup();
                let mut text = document.text.clone();
                for span in spans {
                    if span.end > text.len()
                        || !text.is_char_boundary(span.start)
                        || !text.is_char_boundary(span.end)
                    {
                        warn!(
                            file = %document.path.display(),
                            start = span.start,
                            "skipping out-of-range rename span"
                        );
                        continue;
                    }
                    if &text[span.start..span.end] != old_name {
                        warn!(
                            file = %document.path.display(),
                            start = span.start,
                            "skipping stale rename span"
                        );
                        continue;
                    }
                    text.replace_range(span.start..span.end, new_name);
                }
                if options.rename_in_strings || options.rename_in_comments {
                    text = syntax::replace_word_in_regions(
                        &text,
                        &old_name,
                        new_name,
                        options.rename_in_strings,
                        options.rename_in_comments,
                    );
                }
                document.text = text;
            }
        }

        // Keep the symbol table coherent for callers inspecting the new
        // value before it is published and reloaded.
        if let Some(sym) = renamed.symbols.get_mut(symbol.0 as usize) {
            if let Some(stripped) = sym.display.strip_suffix(old_name.as_str()) {
                sym.display = format!("{stripped}{new_name}");
            }
            sym.name = new_name.to_string();
        }
        Ok(renamed)
    }

    async fn is_member_implemented(
        &self,
        solution: &Solution,
        class: SymbolId,
        member: SymbolId,
    ) -> LensResult<bool> {
        let Some(wanted) = solution.try_symbol(member) else {
            return Ok(false);
        };
        let wanted_params = Self::parameter_types(wanted);

        let mut types = vec![class];
        types.extend(Self::base_chain(solution, class));
        for ty in types {
            let Some(type_symbol) = solution.try_symbol(ty) else {
                continue;
            };
            for &candidate_id in &type_symbol.members {
                let Some(candidate) = solution.try_symbol(candidate_id) else {
                    continue;
                };
                if candidate.kind == wanted.kind
                    && candidate.name == wanted.name
                    && Self::parameter_types(candidate) == wanted_params
                {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sidecar_path_appends_suffix() {
        assert_eq!(
            sidecar_path(Path::new("/x/App.sln")),
            PathBuf::from("/x/App.sln.lens.json")
        );
    }
}
