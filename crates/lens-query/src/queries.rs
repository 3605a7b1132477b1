//! Read-only query operations
//!
//! Independent reads over a solution snapshot. All of them return empty
//! lists rather than failing when nothing matches, and all of them filter
//! implicitly-declared / compiler-generated symbols.

use crate::format::to_symbol_result;
use crate::resolver;
use lens_foundation::paths::{display_relative, paths_equal_ci};
use lens_foundation::protocol::{
    Detail, DiagnosticInfo, PackageEntry, ProjectInfo, SymbolResult, TypeHierarchyResult,
};
use lens_foundation::{LensError, LensResult};
use lens_semantic::{
    DiagnosticSeverity, Project, Solution, Symbol, SymbolId, SymbolKind,
};
use lens_workspace::{SolutionCache, SolutionHandle};
use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Read-side entry point over the workspace cache.
pub struct QueryEngine {
    cache: Arc<SolutionCache>,
}

impl QueryEngine {
    pub fn new(cache: Arc<SolutionCache>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &Arc<SolutionCache> {
        &self.cache
    }

    /// Case-insensitive substring (or exact-name) symbol search.
    pub async fn find_symbols(
        &self,
        path: &Path,
        query: &str,
        kind: Option<&str>,
        exact: bool,
        detail: Detail,
        cancel: &CancellationToken,
    ) -> LensResult<Vec<SymbolResult>> {
        let handle = self.cache.acquire(path, cancel).await?;
        let solution = &handle.solution;
        let kind_filter = kind.map(parse_kind_filter).transpose()?;
        let needle = query.to_lowercase();

        let mut seen: HashSet<(String, String)> = HashSet::new();
        let mut results = Vec::new();
        for symbol in &solution.symbols {
            if matches!(
                symbol.kind,
                SymbolKind::Local
                    | SymbolKind::Parameter
                    | SymbolKind::TypeParameter
                    | SymbolKind::Namespace
            ) {
                continue;
            }
            let matched = if exact {
                symbol.name == query
            } else {
                symbol.name.to_lowercase().contains(&needle)
            };
            if !matched {
                continue;
            }
            if let Some(filter) = &kind_filter {
                if !filter.accepts(symbol.kind) {
                    continue;
                }
            }
            let Some(result) = to_symbol_result(&handle.directory, solution, symbol, detail)
            else {
                continue;
            };
            if seen.insert((result.fully_qualified_name.clone(), result.kind.clone())) {
                results.push(result);
            }
        }
        sort_by_location(&mut results);
        Ok(results)
    }

    /// Top-level type declarations of one file; `depth = 1` expands each
    /// type with its members.
    pub async fn file_symbols(
        &self,
        path: &Path,
        file_path: &str,
        depth: u8,
        detail: Detail,
        cancel: &CancellationToken,
    ) -> LensResult<Vec<SymbolResult>> {
        let handle = self.cache.acquire(path, cancel).await?;
        let solution = &handle.solution;

        let requested = PathBuf::from(file_path);
        let resolved = if requested.is_absolute() {
            requested
        } else {
            handle.directory.join(requested)
        };
        let document = solution.find_document(&resolved).ok_or_else(|| {
            LensError::not_found(format!("no document '{file_path}' in the solution"))
        })?;

        let mut top_level: Vec<&Symbol> = solution
            .symbols
            .iter()
            .filter(|s| s.kind.is_type() && s.containing_type.is_none())
            .filter(|s| !s.is_compiler_generated())
            .filter(|s| {
                s.locations
                    .iter()
                    .any(|l| l.in_source && paths_equal_ci(&l.file, &document.path))
            })
            .collect();
        top_level.sort_by_key(|s| s.primary_location().map(|l| l.line).unwrap_or(0));

        let mut results = Vec::new();
        for ty in top_level {
            if let Some(result) = to_symbol_result(&handle.directory, solution, ty, detail) {
                results.push(result);
            }
            if depth >= 1 {
                for &member_id in &ty.members {
                    let Some(member) = solution.try_symbol(member_id) else {
                        continue;
                    };
                    if let Some(result) =
                        to_symbol_result(&handle.directory, solution, member, detail)
                    {
                        results.push(result);
                    }
                }
            }
        }
        Ok(results)
    }

    /// Members of a named type, in declaration order.
    pub async fn type_members(
        &self,
        path: &Path,
        type_name: &str,
        detail: Detail,
        cancel: &CancellationToken,
    ) -> LensResult<Vec<SymbolResult>> {
        let handle = self.cache.acquire(path, cancel).await?;
        let solution = &handle.solution;
        let ty = resolver::resolve_type(solution, type_name)?;
        Ok(ty
            .members
            .iter()
            .filter_map(|&id| solution.try_symbol(id))
            .filter_map(|m| to_symbol_result(&handle.directory, solution, m, detail))
            .collect())
    }

    /// Distinct namespaces declaring source types, sorted ascending. The
    /// global namespace is never listed.
    pub async fn list_namespaces(
        &self,
        path: &Path,
        cancel: &CancellationToken,
    ) -> LensResult<Vec<String>> {
        let handle = self.cache.acquire(path, cancel).await?;
        let solution = &handle.solution;
        let mut namespaces = BTreeSet::new();
        for project in &solution.projects {
            for symbol in resolver::all_named_types(solution, &project.compilation) {
                if symbol.is_in_source()
                    && !symbol.is_compiler_generated()
                    && !symbol.containing_namespace.is_empty()
                {
                    namespaces.insert(symbol.containing_namespace.clone());
                }
            }
        }
        Ok(namespaces.into_iter().collect())
    }

    /// Base-type chain (nearest first, ending at the `object` label) and
    /// the sorted transitive interface set.
    pub async fn type_hierarchy(
        &self,
        path: &Path,
        type_name: &str,
        cancel: &CancellationToken,
    ) -> LensResult<TypeHierarchyResult> {
        let handle = self.cache.acquire(path, cancel).await?;
        let solution = &handle.solution;
        let ty = resolver::resolve_type(solution, type_name)?;

        let mut base_types = Vec::new();
        let mut current = ty.base_type;
        while let Some(id) = current {
            let Some(base) = solution.try_symbol(id) else {
                break;
            };
            if is_universal_root(base) {
                break;
            }
            base_types.push(base.name.clone());
            current = base.base_type;
        }
        if ty.kind == SymbolKind::Class || ty.kind == SymbolKind::Struct || ty.kind == SymbolKind::Enum
        {
            base_types.push("object".to_string());
        }

        let mut interfaces: Vec<String> = transitive_interfaces(solution, ty.id)
            .into_iter()
            .filter_map(|id| solution.try_symbol(id))
            .map(|s| s.name.clone())
            .collect();
        interfaces.sort();
        interfaces.dedup();

        Ok(TypeHierarchyResult {
            type_name: ty.display.clone(),
            kind: ty.kind.display().to_string(),
            base_types,
            interfaces,
            members: None,
        })
    }

    /// Overriding methods of a virtual / abstract / override method.
    pub async fn find_overrides(
        &self,
        path: &Path,
        type_name: &str,
        method_name: &str,
        cancel: &CancellationToken,
    ) -> LensResult<Vec<SymbolResult>> {
        let handle = self.cache.acquire(path, cancel).await?;
        let solution = &handle.solution;
        let ty = resolver::resolve_type(solution, type_name)?;
        let method = ty
            .members
            .iter()
            .filter_map(|&id| solution.try_symbol(id))
            .find(|m| m.kind == SymbolKind::Method && m.name == method_name)
            .ok_or_else(|| {
                LensError::not_found(format!(
                    "type '{}' has no method named '{method_name}'",
                    ty.display
                ))
            })?;
        let m = &method.modifiers;
        if !(m.is_virtual || m.is_abstract || m.is_override) {
            return Err(LensError::invalid_input(format!(
                "method '{}' is neither virtual, abstract, nor an override",
                method.display
            )));
        }

        let ids = self
            .cache
            .provider()
            .find_overrides(solution, method.id)
            .await?;
        let mut results = self.ids_to_results(&handle, ids, Detail::Compact);
        sort_by_location(&mut results);
        Ok(results)
    }

    /// Implementations of an interface, or classes derived from a class.
    pub async fn find_derived_types(
        &self,
        path: &Path,
        type_name: &str,
        cancel: &CancellationToken,
    ) -> LensResult<Vec<SymbolResult>> {
        let handle = self.cache.acquire(path, cancel).await?;
        let solution = &handle.solution;
        let ty = resolver::resolve_type(solution, type_name)?;

        let ids = match ty.kind {
            SymbolKind::Interface => {
                self.cache
                    .provider()
                    .find_implementations(solution, ty.id)
                    .await?
            }
            SymbolKind::Class => {
                self.cache
                    .provider()
                    .find_derived_classes(solution, ty.id)
                    .await?
            }
            other => {
                return Err(LensError::invalid_input(format!(
                    "'{}' is a {}; derived types exist only for classes and interfaces",
                    ty.display,
                    other.display()
                )));
            }
        };
        let mut results = self.ids_to_results(&handle, ids, Detail::Compact);
        sort_by_location(&mut results);
        Ok(results)
    }

    /// Solution name plus a summary of each project.
    pub async fn list_projects(
        &self,
        path: &Path,
        cancel: &CancellationToken,
    ) -> LensResult<(String, Vec<ProjectInfo>)> {
        let handle = self.cache.acquire(path, cancel).await?;
        let solution_name = handle
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| handle.path.display().to_string());
        let infos = handle
            .solution
            .projects
            .iter()
            .map(|p| project_info(&handle, p))
            .collect();
        Ok((solution_name, infos))
    }

    pub async fn project_info(
        &self,
        path: &Path,
        project_name: Option<&str>,
        cancel: &CancellationToken,
    ) -> LensResult<ProjectInfo> {
        let project_handle = self.cache.project(path, project_name, cancel).await?;
        Ok(project_info(&project_handle.handle, project_handle.project()))
    }

    /// Relative paths of every source file, optionally scoped to a project.
    pub async fn source_files(
        &self,
        path: &Path,
        project_name: Option<&str>,
        cancel: &CancellationToken,
    ) -> LensResult<Vec<String>> {
        let handle = self.cache.acquire(path, cancel).await?;
        let mut files: Vec<String> = handle
            .solution
            .projects
            .iter()
            .filter(|p| project_name.map(|n| p.name == n).unwrap_or(true))
            .flat_map(|p| p.documents.iter())
            .map(|d| display_relative(&handle.directory, &d.path))
            .collect();
        if let Some(name) = project_name {
            if handle.solution.project_named(name).is_none() {
                return Err(LensError::not_found(format!(
                    "no project named '{name}' in the solution"
                )));
            }
        }
        files.sort();
        Ok(files)
    }

    /// Warning-or-higher diagnostics, errors first, then by (file, line).
    pub async fn diagnostics(
        &self,
        path: &Path,
        project_name: Option<&str>,
        cancel: &CancellationToken,
    ) -> LensResult<Vec<DiagnosticInfo>> {
        let handle = self.cache.acquire(path, cancel).await?;
        if let Some(name) = project_name {
            if handle.solution.project_named(name).is_none() {
                return Err(LensError::not_found(format!(
                    "no project named '{name}' in the solution"
                )));
            }
        }
        let mut results: Vec<(DiagnosticSeverity, DiagnosticInfo)> = handle
            .solution
            .projects
            .iter()
            .filter(|p| project_name.map(|n| p.name == n).unwrap_or(true))
            .flat_map(|p| p.compilation.diagnostics.iter())
            .filter(|d| d.severity >= DiagnosticSeverity::Warning)
            .map(|d| {
                (
                    d.severity,
                    DiagnosticInfo {
                        id: d.id.clone(),
                        severity: d.severity.display().to_string(),
                        message: d.message.clone(),
                        file_path: d
                            .file
                            .as_ref()
                            .map(|f| display_relative(&handle.directory, f))
                            .unwrap_or_default(),
                        line: if d.file.is_some() { d.line + 1 } else { 0 },
                    },
                )
            })
            .collect();
        results.sort_by(|(sev_a, a), (sev_b, b)| {
            sev_b
                .cmp(sev_a)
                .then(a.file_path.cmp(&b.file_path))
                .then(a.line.cmp(&b.line))
        });
        Ok(results.into_iter().map(|(_, d)| d).collect())
    }

    /// Full declaration source of one symbol.
    pub async fn symbol_source(
        &self,
        path: &Path,
        symbol_name: &str,
        containing_type: Option<&str>,
        cancel: &CancellationToken,
    ) -> LensResult<SymbolResult> {
        let handle = self.cache.acquire(path, cancel).await?;
        let solution = &handle.solution;
        let symbol = resolver::resolve_symbol(solution, symbol_name, containing_type)?;
        to_symbol_result(&handle.directory, solution, symbol, Detail::Full).ok_or_else(|| {
            LensError::not_found(format!(
                "symbol '{}' has no source declaration",
                symbol.display
            ))
        })
    }

    fn ids_to_results(
        &self,
        handle: &Arc<SolutionHandle>,
        ids: Vec<SymbolId>,
        detail: Detail,
    ) -> Vec<SymbolResult> {
        ids.into_iter()
            .filter_map(|id| handle.solution.try_symbol(id))
            .filter(|s| s.is_in_source())
            .filter_map(|s| to_symbol_result(&handle.directory, &handle.solution, s, detail))
            .collect()
    }
}

fn sort_by_location(results: &mut [SymbolResult]) {
    results.sort_by(|a, b| a.file_path.cmp(&b.file_path).then(a.line.cmp(&b.line)));
}

fn is_universal_root(symbol: &Symbol) -> bool {
    symbol.display == "object" || symbol.display == "System.Object"
}

fn transitive_interfaces(solution: &Solution, ty: SymbolId) -> Vec<SymbolId> {
    let mut seen = Vec::new();
    let mut stack = vec![ty];
    // Include interfaces declared on base types as well
    let mut current = solution.try_symbol(ty).and_then(|s| s.base_type);
    while let Some(id) = current {
        stack.push(id);
        current = solution.try_symbol(id).and_then(|s| s.base_type);
    }
    while let Some(id) = stack.pop() {
        if let Some(symbol) = solution.try_symbol(id) {
            for &iface in &symbol.interfaces {
                if !seen.contains(&iface) {
                    seen.push(iface);
                    stack.push(iface);
                }
            }
        }
    }
    seen
}

fn project_info(handle: &Arc<SolutionHandle>, project: &Project) -> ProjectInfo {
    ProjectInfo {
        name: project.name.clone(),
        file_path: display_relative(&handle.directory, &project.path),
        target_framework: project.target_framework.clone(),
        output_type: project.output_type.clone(),
        source_file_count: project.documents.len(),
        project_references: project.project_references.clone(),
        package_references: project
            .package_references
            .iter()
            .map(|p| PackageEntry {
                name: p.name.clone(),
                version: p.version.clone(),
            })
            .collect(),
    }
}

/// Kind filter accepted by findSymbols.
struct KindFilter {
    kinds: Vec<SymbolKind>,
}

impl KindFilter {
    fn accepts(&self, kind: SymbolKind) -> bool {
        self.kinds.contains(&kind)
    }
}

fn parse_kind_filter(value: &str) -> LensResult<KindFilter> {
    let kinds = match value.to_lowercase().as_str() {
        "class" => vec![SymbolKind::Class],
        "struct" => vec![SymbolKind::Struct],
        "interface" => vec![SymbolKind::Interface],
        "enum" => vec![SymbolKind::Enum],
        "delegate" => vec![SymbolKind::Delegate],
        "type" => vec![
            SymbolKind::Class,
            SymbolKind::Struct,
            SymbolKind::Interface,
            SymbolKind::Enum,
            SymbolKind::Delegate,
        ],
        "method" => vec![SymbolKind::Method],
        "property" => vec![SymbolKind::Property],
        "field" => vec![SymbolKind::Field],
        "event" => vec![SymbolKind::Event],
        other => {
            return Err(LensError::invalid_input(format!(
                "unknown symbol kind '{other}'"
            )));
        }
    };
    Ok(KindFilter { kinds })
}
