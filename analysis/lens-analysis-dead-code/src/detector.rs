//! Core unused-code detection algorithm

use crate::config::UnusedCodeConfig;
use crate::report::{self, UnusedSymbol};
use lens_analysis_common::filters;
use lens_foundation::paths::display_relative;
use lens_foundation::{LensError, LensResult};
use lens_semantic::{Accessibility, MethodKind, Symbol, SymbolKind};
use lens_workspace::SolutionCache;
use std::path::Path;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Analyze the solution for symbols nothing references.
pub async fn find_unused_code(
    cache: &SolutionCache,
    path: &Path,
    config: &UnusedCodeConfig,
    cancel: &CancellationToken,
) -> LensResult<String> {
    let start_time = Instant::now();
    let handle = cache.acquire(path, cancel).await?;
    let solution = &handle.solution;
    if let Some(project) = &config.project {
        if solution.project_named(project).is_none() {
            return Err(LensError::not_found(format!(
                "no project named '{project}' in the solution"
            )));
        }
    }

    // 1. Collect analyzable symbols
    let candidates: Vec<&Symbol> = solution
        .symbols
        .iter()
        .filter(|s| should_analyze(solution, s, config))
        .collect();
    let analyzed = candidates.len();
    debug!(candidates = analyzed, "Collected analyzable symbols");

    // 2. Count references; zero non-declaration hits means unused
    let mut unused: Vec<UnusedSymbol> = Vec::new();
    for symbol in candidates {
        if cancel.is_cancelled() {
            return Err(LensError::cancelled());
        }
        let references = cache
            .provider()
            .find_references(solution, symbol.id)
            .await?;
        if !references.is_empty() {
            continue;
        }
        let (file_path, line) = symbol
            .primary_location()
            .map(|l| (display_relative(&handle.directory, &l.file), l.line + 1))
            .unwrap_or_default();
        unused.push(UnusedSymbol {
            kind: symbol.kind.display().to_string(),
            display: symbol.display.clone(),
            file_path,
            line,
        });
    }
    unused.sort_by(|a, b| a.file_path.cmp(&b.file_path).then(a.line.cmp(&b.line)));

    info!(
        unused = unused.len(),
        analyzed,
        duration_ms = start_time.elapsed().as_millis() as u64,
        "Unused code analysis complete"
    );

    // 3. Render
    Ok(report::render(
        config.scope,
        &unused,
        analyzed,
        start_time.elapsed(),
    ))
}

/// Conservative candidate filter. Public symbols are reachable from
/// outside the solution, so they are never reported.
fn should_analyze(
    solution: &lens_semantic::Solution,
    symbol: &Symbol,
    config: &UnusedCodeConfig,
) -> bool {
    if !config.scope.accepts(symbol.kind) {
        return false;
    }
    if !symbol.is_in_source() || symbol.is_compiler_generated() {
        return false;
    }
    if symbol.accessibility == Accessibility::Public {
        return false;
    }
    if filters::has_excluded_attribute(symbol) {
        return false;
    }
    if symbol.kind == SymbolKind::Method
        && !matches!(symbol.method_kind.unwrap_or_default(), MethodKind::Ordinary)
    {
        return false;
    }

    // The declaring type must itself be analyzable
    match symbol.containing_type.and_then(|id| solution.try_symbol(id)) {
        Some(owner) => {
            if filters::is_excluded_type(owner) {
                return false;
            }
        }
        None if symbol.kind.is_type() => {
            if filters::is_excluded_type(symbol) {
                return false;
            }
        }
        None => return false,
    }

    if let Some(project) = &config.project {
        let in_project = symbol
            .primary_location()
            .and_then(|l| solution.project_of_document(&l.file))
            .map(|p| &p.name == project)
            .unwrap_or(false);
        if !in_project {
            return false;
        }
    }
    true
}
