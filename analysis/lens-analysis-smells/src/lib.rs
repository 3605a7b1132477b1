//! Code-smell analyzer
//!
//! Runs single-pass method-body metrics, structural checks over the
//! symbol graph, and (when `deep` is requested) semantic member-access
//! grouping for feature envy. Returns a formatted plain-text block,
//! grouped by severity, then smell, then symbol.

pub mod config;
pub mod metrics;
pub mod report;

mod body_checks;
mod feature_envy;
mod structural;

pub use config::{SmellCategory, SmellConfig};
pub use metrics::{analyze_method_body, MethodBodyMetrics};

use lens_analysis_common::{filters, Smell};
use lens_foundation::paths::display_relative;
use lens_foundation::{LensError, LensResult};
use lens_semantic::{Symbol, SymbolKind};
use lens_workspace::{SolutionCache, SolutionHandle};
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Analyze a solution for code smells and render the report.
pub async fn find_code_smells(
    cache: &SolutionCache,
    path: &Path,
    config: &SmellConfig,
    cancel: &CancellationToken,
) -> LensResult<String> {
    let handle = cache.acquire(path, cancel).await?;
    if let Some(project) = &config.project {
        if handle.solution.project_named(project).is_none() {
            return Err(LensError::not_found(format!(
                "no project named '{project}' in the solution"
            )));
        }
    }

    let types = candidate_types(&handle, config);
    debug!(types = types.len(), category = ?config.category, "Analyzing types");

    let mut smells: Vec<Smell> = Vec::new();
    for ty in &types {
        if cancel.is_cancelled() {
            return Err(LensError::cancelled());
        }
        body_checks::check_type(&handle, ty, config, &mut smells);
        structural::check_type(&handle, ty, config, &mut smells);
        if config.deep && config.category.includes_design() {
            feature_envy::check_type(&handle, ty, &mut smells);
        }
    }

    info!(
        smells = smells.len(),
        types = types.len(),
        "Code smell analysis complete"
    );
    Ok(report::render(&smells))
}

/// Source types that pass the shared exclusion filters and the optional
/// project scope.
fn candidate_types<'a>(handle: &'a Arc<SolutionHandle>, config: &SmellConfig) -> Vec<&'a Symbol> {
    handle
        .solution
        .symbols
        .iter()
        .filter(|s| s.kind.is_type())
        .filter(|s| !filters::is_excluded_type(s))
        .filter(|s| match &config.project {
            None => true,
            Some(project) => s
                .primary_location()
                .and_then(|l| handle.solution.project_of_document(&l.file))
                .map(|p| &p.name == project)
                .unwrap_or(false),
        })
        .collect()
}

/// Relative location of a symbol for report lines.
pub(crate) fn symbol_location(handle: &SolutionHandle, symbol: &Symbol) -> (String, u32) {
    symbol
        .primary_location()
        .map(|l| {
            (
                display_relative(&handle.directory, &l.file),
                l.line + 1,
            )
        })
        .unwrap_or_else(|| (String::new(), 0))
}

/// Ordinary methods of a type, with their symbols resolved.
pub(crate) fn ordinary_methods<'a>(
    handle: &'a SolutionHandle,
    ty: &Symbol,
) -> Vec<&'a Symbol> {
    ty.members
        .iter()
        .filter_map(|&id| handle.solution.try_symbol(id))
        .filter(|m| m.kind == SymbolKind::Method && m.is_ordinary_method())
        .filter(|m| !m.is_compiler_generated())
        .collect()
}
