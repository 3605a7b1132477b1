//! Reference engine
//!
//! Produces reference / caller / usage results by querying the semantic
//! model provider, then shapes each hit with its source line, optional
//! surrounding context, and the enclosing declaration.

use crate::format::minimally_qualified;
use crate::resolver;
use lens_foundation::paths::display_relative;
use lens_foundation::protocol::{Detail, ReferenceResult};
use lens_foundation::{LensError, LensResult};
use lens_semantic::{ReferenceHit, SymbolKind};
use lens_workspace::SolutionCache;
use std::path::Path;
use tokio_util::sync::CancellationToken;

/// How many lines of context the full detail level attaches on each side.
const CONTEXT_LINES: u32 = 2;

/// What flavor of hits the caller wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceMode {
    All,
    Callers,
    Usages,
}

impl ReferenceMode {
    pub fn parse(value: &str) -> LensResult<Self> {
        match value {
            "all" => Ok(Self::All),
            "callers" => Ok(Self::Callers),
            "usages" => Ok(Self::Usages),
            other => Err(LensError::invalid_input(format!(
                "unknown reference mode '{other}' (expected all, callers, or usages)"
            ))),
        }
    }
}

/// Inputs of one findReferences request.
#[derive(Debug, Clone)]
pub struct ReferenceQuery {
    pub symbol_name: String,
    pub containing_type: Option<String>,
    pub project_scope: Option<String>,
    pub detail: Detail,
    pub mode: ReferenceMode,
}

/// Run a reference query against a solution.
pub async fn find_references(
    cache: &SolutionCache,
    path: &Path,
    query: &ReferenceQuery,
    cancel: &CancellationToken,
) -> LensResult<Vec<ReferenceResult>> {
    let handle = cache.acquire(path, cancel).await?;
    let solution = &handle.solution;

    let symbol = resolver::resolve_symbol(
        solution,
        &query.symbol_name,
        query.containing_type.as_deref(),
    )?;
    if query.mode == ReferenceMode::Callers && symbol.kind != SymbolKind::Method {
        return Err(LensError::invalid_input(format!(
            "'{}' is a {}, not a method; callers mode needs a method",
            symbol.display,
            symbol.kind.display()
        )));
    }

    let provider = cache.provider();
    let hits: Vec<ReferenceHit> = match query.mode {
        ReferenceMode::All | ReferenceMode::Usages => {
            provider.find_references(solution, symbol.id).await?
        }
        ReferenceMode::Callers => provider
            .find_callers(solution, symbol.id)
            .await?
            .into_iter()
            .flat_map(|caller| caller.call_sites)
            .collect(),
    };
    if cancel.is_cancelled() {
        return Err(LensError::cancelled());
    }

    let mut results = Vec::new();
    for hit in hits {
        if let Some(scope) = &query.project_scope {
            let in_scope = solution
                .project_of_document(&hit.file)
                .map(|p| &p.name == scope)
                .unwrap_or(false);
            if !in_scope {
                continue;
            }
        }
        let Some(document) = solution.find_document(&hit.file) else {
            continue;
        };

        let code_snippet = document
            .line_text(hit.line)
            .map(|l| l.trim().to_string())
            .unwrap_or_default();

        let (context_before, context_after) = if query.detail.is_full() {
            let before = (hit.line.saturating_sub(CONTEXT_LINES)..hit.line)
                .filter_map(|l| document.line_text(l))
                .map(|l| l.to_string())
                .collect();
            let after = (hit.line + 1..=hit.line + CONTEXT_LINES)
                .filter_map(|l| document.line_text(l))
                .map(|l| l.to_string())
                .collect();
            (before, after)
        } else {
            (Vec::new(), Vec::new())
        };

        let containing_symbol = solution
            .enclosing_declaration(&hit.file, hit.span.start)
            .map(|s| minimally_qualified(solution, s));

        results.push(ReferenceResult {
            file_path: display_relative(&handle.directory, &hit.file),
            line: hit.line + 1,
            column: hit.column + 1,
            code_snippet,
            context_before,
            context_after,
            containing_symbol,
        });
    }

    results.sort_by(|a, b| a.file_path.cmp(&b.file_path).then(a.line.cmp(&b.line)));
    Ok(results)
}
