//! Rename across all references, including the declaring file

use crate::is_valid_identifier;
use lens_foundation::paths::{display_relative, file_stem_equals_ci};
use lens_foundation::{LensError, LensResult};
use lens_semantic::{RenameOptions, Solution, SymbolKind};
use lens_query::resolver;
use lens_workspace::{PostApply, SolutionCache};
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Inputs of one rename operation.
#[derive(Debug, Clone)]
pub struct RenameRequest {
    pub symbol_name: String,
    pub containing_type: Option<String>,
    pub new_name: String,
    pub rename_in_strings: bool,
    pub rename_in_comments: bool,
}

/// Rename a symbol everywhere and publish the result atomically.
pub async fn rename(
    cache: &SolutionCache,
    path: &Path,
    request: &RenameRequest,
    cancel: &CancellationToken,
) -> LensResult<String> {
    if !is_valid_identifier(&request.new_name) {
        return Err(LensError::invalid_input(format!(
            "'{}' is not a valid identifier",
            request.new_name
        )));
    }

    let handle = cache.acquire(path, cancel).await?;
    let solution = &handle.solution;
    let symbol = resolver::resolve_symbol(
        solution,
        &request.symbol_name,
        request.containing_type.as_deref(),
    )?;

    let renameable = symbol.kind.is_type()
        || matches!(
            symbol.kind,
            SymbolKind::Method | SymbolKind::Property | SymbolKind::Field | SymbolKind::Event
        );
    if !renameable {
        return Err(LensError::invalid_input(format!(
            "cannot rename a {}; only types, methods, properties, fields and events",
            symbol.kind.display()
        )));
    }
    if !symbol.is_in_source() {
        return Err(LensError::invalid_input(format!(
            "'{}' has no source declaration to rename",
            symbol.display
        )));
    }
    if symbol.name == request.new_name {
        return Ok(format!(
            "Renamed '{}' to '{}' (0 files changed)",
            symbol.name, request.new_name
        ));
    }

    // A type declared in a file named after it moves with the rename
    let file_rename: Option<(PathBuf, PathBuf)> = if symbol.kind.is_type() {
        symbol
            .primary_location()
            .filter(|l| file_stem_equals_ci(&l.file, &symbol.name))
            .map(|l| {
                let extension = l.file.extension().map(|e| e.to_string_lossy().into_owned());
                let mut target = l.file.with_file_name(&request.new_name);
                if let Some(ext) = extension {
                    target.set_extension(ext);
                }
                (l.file.clone(), target)
            })
    } else {
        None
    };

    let options = RenameOptions {
        rename_in_strings: request.rename_in_strings,
        rename_in_comments: request.rename_in_comments,
    };
    let old_name = symbol.name.clone();
    let symbol_id = symbol.id;
    let new_solution = cache
        .provider()
        .rename(solution, symbol_id, &request.new_name, &options)
        .await?;
    if cancel.is_cancelled() {
        return Err(LensError::cancelled());
    }

    let changed = changed_documents(solution, &new_solution);
    if changed.is_empty() && file_rename.is_none() {
        return Ok(format!(
            "Renamed '{old_name}' to '{}' (0 files changed)",
            request.new_name
        ));
    }

    let post = file_rename
        .as_ref()
        .map(|(from, to)| PostApply::RenameFile {
            from: from.clone(),
            to: to.clone(),
        });
    cache.apply(path, &new_solution, post, cancel).await?;
    info!(
        symbol = %old_name,
        new_name = %request.new_name,
        files = changed.len(),
        "Rename applied"
    );

    let mut summary = format!(
        "Renamed '{old_name}' to '{}' ({} files changed)\n",
        request.new_name,
        changed.len()
    );
    for file in &changed {
        let annotation = match &file_rename {
            Some((from, to)) if from == file => {
                let to_name = to
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                format!(" (renamed to {to_name})")
            }
            _ => String::new(),
        };
        summary.push_str(&format!(
            "  {}{annotation}\n",
            display_relative(&handle.directory, file)
        ));
    }
    Ok(summary)
}

/// Documents whose text differs between the two solutions.
fn changed_documents(old: &Solution, new: &Solution) -> Vec<PathBuf> {
    let mut changed = Vec::new();
    for document in new.documents() {
        let differs = old
            .find_document(&document.path)
            .map(|d| d.text != document.text)
            .unwrap_or(true);
        if differs {
            changed.push(document.path.clone());
        }
    }
    changed.sort();
    changed
}
