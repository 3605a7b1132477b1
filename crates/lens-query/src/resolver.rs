//! Symbol resolver
//!
//! Maps textual names to semantic entities across the whole solution with
//! 0 / 1 / N semantics: zero matches is `NotFound`, two or more distinct
//! matches is `Ambiguous` with every candidate listed. Method resolution
//! is the one exception: overloads resolve to the first candidate with a
//! warning on the side channel instead of failing.

use lens_foundation::{LensError, LensResult};
use lens_semantic::{Compilation, Namespace, Solution, Symbol, SymbolId, SymbolKind};
use std::collections::HashSet;
use tracing::warn;

/// Every named type of one compilation: direct namespace members, nested
/// types, and everything in sub-namespaces. The namespace / nesting trees
/// are acyclic by construction, so plain recursion terminates.
pub fn all_named_types<'a>(solution: &'a Solution, compilation: &'a Compilation) -> Vec<&'a Symbol> {
    let mut types = Vec::new();
    collect_namespace(solution, &compilation.global_namespace, &mut types);
    types
}

fn collect_namespace<'a>(solution: &'a Solution, namespace: &Namespace, out: &mut Vec<&'a Symbol>) {
    for &type_id in &namespace.types {
        collect_type(solution, type_id, out);
    }
    for child in &namespace.namespaces {
        collect_namespace(solution, child, out);
    }
}

fn collect_type<'a>(solution: &'a Solution, id: SymbolId, out: &mut Vec<&'a Symbol>) {
    let Some(symbol) = solution.try_symbol(id) else {
        return;
    };
    out.push(symbol);
    for &member in &symbol.members {
        if let Some(nested) = solution.try_symbol(member) {
            if nested.kind.is_type() {
                collect_type(solution, member, out);
            }
        }
    }
}

/// Keep one symbol per distinct `(display, kind)` pair, preserving order.
/// The same entity seen through project references collapses here.
fn dedup<'a>(candidates: Vec<&'a Symbol>) -> Vec<&'a Symbol> {
    let mut seen_ids = HashSet::new();
    let mut seen_keys = HashSet::new();
    let mut out = Vec::new();
    for symbol in candidates {
        if !seen_ids.insert(symbol.id) {
            continue;
        }
        if !seen_keys.insert((symbol.display.clone(), symbol.kind)) {
            continue;
        }
        out.push(symbol);
    }
    out
}

fn candidate_list(candidates: &[&Symbol]) -> String {
    candidates
        .iter()
        .map(|s| {
            let file = s
                .primary_location()
                .map(|l| l.file.display().to_string())
                .unwrap_or_else(|| "<metadata>".to_string());
            format!("{} ({})", s.display, file)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Resolve a type by short name or fully qualified display form.
pub fn resolve_type<'a>(solution: &'a Solution, name: &str) -> LensResult<&'a Symbol> {
    let mut candidates = Vec::new();
    for project in &solution.projects {
        for symbol in all_named_types(solution, &project.compilation) {
            if symbol.is_compiler_generated() {
                continue;
            }
            if symbol.name == name || symbol.display == name {
                candidates.push(symbol);
            }
        }
    }
    let candidates = dedup(candidates);
    match candidates.len() {
        0 => Err(LensError::not_found(format!("no type named '{name}'"))),
        1 => Ok(candidates[0]),
        _ => Err(LensError::ambiguous(format!(
            "type name '{name}' matches {} types: {}",
            candidates.len(),
            candidate_list(&candidates)
        ))),
    }
}

/// Resolve any symbol by name, optionally scoped to a containing type.
pub fn resolve_symbol<'a>(
    solution: &'a Solution,
    name: &str,
    containing_type: Option<&str>,
) -> LensResult<&'a Symbol> {
    if let Some(type_name) = containing_type {
        let ty = resolve_type(solution, type_name)?;
        return ty
            .members
            .iter()
            .filter_map(|&id| solution.try_symbol(id))
            .find(|m| m.name == name)
            .ok_or_else(|| {
                LensError::not_found(format!(
                    "type '{}' has no member named '{name}'",
                    ty.display
                ))
            });
    }

    let candidates = dedup(
        solution
            .symbols
            .iter()
            .filter(|s| !s.is_compiler_generated())
            .filter(|s| {
                !matches!(
                    s.kind,
                    SymbolKind::Local | SymbolKind::Parameter | SymbolKind::TypeParameter
                )
            })
            .filter(|s| s.name == name || s.display == name)
            .collect(),
    );
    match candidates.len() {
        0 => Err(LensError::not_found(format!("no symbol named '{name}'"))),
        1 => Ok(candidates[0]),
        _ => Err(LensError::ambiguous(format!(
            "symbol name '{name}' matches {} symbols: {}",
            candidates.len(),
            candidate_list(&candidates)
        ))),
    }
}

/// Resolve a method by name. Multiple overloads resolve to the first one
/// with a side-channel warning; they are not an error.
pub fn resolve_method<'a>(
    solution: &'a Solution,
    name: &str,
    containing_type: Option<&str>,
) -> LensResult<&'a Symbol> {
    let candidates: Vec<&Symbol> = if let Some(type_name) = containing_type {
        let ty = resolve_type(solution, type_name)?;
        ty.members
            .iter()
            .filter_map(|&id| solution.try_symbol(id))
            .filter(|m| m.kind == SymbolKind::Method && m.name == name)
            .collect()
    } else {
        solution
            .symbols
            .iter()
            .filter(|s| s.kind == SymbolKind::Method && !s.is_compiler_generated())
            .filter(|s| s.name == name || s.display == name)
            .collect()
    };
    let candidates = dedup(candidates);
    match candidates.len() {
        0 => Err(LensError::not_found(format!("no method named '{name}'"))),
        1 => Ok(candidates[0]),
        _ => {
            warn!(
                method = name,
                overloads = candidates.len(),
                "Multiple overloads match; using the first"
            );
            Ok(candidates[0])
        }
    }
}
