//! Change a method's signature and propagate to all call sites
//!
//! Text-oriented by design: parse once to find spans, splice text in
//! descending offset order, publish, invalidate. Indirect callers
//! (delegate captures, reflection) are not updated; the snapshot model
//! cannot detect reflection-based dispatch, so no rejection heuristic is
//! applied either.

use crate::params::{parse_added_parameters, parse_name_list, AddedParameter};
use lens_foundation::paths::display_relative;
use lens_foundation::{LensError, LensResult};
use lens_query::resolver;
use lens_semantic::syntax::{find_invocations, find_method_declarations, InvocationSite};
use lens_semantic::{ParameterInfo, TextSpan};
use lens_workspace::SolutionCache;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Inputs of one change-signature operation.
#[derive(Debug, Clone, Default)]
pub struct ChangeSignatureRequest {
    pub method_name: String,
    pub containing_type: Option<String>,
    /// Comma-separated `type name` entries, optional `= default`
    pub add_parameters: Option<String>,
    /// Comma-separated parameter names
    pub remove_parameters: Option<String>,
    /// Comma-separated parameter names in their new order
    pub reorder_parameters: Option<String>,
}

/// One slot of the new parameter list.
#[derive(Debug, Clone, Copy)]
enum NewParam {
    /// Index into the old parameter list
    Existing(usize),
    /// Index into the added-parameter list
    Added(usize),
}

pub async fn change_signature(
    cache: &SolutionCache,
    path: &Path,
    request: &ChangeSignatureRequest,
    cancel: &CancellationToken,
) -> LensResult<String> {
    let handle = cache.acquire(path, cancel).await?;
    let solution = &handle.solution;
    let method = resolver::resolve_method(
        solution,
        &request.method_name,
        request.containing_type.as_deref(),
    )?;
    if !method.is_in_source() {
        return Err(LensError::invalid_input(format!(
            "'{}' has no source declaration",
            method.display
        )));
    }
    let method_name = method.name.clone();
    let old_params: Vec<ParameterInfo> = method
        .signature
        .as_ref()
        .map(|s| s.parameters.clone())
        .unwrap_or_default();
    let old_names: Vec<String> = old_params.iter().map(|p| p.name.clone()).collect();
    let return_type = method
        .signature
        .as_ref()
        .map(|s| s.return_type.clone())
        .unwrap_or_else(|| "void".to_string());

    let added = match &request.add_parameters {
        Some(spec) => parse_added_parameters(spec)?,
        None => Vec::new(),
    };
    let removed = request
        .remove_parameters
        .as_deref()
        .map(parse_name_list)
        .unwrap_or_default();
    let reorder = request
        .reorder_parameters
        .as_deref()
        .map(parse_name_list)
        .unwrap_or_default();
    if added.is_empty() && removed.is_empty() && reorder.is_empty() {
        return Err(LensError::invalid_input(
            "nothing to change: specify addParameters, removeParameters, or reorderParameters",
        ));
    }

    for name in &removed {
        if !old_names.contains(name) {
            return Err(LensError::invalid_input(format!(
                "cannot remove unknown parameter '{name}' (method has: {})",
                old_names.join(", ")
            )));
        }
    }
    let surviving: Vec<usize> = (0..old_params.len())
        .filter(|&i| !removed.contains(&old_names[i]))
        .collect();
    for name in &reorder {
        let survives = surviving.iter().any(|&i| &old_names[i] == name);
        if !survives {
            return Err(LensError::invalid_input(format!(
                "reorder references '{name}', which is not a surviving parameter"
            )));
        }
    }
    for param in &added {
        if surviving.iter().any(|&i| old_names[i] == param.name) {
            return Err(LensError::invalid_input(format!(
                "added parameter '{}' collides with an existing parameter",
                param.name
            )));
        }
    }

    // New order: reordered survivors, remaining survivors in original
    // order, then additions.
    let mut new_order: Vec<NewParam> = Vec::new();
    for name in &reorder {
        if let Some(index) = surviving.iter().copied().find(|&i| &old_names[i] == name) {
            new_order.push(NewParam::Existing(index));
        }
    }
    for &index in &surviving {
        if !reorder.contains(&old_names[index]) {
            new_order.push(NewParam::Existing(index));
        }
    }
    for index in 0..added.len() {
        new_order.push(NewParam::Added(index));
    }

    let new_param_list = render_parameter_list(&old_params, &added, &new_order);
    let old_param_list = old_params
        .iter()
        .map(|p| p.display())
        .collect::<Vec<_>>()
        .join(", ");

    // Affected files: every caller file plus the declaration file
    let declaration_file = method
        .primary_location()
        .map(|l| l.file.clone())
        .ok_or_else(|| {
            LensError::invalid_input(format!("'{}' has no source declaration", method.display))
        })?;
    let mut files: BTreeSet<PathBuf> = BTreeSet::new();
    files.insert(declaration_file.clone());
    for caller in cache.provider().find_callers(solution, method.id).await? {
        for site in &caller.call_sites {
            files.insert(site.file.clone());
        }
    }
    if cancel.is_cancelled() {
        return Err(LensError::cancelled());
    }

    let mut new_solution = handle.solution.clone();
    let mut changed: Vec<(PathBuf, usize, bool)> = Vec::new();
    for file in &files {
        let Some(document) = solution.find_document(file) else {
            continue;
        };
        let is_declaration_file = document.path == declaration_file;
        let (new_text, call_sites, decl_edited) = rewrite_file(
            &document.text,
            &method_name,
            &old_names,
            &added,
            &new_order,
            &new_param_list,
            is_declaration_file,
        )?;
        if new_text != document.text {
            for project in &mut new_solution.projects {
                for doc in &mut project.documents {
                    if doc.path == document.path {
                        doc.text = new_text.clone();
                    }
                }
            }
            changed.push((document.path.clone(), call_sites, decl_edited));
        }
    }

    let mut summary = format!(
        "Changed signature of '{method_name}' ({} files updated)\n  old: {return_type} {method_name}({old_param_list})\n  new: {return_type} {method_name}({new_param_list})\n",
        changed.len()
    );
    if changed.is_empty() {
        return Ok(summary);
    }

    cache.apply(path, &new_solution, None, cancel).await?;
    info!(
        method = %method_name,
        files = changed.len(),
        "Signature change applied"
    );

    for (file, call_sites, decl_edited) in &changed {
        let mut notes = Vec::new();
        if *decl_edited {
            notes.push("declaration".to_string());
        }
        if *call_sites > 0 {
            notes.push(format!(
                "{call_sites} call site{}",
                if *call_sites == 1 { "" } else { "s" }
            ));
        }
        summary.push_str(&format!(
            "  {} ({})\n",
            display_relative(&handle.directory, file),
            notes.join(", ")
        ));
    }
    Ok(summary)
}

fn render_parameter_list(
    old_params: &[ParameterInfo],
    added: &[AddedParameter],
    new_order: &[NewParam],
) -> String {
    new_order
        .iter()
        .map(|slot| match slot {
            NewParam::Existing(i) => old_params[*i].display(),
            NewParam::Added(j) => {
                let param = &added[*j];
                match &param.default_value {
                    Some(default) => format!("{} {} = {default}", param.ty, param.name),
                    None => format!("{} {}", param.ty, param.name),
                }
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Rewrite one file. The declaration edit is applied first and the text
/// re-scanned, so invocation spans are located in the updated text.
#[allow(clippy::too_many_arguments)]
fn rewrite_file(
    text: &str,
    method_name: &str,
    old_names: &[String],
    added: &[AddedParameter],
    new_order: &[NewParam],
    new_param_list: &str,
    is_declaration_file: bool,
) -> LensResult<(String, usize, bool)> {
    let mut current = text.to_string();
    let mut decl_edited = false;

    if is_declaration_file {
        let declarations = find_method_declarations(&current, method_name);
        let site = declarations
            .iter()
            .find(|d| d.parameter_names == old_names)
            .or_else(|| {
                if declarations.len() == 1 {
                    declarations.first()
                } else {
                    None
                }
            })
            .ok_or_else(|| {
                LensError::analysis_failed(format!(
                    "cannot locate the declaration of '{method_name}' in the declaring file"
                ))
            })?;
        let span = site.param_list_span;
        if &current[span.start..span.end] != new_param_list {
            current.replace_range(span.start..span.end, new_param_list);
            decl_edited = true;
        }
    }

    // Invocations located in the (possibly updated) text
    let invocations = find_invocations(&current, method_name);
    let mut edits: Vec<(TextSpan, String)> = Vec::new();
    for invocation in &invocations {
        if let Some(new_args) = rewrite_arguments(invocation, old_names, added, new_order) {
            edits.push((invocation.arg_list_span, new_args));
        }
    }
    let call_sites = edits.len();

    // Descending start offset preserves the remaining spans
    edits.sort_by(|a, b| b.0.start.cmp(&a.0.start));
    for (span, replacement) in edits {
        current.replace_range(span.start..span.end, &replacement);
    }

    Ok((current, call_sites, decl_edited))
}

/// Build the new argument list for one invocation. Returns `None` when
/// the call site needs no edit (its text would be unchanged).
fn rewrite_arguments(
    invocation: &InvocationSite,
    old_names: &[String],
    added: &[AddedParameter],
    new_order: &[NewParam],
) -> Option<String> {
    // Map old parameter index -> argument text
    let mut mapped: Vec<Option<&str>> = vec![None; old_names.len()];
    let mut unmapped: Vec<&str> = Vec::new();
    for (position, argument) in invocation.arguments.iter().enumerate() {
        match &argument.name {
            Some(name) => match old_names.iter().position(|n| n == name) {
                Some(index) => mapped[index] = Some(argument.text.as_str()),
                None => unmapped.push(argument.text.as_str()),
            },
            None => {
                if position < old_names.len() {
                    mapped[position] = Some(argument.text.as_str());
                } else {
                    unmapped.push(argument.text.as_str());
                }
            }
        }
    }

    let mut new_args: Vec<String> = Vec::new();
    for slot in new_order {
        match slot {
            NewParam::Existing(index) => {
                if let Some(text) = mapped[*index] {
                    new_args.push(text.to_string());
                }
            }
            NewParam::Added(index) => {
                let param = &added[*index];
                // A default value applies at the call site; only
                // default-less additions need a synthetic argument
                if param.default_value.is_none() {
                    new_args.push(format!("default({})", param.ty));
                }
            }
        }
    }
    new_args.extend(unmapped.iter().map(|s| s.to_string()));

    let original: Vec<&str> = invocation.arguments.iter().map(|a| a.text.as_str()).collect();
    if new_args.len() == original.len()
        && new_args.iter().zip(original.iter()).all(|(a, b)| a.as_str() == *b)
    {
        return None;
    }
    Some(new_args.join(", "))
}
