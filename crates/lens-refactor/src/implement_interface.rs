//! Generate stubs for unimplemented interface members

use lens_foundation::paths::display_relative;
use lens_foundation::{LensError, LensResult};
use lens_query::resolver;
use lens_semantic::syntax::find_type_declaration;
use lens_semantic::{Symbol, SymbolKind};
use lens_workspace::SolutionCache;
use std::path::Path;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Inputs of one implement-interface operation.
#[derive(Debug, Clone)]
pub struct ImplementInterfaceRequest {
    pub type_name: String,
    /// All declared interfaces when absent
    pub interface_name: Option<String>,
}

/// Insert stubs for every missing interface member, one text edit before
/// the class's closing brace. A single edit needs no offset tracking.
pub async fn implement_interface(
    cache: &SolutionCache,
    path: &Path,
    request: &ImplementInterfaceRequest,
    cancel: &CancellationToken,
) -> LensResult<String> {
    let handle = cache.acquire(path, cancel).await?;
    let solution = &handle.solution;
    let ty = resolver::resolve_type(solution, &request.type_name)?;
    if !matches!(ty.kind, SymbolKind::Class | SymbolKind::Struct) {
        return Err(LensError::invalid_input(format!(
            "'{}' is a {}; only classes and structs implement interfaces",
            ty.display,
            ty.kind.display()
        )));
    }

    let interfaces: Vec<&Symbol> = match &request.interface_name {
        None => ty
            .interfaces
            .iter()
            .filter_map(|&id| solution.try_symbol(id))
            .collect(),
        Some(name) => {
            let declared = ty
                .interfaces
                .iter()
                .filter_map(|&id| solution.try_symbol(id))
                .find(|i| &i.name == name || &i.display == name);
            match declared {
                Some(interface) => vec![interface],
                None => {
                    return Err(LensError::not_found(format!(
                        "type '{}' does not declare interface '{name}'",
                        ty.display
                    )));
                }
            }
        }
    };

    // Collect missing members per interface, preserving interface order
    let mut added: Vec<(String, Vec<String>, Vec<String>)> = Vec::new();
    for interface in &interfaces {
        let mut signatures = Vec::new();
        let mut stubs = Vec::new();
        for &member_id in &interface.members {
            let Some(member) = solution.try_symbol(member_id) else {
                continue;
            };
            let stubbable = match member.kind {
                SymbolKind::Method => member.is_ordinary_method(),
                SymbolKind::Property | SymbolKind::Event => true,
                _ => false,
            };
            if !stubbable {
                continue;
            }
            if cache
                .provider()
                .is_member_implemented(solution, ty.id, member_id)
                .await?
            {
                continue;
            }
            signatures.push(stub_signature(member));
            stubs.push(render_stub(member));
        }
        if !stubs.is_empty() {
            added.push((interface.name.clone(), signatures, stubs));
        }
    }
    if cancel.is_cancelled() {
        return Err(LensError::cancelled());
    }

    if added.is_empty() {
        return Ok(format!(
            "All interface members of '{}' are already implemented (0 stubs added)",
            ty.display
        ));
    }

    let location = ty
        .primary_location()
        .ok_or_else(|| LensError::invalid_input("type has no source declaration"))?
        .clone();
    let document = solution.find_document(&location.file).ok_or_else(|| {
        LensError::not_found(format!("document {} not loaded", location.file.display()))
    })?;
    let site = find_type_declaration(&document.text, &ty.name).ok_or_else(|| {
        LensError::analysis_failed(format!(
            "cannot locate the declaration of '{}' in {}",
            ty.name,
            location.file.display()
        ))
    })?;

    // One insertion at the closing brace's start offset
    let block = added
        .iter()
        .flat_map(|(_, _, stubs)| stubs.iter())
        .map(|stub| indent_block(stub, "    "))
        .collect::<Vec<_>>()
        .join("\n\n");
    let insert_at = document.text[..site.close_brace]
        .rfind('\n')
        .map(|i| i + 1)
        .unwrap_or(site.close_brace);
    let mut text = document.text.clone();
    text.insert_str(insert_at, &format!("{block}\n"));

    tokio::fs::write(&location.file, &text).await.map_err(|e| {
        LensError::conflict(format!("cannot write {}: {}", location.file.display(), e))
    })?;
    cache.invalidate(path).await;

    let total: usize = added.iter().map(|(_, s, _)| s.len()).sum();
    info!(class = %ty.display, stubs = total, "Interface stubs inserted");

    let mut summary = format!(
        "Implemented {total} members in '{}' ({})\n",
        ty.display,
        display_relative(&handle.directory, &location.file)
    );
    for (interface_name, signatures, _) in &added {
        summary.push_str(&format!("  {interface_name}:\n"));
        for signature in signatures {
            summary.push_str(&format!("    {signature}\n"));
        }
    }
    Ok(summary)
}

fn stub_signature(member: &Symbol) -> String {
    let signature = member.signature.as_ref();
    match member.kind {
        SymbolKind::Method => {
            let return_type = signature.map(|s| s.return_type.as_str()).unwrap_or("void");
            let params = signature
                .map(|s| {
                    s.parameters
                        .iter()
                        .map(|p| p.display())
                        .collect::<Vec<_>>()
                        .join(", ")
                })
                .unwrap_or_default();
            format!("{return_type} {}({params})", member.name)
        }
        SymbolKind::Property => {
            let ty = signature.map(|s| s.return_type.as_str()).unwrap_or("object");
            format!("{ty} {}", member.name)
        }
        SymbolKind::Event => {
            let ty = signature.map(|s| s.return_type.as_str()).unwrap_or("EventHandler");
            format!("event {ty} {}", member.name)
        }
        _ => member.name.clone(),
    }
}

/// Method and property stubs fail with "not implemented" at runtime;
/// events become a bare public declaration.
fn render_stub(member: &Symbol) -> String {
    let signature = member.signature.as_ref();
    match member.kind {
        SymbolKind::Method => {
            let return_type = signature.map(|s| s.return_type.as_str()).unwrap_or("void");
            let params = signature
                .map(|s| {
                    s.parameters
                        .iter()
                        .map(|p| p.display())
                        .collect::<Vec<_>>()
                        .join(", ")
                })
                .unwrap_or_default();
            format!(
                "public {return_type} {}({params})\n{{\n    throw new NotImplementedException();\n}}",
                member.name
            )
        }
        SymbolKind::Property => {
            let ty = signature.map(|s| s.return_type.as_str()).unwrap_or("object");
            let accessors = signature.and_then(|s| s.accessors).unwrap_or(
                lens_semantic::Accessors {
                    get: true,
                    set: false,
                    init: false,
                },
            );
            let mut lines = Vec::new();
            if accessors.get {
                lines.push("    get => throw new NotImplementedException();".to_string());
            }
            if accessors.set {
                lines.push("    set => throw new NotImplementedException();".to_string());
            }
            if accessors.init {
                lines.push("    init => throw new NotImplementedException();".to_string());
            }
            format!(
                "public {ty} {}\n{{\n{}\n}}",
                member.name,
                lines.join("\n")
            )
        }
        SymbolKind::Event => {
            let ty = signature.map(|s| s.return_type.as_str()).unwrap_or("EventHandler");
            format!("public event {ty} {};", member.name)
        }
        _ => String::new(),
    }
}

fn indent_block(block: &str, indent: &str) -> String {
    block
        .lines()
        .map(|line| {
            if line.is_empty() {
                line.to_string()
            } else {
                format!("{indent}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
