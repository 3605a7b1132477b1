//! Extract a public interface from a class or struct

use lens_foundation::paths::display_relative;
use lens_foundation::{LensError, LensResult};
use lens_query::resolver;
use lens_semantic::syntax::{find_type_declaration, BaseListInsertion};
use lens_semantic::{Solution, Symbol, SymbolKind};
use lens_workspace::SolutionCache;
use std::path::Path;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Inputs of one extract-interface operation.
#[derive(Debug, Clone)]
pub struct ExtractInterfaceRequest {
    pub type_name: String,
    /// Defaults to `I{TypeName}`
    pub interface_name: Option<String>,
    /// Write the interface file and base-list edit; otherwise preview
    pub apply: bool,
}

/// Generate (and optionally apply) an interface for a type's public
/// non-static members.
pub async fn extract_interface(
    cache: &SolutionCache,
    path: &Path,
    request: &ExtractInterfaceRequest,
    cancel: &CancellationToken,
) -> LensResult<String> {
    let handle = cache.acquire(path, cancel).await?;
    let solution = &handle.solution;
    let ty = resolver::resolve_type(solution, &request.type_name)?;
    if !matches!(ty.kind, SymbolKind::Class | SymbolKind::Struct) {
        return Err(LensError::invalid_input(format!(
            "'{}' is a {}; interfaces are extracted from classes and structs",
            ty.display,
            ty.kind.display()
        )));
    }

    let members = extractable_members(solution, ty);
    if members.is_empty() {
        return Err(LensError::invalid_input(format!(
            "type '{}' has no public non-static members to extract",
            ty.display
        )));
    }

    let interface_name = request
        .interface_name
        .clone()
        .unwrap_or_else(|| format!("I{}", ty.name));
    let interface_text = render_interface(ty, &interface_name, &members);

    if !request.apply {
        return Ok(interface_text);
    }

    let location = ty
        .primary_location()
        .ok_or_else(|| LensError::invalid_input("type has no source declaration"))?
        .clone();
    let class_document = solution.find_document(&location.file).ok_or_else(|| {
        LensError::not_found(format!("document {} not loaded", location.file.display()))
    })?;

    // Splice the interface into the class's base list
    let updated_class_text = {
        let site = find_type_declaration(&class_document.text, &ty.name).ok_or_else(|| {
            LensError::analysis_failed(format!(
                "cannot locate the declaration of '{}' in {}",
                ty.name,
                location.file.display()
            ))
        })?;
        let mut text = class_document.text.clone();
        match site.insertion {
            BaseListInsertion::NewList { at } => {
                text.insert_str(at, &format!(" : {interface_name}"));
            }
            BaseListInsertion::Append { at } => {
                text.insert_str(at, &format!(", {interface_name}"));
            }
        }
        text
    };
    if cancel.is_cancelled() {
        return Err(LensError::cancelled());
    }

    let extension = location
        .file
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "cs".to_string());
    let interface_path = location
        .file
        .with_file_name(format!("{interface_name}.{extension}"));

    tokio::fs::write(&interface_path, &interface_text)
        .await
        .map_err(|e| {
            LensError::conflict(format!(
                "cannot write {}: {}",
                interface_path.display(),
                e
            ))
        })?;
    tokio::fs::write(&location.file, &updated_class_text)
        .await
        .map_err(|e| {
            LensError::conflict(format!("cannot write {}: {}", location.file.display(), e))
        })?;
    cache.invalidate(path).await;
    info!(
        interface = %interface_name,
        members = members.len(),
        "Interface extracted"
    );

    Ok(format!(
        "Extracted interface '{interface_name}' with {} members\n  {} (new)\n  {} (base list updated)\n",
        members.len(),
        display_relative(&handle.directory, &interface_path),
        display_relative(&handle.directory, &location.file)
    ))
}

/// Public, non-static ordinary methods, properties and events.
/// Constructors, operators and destructors never belong to an interface.
fn extractable_members<'a>(solution: &'a Solution, ty: &Symbol) -> Vec<&'a Symbol> {
    ty.members
        .iter()
        .filter_map(|&id| solution.try_symbol(id))
        .filter(|m| !m.is_compiler_generated())
        .filter(|m| m.accessibility == lens_semantic::Accessibility::Public)
        .filter(|m| !m.modifiers.is_static)
        .filter(|m| match m.kind {
            SymbolKind::Method => m.is_ordinary_method(),
            SymbolKind::Property | SymbolKind::Event => true,
            _ => false,
        })
        .collect()
}

fn render_interface(ty: &Symbol, interface_name: &str, members: &[&Symbol]) -> String {
    let namespaced = !ty.containing_namespace.is_empty();
    let indent = if namespaced { "    " } else { "" };
    let mut out = String::new();

    if namespaced {
        out.push_str(&format!("namespace {}\n{{\n", ty.containing_namespace));
    }
    out.push_str(&format!("{indent}public interface {interface_name}\n{indent}{{\n"));
    for member in members {
        out.push_str(&format!("{indent}    {}\n", member_signature(member)));
    }
    out.push_str(&format!("{indent}}}\n"));
    if namespaced {
        out.push_str("}\n");
    }
    out
}

/// Interface-member signature line: generics, parameter modifiers and
/// property accessors preserved; no accessibility keywords.
fn member_signature(member: &Symbol) -> String {
    match member.kind {
        SymbolKind::Method => {
            let signature = member.signature.as_ref();
            let return_type = signature.map(|s| s.return_type.as_str()).unwrap_or("void");
            let type_params = if member.type_parameters.is_empty() {
                String::new()
            } else {
                format!("<{}>", member.type_parameters.join(", "))
            };
            let params = signature
                .map(|s| {
                    s.parameters
                        .iter()
                        .map(|p| p.display())
                        .collect::<Vec<_>>()
                        .join(", ")
                })
                .unwrap_or_default();
            format!("{return_type} {}{type_params}({params});", member.name)
        }
        SymbolKind::Property => {
            let signature = member.signature.as_ref();
            let ty = signature.map(|s| s.return_type.as_str()).unwrap_or("object");
            let accessors = signature.and_then(|s| s.accessors).unwrap_or(
                lens_semantic::Accessors {
                    get: true,
                    set: false,
                    init: false,
                },
            );
            let mut list = Vec::new();
            if accessors.get {
                list.push("get;");
            }
            if accessors.set {
                list.push("set;");
            }
            if accessors.init {
                list.push("init;");
            }
            format!("{ty} {} {{ {} }}", member.name, list.join(" "))
        }
        SymbolKind::Event => {
            let ty = member
                .signature
                .as_ref()
                .map(|s| s.return_type.as_str())
                .unwrap_or("EventHandler");
            format!("event {ty} {};", member.name)
        }
        _ => String::new(),
    }
}
