//! Result formatter
//!
//! Human-readable, line-oriented text output; never a machine-parseable
//! schema. Contracts kept here: visibility keywords lower-cased, modifiers
//! in canonical order (`static async virtual override abstract sealed` for
//! members, `abstract sealed static` for types), locations rendered as
//! `<path>:<line>` with 1-based lines, LF terminators throughout.

use lens_foundation::paths::display_relative;
use lens_foundation::protocol::{Detail, ReferenceResult, SymbolResult};
use lens_semantic::{Accessors, Solution, Symbol, SymbolKind};
use std::path::Path;

/// Canonical signature text for a symbol.
pub fn signature(symbol: &Symbol) -> String {
    let mut parts: Vec<String> = vec![symbol.accessibility.display().to_string()];

    if symbol.kind.is_type() {
        let m = &symbol.modifiers;
        if m.is_abstract {
            parts.push("abstract".to_string());
        }
        if m.is_sealed {
            parts.push("sealed".to_string());
        }
        if m.is_static {
            parts.push("static".to_string());
        }
        let keyword = if symbol.is_record {
            "record"
        } else {
            symbol.kind.display()
        };
        parts.push(keyword.to_string());
        parts.push(format!("{}{}", symbol.name, type_parameter_list(symbol)));
        if symbol.kind == SymbolKind::Delegate {
            if let Some(sig) = &symbol.signature {
                let last = parts.len() - 1;
                parts[last] = format!(
                    "{}{}({})",
                    symbol.name,
                    type_parameter_list(symbol),
                    parameter_list(symbol)
                );
                parts.insert(last, sig.return_type.clone());
            }
        }
        return parts.join(" ");
    }

    match symbol.kind {
        SymbolKind::Method => {
            let m = &symbol.modifiers;
            if m.is_static {
                parts.push("static".to_string());
            }
            if m.is_async {
                parts.push("async".to_string());
            }
            if m.is_virtual {
                parts.push("virtual".to_string());
            }
            if m.is_override {
                parts.push("override".to_string());
            }
            if m.is_abstract {
                parts.push("abstract".to_string());
            }
            if m.is_sealed {
                parts.push("sealed".to_string());
            }
            let return_type = symbol
                .signature
                .as_ref()
                .map(|s| s.return_type.as_str())
                .unwrap_or("void");
            parts.push(return_type.to_string());
            parts.push(format!(
                "{}{}({})",
                symbol.name,
                type_parameter_list(symbol),
                parameter_list(symbol)
            ));
        }
        SymbolKind::Property => {
            if symbol.modifiers.is_static {
                parts.push("static".to_string());
            }
            let ty = symbol
                .signature
                .as_ref()
                .map(|s| s.return_type.as_str())
                .unwrap_or("object");
            parts.push(ty.to_string());
            let accessors = symbol
                .signature
                .as_ref()
                .and_then(|s| s.accessors)
                .unwrap_or(Accessors {
                    get: true,
                    set: false,
                    init: false,
                });
            parts.push(format!("{} {}", symbol.name, accessor_list(accessors)));
        }
        SymbolKind::Field => {
            if symbol.modifiers.is_static {
                parts.push("static".to_string());
            }
            if symbol.modifiers.is_readonly {
                parts.push("readonly".to_string());
            }
            let ty = symbol
                .signature
                .as_ref()
                .map(|s| s.return_type.as_str())
                .unwrap_or("object");
            parts.push(ty.to_string());
            parts.push(symbol.name.clone());
        }
        SymbolKind::Event => {
            if symbol.modifiers.is_static {
                parts.push("static".to_string());
            }
            parts.push("event".to_string());
            let ty = symbol
                .signature
                .as_ref()
                .map(|s| s.return_type.as_str())
                .unwrap_or("EventHandler");
            parts.push(ty.to_string());
            parts.push(symbol.name.clone());
        }
        SymbolKind::Namespace => {
            return format!("namespace {}", symbol.display);
        }
        _ => {
            parts.push(symbol.name.clone());
        }
    }
    parts.join(" ")
}

fn type_parameter_list(symbol: &Symbol) -> String {
    if symbol.type_parameters.is_empty() {
        String::new()
    } else {
        format!("<{}>", symbol.type_parameters.join(", "))
    }
}

/// Parameters separated by `,` then a space.
pub fn parameter_list(symbol: &Symbol) -> String {
    symbol
        .signature
        .as_ref()
        .map(|s| {
            s.parameters
                .iter()
                .map(|p| p.display())
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_default()
}

fn accessor_list(accessors: Accessors) -> String {
    let mut inner = Vec::new();
    if accessors.get {
        inner.push("get;");
    }
    if accessors.set {
        inner.push("set;");
    }
    if accessors.init {
        inner.push("init;");
    }
    format!("{{ {} }}", inner.join(" "))
}

/// `<path>:<line>` with a 1-based line.
pub fn location_text(base: &Path, file: &Path, line0: u32) -> String {
    format!("{}:{}", display_relative(base, file), line0 + 1)
}

/// Minimally-qualified display of a declaration: `Type.Member` when the
/// symbol is nested, its own name otherwise.
pub fn minimally_qualified(solution: &Solution, symbol: &Symbol) -> String {
    match symbol
        .containing_type
        .and_then(|id| solution.try_symbol(id))
    {
        Some(owner) => format!("{}.{}", owner.name, symbol.name),
        None => symbol.name.clone(),
    }
}

/// Shape a symbol into a transport result. Returns `None` for symbols
/// without an in-source declaration; those never appear in listings.
pub fn to_symbol_result(
    base: &Path,
    solution: &Solution,
    symbol: &Symbol,
    detail: Detail,
) -> Option<SymbolResult> {
    if symbol.is_compiler_generated() {
        return None;
    }
    let location = symbol.locations.iter().find(|l| l.in_source)?;

    let source_body = if detail.is_full() {
        location.decl_span.and_then(|span| {
            solution
                .find_document(&location.file)
                .and_then(|doc| doc.text.get(span.start..span.end))
                .map(|s| s.to_string())
        })
    } else {
        None
    };

    Some(SymbolResult {
        name: symbol.name.clone(),
        fully_qualified_name: symbol.display.clone(),
        kind: symbol.kind.display().to_string(),
        signature: signature(symbol),
        file_path: display_relative(base, &location.file),
        line: location.line + 1,
        doc_summary: if detail.is_full() {
            symbol.doc_summary.clone()
        } else {
            None
        },
        source_body,
    })
}

/// One line per entity; the full variant adds an indented doc-summary
/// sub-line and the indented source body.
pub fn format_symbol_list(results: &[SymbolResult]) -> String {
    let mut out = String::new();
    for result in results {
        out.push_str(&format!(
            "{} [{}:{}]\n",
            result.signature, result.file_path, result.line
        ));
        if let Some(doc) = &result.doc_summary {
            out.push_str(&format!("    {doc}\n"));
        }
        if let Some(body) = &result.source_body {
            for line in body.lines() {
                out.push_str(&format!("    {line}\n"));
            }
        }
    }
    out
}

/// `<path>:<line>:<column> - <trimmed line>` per hit, with optional
/// context lines and the containing declaration.
pub fn format_reference_list(results: &[ReferenceResult]) -> String {
    let mut out = String::new();
    for result in results {
        for line in &result.context_before {
            out.push_str(&format!("  | {line}\n"));
        }
        out.push_str(&format!(
            "{}:{}:{} - {}",
            result.file_path, result.line, result.column, result.code_snippet
        ));
        if let Some(containing) = &result.containing_symbol {
            out.push_str(&format!(" (in {containing})"));
        }
        out.push('\n');
        for line in &result.context_after {
            out.push_str(&format!("  | {line}\n"));
        }
    }
    out
}
