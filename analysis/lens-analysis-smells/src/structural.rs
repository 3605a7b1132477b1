//! Structural checks over the symbol graph (no syntax walk)

use crate::config::{
    SmellConfig, DATA_CLASS_MIN_PROPERTIES, DEEP_INHERITANCE_DEPTH, GOD_CLASS_DEPENDENCIES,
    GOD_CLASS_MEMBERS, LARGE_CLASS_CRITICAL, LARGE_CLASS_WARNING, LONG_PARAMS_CRITICAL,
    LONG_PARAMS_WARNING, MANY_DEPENDENCIES_CRITICAL, MANY_DEPENDENCIES_WARNING, PRIMITIVE_TYPES,
    REFUSED_BEQUEST_MIN_VIRTUALS, REFUSED_BEQUEST_RATIO,
};
use crate::symbol_location;
use lens_analysis_common::{Smell, SmellSeverity};
use lens_semantic::{MethodKind, Symbol, SymbolKind};
use lens_workspace::SolutionHandle;
use std::collections::HashSet;

pub(crate) fn check_type(
    handle: &SolutionHandle,
    ty: &Symbol,
    config: &SmellConfig,
    smells: &mut Vec<Smell>,
) {
    let solution = &handle.solution;
    let members: Vec<&Symbol> = ty
        .members
        .iter()
        .filter_map(|&id| solution.try_symbol(id))
        .filter(|m| !m.is_compiler_generated())
        .filter(|m| !m.kind.is_type())
        .collect();
    let (file_path, line) = symbol_location(handle, ty);

    if config.category.includes_complexity() {
        long_parameter_lists(handle, &members, smells);
    }

    if config.category.includes_design() {
        large_class(ty, &members, &file_path, line, smells);
        god_class(ty, &members, &file_path, line, smells);
        data_class(ty, &members, &file_path, line, smells);
        too_many_dependencies(ty, &members, &file_path, line, smells);
        speculative_generality(handle, ty, &members, &file_path, line, smells);
    }

    if config.category.includes_inheritance() {
        deep_inheritance(handle, ty, &file_path, line, smells);
        refused_bequest(handle, ty, &file_path, line, smells);
    }
}

fn long_parameter_lists(handle: &SolutionHandle, members: &[&Symbol], smells: &mut Vec<Smell>) {
    for member in members {
        if member.kind != SymbolKind::Method {
            continue;
        }
        let kind = member.method_kind.unwrap_or_default();
        if !matches!(kind, MethodKind::Ordinary | MethodKind::Constructor) {
            continue;
        }
        let count = member
            .signature
            .as_ref()
            .map(|s| s.parameters.len())
            .unwrap_or(0);
        if count > LONG_PARAMS_WARNING {
            let (file_path, line) = symbol_location(handle, member);
            smells.push(Smell {
                severity: if count > LONG_PARAMS_CRITICAL {
                    SmellSeverity::Critical
                } else {
                    SmellSeverity::Warning
                },
                name: "Long parameter list",
                threshold: "warning > 5 parameters, critical > 8",
                symbol: member.display.clone(),
                detail: format!("{count} parameters"),
                file_path,
                line,
            });
        }
    }
}

fn large_class(
    ty: &Symbol,
    members: &[&Symbol],
    file_path: &str,
    line: u32,
    smells: &mut Vec<Smell>,
) {
    let count = members.len();
    if count > LARGE_CLASS_WARNING {
        smells.push(Smell {
            severity: if count > LARGE_CLASS_CRITICAL {
                SmellSeverity::Critical
            } else {
                SmellSeverity::Warning
            },
            name: "Large class",
            threshold: "warning > 20 members, critical > 40",
            symbol: ty.display.clone(),
            detail: format!("{count} members"),
            file_path: file_path.to_string(),
            line,
        });
    }
}

/// Base identifier of a type string: strips generic arguments, array
/// ranks and nullability markers.
fn base_type_name(ty: &str) -> String {
    let stripped = ty.split('<').next().unwrap_or(ty);
    stripped.trim_end_matches(['[', ']', '?', ' ']).to_string()
}

fn distinct_dependencies(ty: &Symbol, members: &[&Symbol]) -> HashSet<String> {
    members
        .iter()
        .filter(|m| matches!(m.kind, SymbolKind::Field | SymbolKind::Property))
        .filter_map(|m| m.signature.as_ref())
        .map(|s| base_type_name(&s.return_type))
        .filter(|name| !name.is_empty())
        .filter(|name| !PRIMITIVE_TYPES.contains(&name.as_str()))
        .filter(|name| name != &ty.name)
        .collect()
}

fn god_class(
    ty: &Symbol,
    members: &[&Symbol],
    file_path: &str,
    line: u32,
    smells: &mut Vec<Smell>,
) {
    let dependencies = distinct_dependencies(ty, members);
    if members.len() > GOD_CLASS_MEMBERS && dependencies.len() >= GOD_CLASS_DEPENDENCIES {
        smells.push(Smell {
            severity: SmellSeverity::Critical,
            name: "God class",
            threshold: "> 20 members and >= 5 non-primitive dependencies",
            symbol: ty.display.clone(),
            detail: format!(
                "{} members, {} distinct dependencies",
                members.len(),
                dependencies.len()
            ),
            file_path: file_path.to_string(),
            line,
        });
    }
}

fn data_class(
    ty: &Symbol,
    members: &[&Symbol],
    file_path: &str,
    line: u32,
    smells: &mut Vec<Smell>,
) {
    if ty.is_record {
        return;
    }
    let methods = members
        .iter()
        .filter(|m| m.kind == SymbolKind::Method && m.is_ordinary_method())
        .count();
    let properties = members
        .iter()
        .filter(|m| m.kind == SymbolKind::Property)
        .count();
    if methods == 0 && properties >= DATA_CLASS_MIN_PROPERTIES {
        smells.push(Smell {
            severity: SmellSeverity::Info,
            name: "Data class",
            threshold: "no methods and >= 2 properties",
            symbol: ty.display.clone(),
            detail: format!("{properties} properties, no behavior"),
            file_path: file_path.to_string(),
            line,
        });
    }
}

fn too_many_dependencies(
    ty: &Symbol,
    members: &[&Symbol],
    file_path: &str,
    line: u32,
    smells: &mut Vec<Smell>,
) {
    let max_ctor_params = members
        .iter()
        .filter(|m| {
            m.kind == SymbolKind::Method
                && matches!(m.method_kind.unwrap_or_default(), MethodKind::Constructor)
        })
        .map(|m| {
            m.signature
                .as_ref()
                .map(|s| s.parameters.len())
                .unwrap_or(0)
        })
        .max()
        .unwrap_or(0);
    if max_ctor_params > MANY_DEPENDENCIES_WARNING {
        smells.push(Smell {
            severity: if max_ctor_params > MANY_DEPENDENCIES_CRITICAL {
                SmellSeverity::Critical
            } else {
                SmellSeverity::Warning
            },
            name: "Too many dependencies",
            threshold: "constructor parameters > 5, critical > 8",
            symbol: ty.display.clone(),
            detail: format!("{max_ctor_params} constructor parameters"),
            file_path: file_path.to_string(),
            line,
        });
    }
}

fn deep_inheritance(
    handle: &SolutionHandle,
    ty: &Symbol,
    file_path: &str,
    line: u32,
    smells: &mut Vec<Smell>,
) {
    let solution = &handle.solution;
    let mut depth = 0usize;
    let mut current = ty.base_type;
    let mut visited = HashSet::new();
    while let Some(id) = current {
        if !visited.insert(id) {
            break;
        }
        let Some(base) = solution.try_symbol(id) else {
            break;
        };
        if base.display == "object" || base.display == "System.Object" {
            break;
        }
        depth += 1;
        current = base.base_type;
    }
    if depth > DEEP_INHERITANCE_DEPTH {
        smells.push(Smell {
            severity: SmellSeverity::Warning,
            name: "Deep inheritance",
            threshold: "chain depth > 3",
            symbol: ty.display.clone(),
            detail: format!("inheritance depth {depth}"),
            file_path: file_path.to_string(),
            line,
        });
    }
}

/// A subclass (or interface implementor) that overrides almost none of
/// the members its base exposes for overriding.
fn refused_bequest(
    handle: &SolutionHandle,
    ty: &Symbol,
    file_path: &str,
    line: u32,
    smells: &mut Vec<Smell>,
) {
    let solution = &handle.solution;
    let mut bequeathers: Vec<&Symbol> = Vec::new();
    if let Some(base) = ty.base_type.and_then(|id| solution.try_symbol(id)) {
        if base.display != "object" && base.display != "System.Object" {
            bequeathers.push(base);
        }
    }
    bequeathers.extend(ty.interfaces.iter().filter_map(|&id| solution.try_symbol(id)));

    let own_members: Vec<&Symbol> = ty
        .members
        .iter()
        .filter_map(|&id| solution.try_symbol(id))
        .collect();

    for base in bequeathers {
        let overridable: Vec<&Symbol> = base
            .members
            .iter()
            .filter_map(|&id| solution.try_symbol(id))
            .filter(|m| {
                base.kind == SymbolKind::Interface
                    || m.modifiers.is_virtual
                    || m.modifiers.is_abstract
            })
            .collect();
        if overridable.len() < REFUSED_BEQUEST_MIN_VIRTUALS {
            continue;
        }
        let overridden = overridable
            .iter()
            .filter(|base_member| {
                own_members.iter().any(|own| {
                    own.name == base_member.name
                        && (base.kind == SymbolKind::Interface || own.modifiers.is_override)
                })
            })
            .count();
        let ratio = overridden as f64 / overridable.len() as f64;
        if ratio < REFUSED_BEQUEST_RATIO {
            smells.push(Smell {
                severity: SmellSeverity::Warning,
                name: "Refused bequest",
                threshold: ">= 3 overridable base members, < 20% overridden",
                symbol: ty.display.clone(),
                detail: format!(
                    "overrides {overridden}/{} base members ({}%)",
                    overridable.len(),
                    (ratio * 100.0).round() as u32
                ),
                file_path: file_path.to_string(),
                line,
            });
        }
    }
}

/// Is `ident` used as a word anywhere in the type text? Generic argument
/// lists and array element types are covered because the scan is
/// token-wise over the whole string.
fn type_text_uses(ty_text: &str, ident: &str) -> bool {
    let bytes = ty_text.as_bytes();
    let mut from = 0usize;
    while let Some(pos) = ty_text[from..].find(ident).map(|p| p + from) {
        from = pos + 1;
        let left_ok = pos == 0
            || !(bytes[pos - 1].is_ascii_alphanumeric() || bytes[pos - 1] == b'_');
        let end = pos + ident.len();
        let right_ok =
            end >= bytes.len() || !(bytes[end].is_ascii_alphanumeric() || bytes[end] == b'_');
        if left_ok && right_ok {
            return true;
        }
    }
    false
}

fn signature_uses(member: &Symbol, ident: &str) -> bool {
    let Some(signature) = &member.signature else {
        return false;
    };
    if type_text_uses(&signature.return_type, ident) {
        return true;
    }
    signature
        .parameters
        .iter()
        .any(|p| type_text_uses(&p.ty, ident))
}

fn speculative_generality(
    handle: &SolutionHandle,
    ty: &Symbol,
    members: &[&Symbol],
    file_path: &str,
    line: u32,
    smells: &mut Vec<Smell>,
) {
    for param in &ty.type_parameters {
        let used = members.iter().any(|m| signature_uses(m, param));
        if !used {
            smells.push(Smell {
                severity: SmellSeverity::Warning,
                name: "Speculative generality",
                threshold: "type parameter unused in any member signature",
                symbol: ty.display.clone(),
                detail: format!("type parameter '{param}' is never used"),
                file_path: file_path.to_string(),
                line,
            });
        }
    }
    for member in members {
        if member.kind != SymbolKind::Method {
            continue;
        }
        for param in &member.type_parameters {
            if !signature_uses(member, param) {
                let (member_path, member_line) = symbol_location(handle, member);
                smells.push(Smell {
                    severity: SmellSeverity::Warning,
                    name: "Speculative generality",
                    threshold: "type parameter unused in any member signature",
                    symbol: member.display.clone(),
                    detail: format!("type parameter '{param}' is never used"),
                    file_path: member_path,
                    line: member_line,
                });
            }
        }
    }
}
