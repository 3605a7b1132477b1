//! Feature envy: semantic member-access grouping (deep analysis)

use crate::config::FEATURE_ENVY_MIN_ACCESSES;
use crate::{ordinary_methods, symbol_location};
use lens_analysis_common::{Smell, SmellSeverity};
use lens_semantic::{BodyNode, BodyNodeKind, Symbol, SymbolId};
use lens_workspace::SolutionHandle;
use std::collections::HashMap;

pub(crate) fn check_type(handle: &SolutionHandle, ty: &Symbol, smells: &mut Vec<Smell>) {
    for method in ordinary_methods(handle, ty) {
        let Some(body) = &method.body else {
            continue;
        };

        let mut accesses: HashMap<SymbolId, usize> = HashMap::new();
        collect_accesses(&body.root, &mut accesses);

        let own_type = method.containing_type;
        let own_count = own_type.and_then(|id| accesses.get(&id)).copied().unwrap_or(0);
        let most_envied = accesses
            .iter()
            .filter(|(id, _)| Some(**id) != own_type)
            .max_by_key(|(_, count)| **count);

        if let Some((&envied, &count)) = most_envied {
            if count > own_count && count >= FEATURE_ENVY_MIN_ACCESSES {
                let envied_name = handle
                    .solution
                    .try_symbol(envied)
                    .map(|s| s.name.clone())
                    .unwrap_or_else(|| "another type".to_string());
                let (file_path, line) = symbol_location(handle, method);
                smells.push(Smell {
                    severity: SmellSeverity::Warning,
                    name: "Feature envy",
                    threshold: "more foreign accesses than own, >= 3",
                    symbol: method.display.clone(),
                    detail: format!(
                        "accesses {envied_name} {count} times, own type {own_count}"
                    ),
                    file_path,
                    line,
                });
            }
        }
    }
}

fn collect_accesses(node: &BodyNode, accesses: &mut HashMap<SymbolId, usize>) {
    if let BodyNodeKind::MemberAccess { owner: Some(owner) } = &node.kind {
        *accesses.entry(*owner).or_insert(0) += 1;
    }
    for child in &node.children {
        collect_accesses(child, accesses);
    }
}
