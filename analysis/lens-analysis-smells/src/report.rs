//! Plain-text smell report
//!
//! Grouped by severity, then by smell name with the threshold text in the
//! group header, then one `symbol (detail) [path:line]` line per finding.
//! Ordering is fully deterministic: identical inputs render identically.

use lens_analysis_common::{Smell, SmellSeverity};
use std::collections::BTreeMap;

pub fn render(smells: &[Smell]) -> String {
    if smells.is_empty() {
        return "No code smells found.\n".to_string();
    }

    let critical = count(smells, SmellSeverity::Critical);
    let warning = count(smells, SmellSeverity::Warning);
    let info = count(smells, SmellSeverity::Info);

    let mut out = format!(
        "Code smells: {} found ({critical} critical, {warning} warning, {info} info)\n",
        smells.len()
    );

    for severity in [
        SmellSeverity::Critical,
        SmellSeverity::Warning,
        SmellSeverity::Info,
    ] {
        let mut by_name: BTreeMap<&str, Vec<&Smell>> = BTreeMap::new();
        for smell in smells.iter().filter(|s| s.severity == severity) {
            by_name.entry(smell.name).or_default().push(smell);
        }
        if by_name.is_empty() {
            continue;
        }

        out.push_str(&format!("\n=== {} ===\n", severity.display()));
        for (name, mut group) in by_name {
            group.sort_by(|a, b| {
                a.symbol
                    .cmp(&b.symbol)
                    .then(a.file_path.cmp(&b.file_path))
                    .then(a.line.cmp(&b.line))
            });
            out.push_str(&format!("\n{name} ({}):\n", group[0].threshold));
            for smell in group {
                out.push_str(&format!(
                    "  {} ({}) [{}:{}]\n",
                    smell.symbol, smell.detail, smell.file_path, smell.line
                ));
            }
        }
    }
    out
}

fn count(smells: &[Smell], severity: SmellSeverity) -> usize {
    smells.iter().filter(|s| s.severity == severity).count()
}
