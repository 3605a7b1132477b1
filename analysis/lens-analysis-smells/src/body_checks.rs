//! Smells fed by the single-pass body metrics

use crate::config::{
    SmellConfig, COMPLEXITY_CRITICAL, COMPLEXITY_WARNING, DEEP_NESTING_CRITICAL,
    DEEP_NESTING_WARNING, LONG_METHOD_CRITICAL, LONG_METHOD_WARNING, MIDDLE_MAN_MIN_METHODS,
    MIDDLE_MAN_RATIO,
};
use crate::metrics::analyze_method_body;
use crate::{ordinary_methods, symbol_location};
use lens_analysis_common::{Smell, SmellSeverity};
use lens_semantic::Symbol;
use lens_workspace::SolutionHandle;

pub(crate) fn check_type(
    handle: &SolutionHandle,
    ty: &Symbol,
    config: &SmellConfig,
    smells: &mut Vec<Smell>,
) {
    let methods = ordinary_methods(handle, ty);
    let mut with_bodies = 0usize;
    let mut delegating = 0usize;

    for method in &methods {
        let Some(body) = &method.body else {
            continue;
        };
        with_bodies += 1;
        let metrics = analyze_method_body(body);
        if metrics.is_single_delegation {
            delegating += 1;
        }
        if !config.category.includes_complexity() {
            continue;
        }
        let (file_path, line) = symbol_location(handle, method);

        if metrics.line_count > LONG_METHOD_WARNING {
            smells.push(Smell {
                severity: if metrics.line_count > LONG_METHOD_CRITICAL {
                    SmellSeverity::Critical
                } else {
                    SmellSeverity::Warning
                },
                name: "Long method",
                threshold: "warning > 50 lines, critical > 100",
                symbol: method.display.clone(),
                detail: format!("{} lines", metrics.line_count),
                file_path: file_path.clone(),
                line,
            });
        }
        if metrics.max_nesting_depth > DEEP_NESTING_WARNING {
            smells.push(Smell {
                severity: if metrics.max_nesting_depth > DEEP_NESTING_CRITICAL {
                    SmellSeverity::Critical
                } else {
                    SmellSeverity::Warning
                },
                name: "Deep nesting",
                threshold: "warning > 3 levels, critical > 5",
                symbol: method.display.clone(),
                detail: format!("nesting depth {}", metrics.max_nesting_depth),
                file_path: file_path.clone(),
                line,
            });
        }
        if metrics.cyclomatic_complexity > COMPLEXITY_WARNING {
            smells.push(Smell {
                severity: if metrics.cyclomatic_complexity > COMPLEXITY_CRITICAL {
                    SmellSeverity::Critical
                } else {
                    SmellSeverity::Warning
                },
                name: "High cyclomatic complexity",
                threshold: "warning > 10, critical > 20",
                symbol: method.display.clone(),
                detail: format!("complexity {}", metrics.cyclomatic_complexity),
                file_path,
                line,
            });
        }
    }

    // Middle man: almost every method just forwards somewhere else
    if config.category.includes_design()
        && with_bodies >= MIDDLE_MAN_MIN_METHODS
        && (delegating as f64) / (with_bodies as f64) > MIDDLE_MAN_RATIO
    {
        let (file_path, line) = symbol_location(handle, ty);
        smells.push(Smell {
            severity: SmellSeverity::Warning,
            name: "Middle man",
            threshold: ">= 3 methods and > 80% single-delegation",
            symbol: ty.display.clone(),
            detail: format!("{delegating} of {with_bodies} methods delegate"),
            file_path,
            line,
        });
    }
}
