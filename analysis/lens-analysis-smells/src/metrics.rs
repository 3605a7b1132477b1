//! Single-pass method-body metrics
//!
//! One traversal of a method body yields every bodily measurement the
//! smell checks need. A future metric should extend this record rather
//! than introduce a second walk.

use lens_semantic::{BodyNode, BodyNodeKind, MethodBody};

/// All metrics of one method body, computed in one traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodBodyMetrics {
    pub line_count: u32,
    pub max_nesting_depth: u32,
    pub cyclomatic_complexity: u32,
    pub is_single_delegation: bool,
}

/// Compute all four metrics for a body.
pub fn analyze_method_body(body: &MethodBody) -> MethodBodyMetrics {
    let mut max_depth = 0u32;
    let mut decisions = 0u32;
    walk(&body.root, 0, &mut max_depth, &mut decisions);
    MethodBodyMetrics {
        line_count: body.line_count(),
        max_nesting_depth: max_depth,
        cyclomatic_complexity: 1 + decisions,
        is_single_delegation: is_single_delegation(&body.root),
    }
}

fn is_nesting(kind: &BodyNodeKind) -> bool {
    matches!(
        kind,
        BodyNodeKind::If
            | BodyNodeKind::For
            | BodyNodeKind::Foreach
            | BodyNodeKind::While
            | BodyNodeKind::Do
            | BodyNodeKind::Switch
            | BodyNodeKind::Try
    )
}

fn is_decision(kind: &BodyNodeKind) -> bool {
    matches!(
        kind,
        BodyNodeKind::If
            | BodyNodeKind::CaseLabel
            | BodyNodeKind::PatternCaseLabel
            | BodyNodeKind::SwitchArm
            | BodyNodeKind::Conditional
            | BodyNodeKind::LogicalAnd
            | BodyNodeKind::LogicalOr
            | BodyNodeKind::Coalesce
            | BodyNodeKind::Catch
    )
}

fn walk(node: &BodyNode, depth: u32, max_depth: &mut u32, decisions: &mut u32) {
    let depth = if is_nesting(&node.kind) {
        let entered = depth + 1;
        if entered > *max_depth {
            *max_depth = entered;
        }
        entered
    } else {
        depth
    };
    if is_decision(&node.kind) {
        *decisions += 1;
    }
    for child in &node.children {
        walk(child, depth, max_depth, decisions);
    }
}

/// A body that is exactly one statement - an expression statement
/// wrapping an invocation, or a return of an invocation.
fn is_single_delegation(root: &BodyNode) -> bool {
    let statements: &[BodyNode] = if root.kind == BodyNodeKind::Block {
        &root.children
    } else {
        std::slice::from_ref(root)
    };
    if statements.len() != 1 {
        return false;
    }
    let statement = &statements[0];
    match statement.kind {
        BodyNodeKind::ExpressionStatement | BodyNodeKind::Return => {
            statement.children.len() == 1
                && matches!(statement.children[0].kind, BodyNodeKind::Invocation { .. })
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lens_semantic::TextSpan;

    fn body(root: BodyNode, lines: u32, expression_bodied: bool) -> MethodBody {
        MethodBody {
            span: TextSpan::new(0, 0),
            start_line: 0,
            end_line: lines.saturating_sub(1),
            expression_bodied,
            root,
        }
    }

    fn node(kind: BodyNodeKind, children: Vec<BodyNode>) -> BodyNode {
        BodyNode::with_children(kind, children)
    }

    #[test]
    fn straight_line_body_has_baseline_metrics() {
        let root = node(
            BodyNodeKind::Block,
            vec![
                BodyNode::new(BodyNodeKind::Other),
                BodyNode::new(BodyNodeKind::Other),
            ],
        );
        let metrics = analyze_method_body(&body(root, 4, false));
        assert_eq!(metrics.cyclomatic_complexity, 1);
        assert_eq!(metrics.max_nesting_depth, 0);
        assert_eq!(metrics.line_count, 4);
        assert!(!metrics.is_single_delegation);
    }

    #[test]
    fn nested_loops_and_branches_accumulate_depth() {
        // for { if { while { } } }
        let root = node(
            BodyNodeKind::Block,
            vec![node(
                BodyNodeKind::For,
                vec![node(
                    BodyNodeKind::If,
                    vec![node(BodyNodeKind::While, vec![])],
                )],
            )],
        );
        let metrics = analyze_method_body(&body(root, 8, false));
        assert_eq!(metrics.max_nesting_depth, 3);
        // if contributes the only decision
        assert_eq!(metrics.cyclomatic_complexity, 2);
    }

    #[test]
    fn expression_bodied_ternary_counts_one_line_two_complexity() {
        let root = node(
            BodyNodeKind::Block,
            vec![node(
                BodyNodeKind::Return,
                vec![node(BodyNodeKind::Conditional, vec![])],
            )],
        );
        let metrics = analyze_method_body(&body(root, 1, true));
        assert_eq!(metrics.line_count, 1);
        assert_eq!(metrics.cyclomatic_complexity, 2);
    }

    #[test]
    fn switch_labels_and_short_circuits_count() {
        let root = node(
            BodyNodeKind::Block,
            vec![
                node(
                    BodyNodeKind::Switch,
                    vec![
                        BodyNode::new(BodyNodeKind::CaseLabel),
                        BodyNode::new(BodyNodeKind::CaseLabel),
                        BodyNode::new(BodyNodeKind::PatternCaseLabel),
                    ],
                ),
                node(BodyNodeKind::LogicalAnd, vec![]),
                node(BodyNodeKind::Coalesce, vec![]),
            ],
        );
        let metrics = analyze_method_body(&body(root, 12, false));
        assert_eq!(metrics.cyclomatic_complexity, 1 + 3 + 2);
        assert_eq!(metrics.max_nesting_depth, 1);
    }

    #[test]
    fn try_catch_nests_and_catch_decides() {
        let root = node(
            BodyNodeKind::Block,
            vec![node(
                BodyNodeKind::Try,
                vec![node(BodyNodeKind::Catch, vec![])],
            )],
        );
        let metrics = analyze_method_body(&body(root, 6, false));
        assert_eq!(metrics.max_nesting_depth, 1);
        assert_eq!(metrics.cyclomatic_complexity, 2);
    }

    #[test]
    fn delegation_shapes() {
        let delegating = node(
            BodyNodeKind::Block,
            vec![node(
                BodyNodeKind::Return,
                vec![BodyNode::new(BodyNodeKind::Invocation {
                    target: Some("Inner".to_string()),
                })],
            )],
        );
        assert!(analyze_method_body(&body(delegating, 1, false)).is_single_delegation);

        let two_statements = node(
            BodyNodeKind::Block,
            vec![
                node(
                    BodyNodeKind::ExpressionStatement,
                    vec![BodyNode::new(BodyNodeKind::Invocation { target: None })],
                ),
                BodyNode::new(BodyNodeKind::Other),
            ],
        );
        assert!(!analyze_method_body(&body(two_statements, 2, false)).is_single_delegation);
    }
}
