//! Test support: fixture semantic snapshots
//!
//! Tests describe a solution once - projects, documents, symbols anchored
//! to patterns in the document text, and a reference index - and install
//! it on a `SnapshotProvider`. The resulting factory re-reads document
//! text from disk on every load, re-resolving symbol names and reference
//! spans, so staleness and rename round-trips behave like a real exporter
//! re-running.

pub mod builder;

pub use builder::{Anchor, SolutionBuilder, SolutionFixture, SymbolBuilder, SymbolKey};

use lens_semantic::{BodyNode, BodyNodeKind, MethodBody, SymbolId, TextSpan};

/// Shorthand body node constructors for analyzer tests.
pub mod nodes {
    use super::*;

    pub fn block(children: Vec<BodyNode>) -> BodyNode {
        BodyNode::with_children(BodyNodeKind::Block, children)
    }

    pub fn if_(children: Vec<BodyNode>) -> BodyNode {
        BodyNode::with_children(BodyNodeKind::If, children)
    }

    pub fn for_(children: Vec<BodyNode>) -> BodyNode {
        BodyNode::with_children(BodyNodeKind::For, children)
    }

    pub fn while_(children: Vec<BodyNode>) -> BodyNode {
        BodyNode::with_children(BodyNodeKind::While, children)
    }

    pub fn try_(children: Vec<BodyNode>) -> BodyNode {
        BodyNode::with_children(BodyNodeKind::Try, children)
    }

    pub fn catch(children: Vec<BodyNode>) -> BodyNode {
        BodyNode::with_children(BodyNodeKind::Catch, children)
    }

    pub fn conditional(children: Vec<BodyNode>) -> BodyNode {
        BodyNode::with_children(BodyNodeKind::Conditional, children)
    }

    pub fn and(children: Vec<BodyNode>) -> BodyNode {
        BodyNode::with_children(BodyNodeKind::LogicalAnd, children)
    }

    pub fn other() -> BodyNode {
        BodyNode::new(BodyNodeKind::Other)
    }

    /// `Target(...)` as an expression statement
    pub fn stmt_invoke(target: &str) -> BodyNode {
        BodyNode::with_children(
            BodyNodeKind::ExpressionStatement,
            vec![BodyNode::new(BodyNodeKind::Invocation {
                target: Some(target.to_string()),
            })],
        )
    }

    /// `return Target(...);`
    pub fn ret_invoke(target: &str) -> BodyNode {
        BodyNode::with_children(
            BodyNodeKind::Return,
            vec![BodyNode::new(BodyNodeKind::Invocation {
                target: Some(target.to_string()),
            })],
        )
    }

    /// A member access resolved to its owner type
    pub fn member_access(owner: SymbolId) -> BodyNode {
        BodyNode::new(BodyNodeKind::MemberAccess { owner: Some(owner) })
    }
}

/// A plain block body spanning `lines` source lines.
pub fn body_lines(lines: u32, root: BodyNode) -> MethodBody {
    MethodBody {
        span: TextSpan::new(0, 0),
        start_line: 0,
        end_line: lines.saturating_sub(1),
        expression_bodied: false,
        root,
    }
}

/// An expression body (`=> expr;`), always one line.
pub fn expression_body(root: BodyNode) -> MethodBody {
    MethodBody {
        span: TextSpan::new(0, 0),
        start_line: 0,
        end_line: 0,
        expression_bodied: true,
        root,
    }
}
