//! Neutral method-body syntax consumed by the smell analyzer
//!
//! Exporters project the statement/expression structure of each method body
//! into this small node vocabulary: the nesting-introducing statements, the
//! decision points that feed cyclomatic complexity, invocations for
//! delegation detection, and member accesses (with the accessed member's
//! containing type) for feature-envy grouping. Everything else collapses
//! into `Other`.

use crate::model::{SymbolId, TextSpan};
use serde::{Deserialize, Serialize};

/// One node of a projected method body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyNode {
    pub kind: BodyNodeKind,
    #[serde(default)]
    pub children: Vec<BodyNode>,
}

impl BodyNode {
    pub fn new(kind: BodyNodeKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
        }
    }

    pub fn with_children(kind: BodyNodeKind, children: Vec<BodyNode>) -> Self {
        Self { kind, children }
    }
}

/// Node classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "camelCase")]
pub enum BodyNodeKind {
    Block,
    If,
    For,
    Foreach,
    While,
    Do,
    Switch,
    Try,
    Catch,
    /// Ordinary `case`/`default` label of a switch statement
    CaseLabel,
    /// Pattern label of a switch statement
    PatternCaseLabel,
    /// One arm of a switch expression
    SwitchArm,
    /// Ternary conditional expression
    Conditional,
    LogicalAnd,
    LogicalOr,
    Coalesce,
    Return,
    ExpressionStatement,
    Invocation {
        /// Callee name when the exporter resolved it
        target: Option<String>,
    },
    MemberAccess {
        /// Containing type of the accessed member
        owner: Option<SymbolId>,
    },
    Other,
}

/// The body of one method, with its source extent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodBody {
    /// Extent of the body in the declaring document
    pub span: TextSpan,
    /// 0-based first line of the body
    pub start_line: u32,
    /// 0-based last line of the body, inclusive
    pub end_line: u32,
    /// `=> expr;` bodies count as a single line
    #[serde(default)]
    pub expression_bodied: bool,
    pub root: BodyNode,
}

impl MethodBody {
    /// Number of source lines covered by the body's span.
    pub fn line_count(&self) -> u32 {
        if self.expression_bodied {
            1
        } else {
            self.end_line.saturating_sub(self.start_line) + 1
        }
    }
}
