//! Checks that reject syntax the CAS would misread or that a question forbids.

use super::reject_if;
use crate::core::ast::Node;
use crate::core::error::FilterResult;
use crate::core::filter::AstFilter;
use crate::core::vocab::{INEQUALITIES, LOGIC_OPERATORS};

/// Rejects the `..` operator, almost always a typo for `.` or `*`.
#[derive(Debug, Clone, Default)]
pub struct NoDotDot;

impl AstFilter for NoDotDot {
    fn name(&self) -> &'static str {
        "003_no_dot_dot"
    }

    fn description(&self) -> &'static str {
        "Rejects the '..' operator"
    }

    fn apply(&self, ast: Node) -> FilterResult<Node> {
        reject_if(
            ast,
            self.name(),
            "dotdot",
            |node| node.binary_op() == Some(".."),
            |node| format!("'..' is not a valid operator in '{}'", node),
        )
    }
}

/// Rejects `a < x < b`; inequalities must be joined with `and`.
#[derive(Debug, Clone, Default)]
pub struct NoChainedInequalities;

fn is_inequality(node: &Node) -> bool {
    node.binary_op().map_or(false, |op| INEQUALITIES.contains(&op))
}

impl AstFilter for NoChainedInequalities {
    fn name(&self) -> &'static str {
        "050_no_chained_inequalities"
    }

    fn description(&self) -> &'static str {
        "Rejects chained inequalities such as a<x<b"
    }

    fn apply(&self, ast: Node) -> FilterResult<Node> {
        reject_if(
            ast,
            self.name(),
            "chained_inequalities",
            |node| match node {
                Node::Op { lhs, rhs, .. } if is_inequality(node) => {
                    is_inequality(lhs) || is_inequality(rhs)
                }
                _ => false,
            },
            |node| {
                format!(
                    "'{}' chains inequalities; write each one separately and join them with 'and'",
                    node
                )
            },
        )
    }
}

/// Rejects floating point literals.
#[derive(Debug, Clone, Default)]
pub struct NoFloats;

impl AstFilter for NoFloats {
    fn name(&self) -> &'static str {
        "101_no_floats"
    }

    fn description(&self) -> &'static str {
        "Rejects floating point numbers"
    }

    fn apply(&self, ast: Node) -> FilterResult<Node> {
        reject_if(
            ast,
            self.name(),
            "Illegal_floats",
            |node| matches!(node, Node::Float(_)),
            |node| format!("Floating point numbers such as {} are not allowed here", node),
        )
    }
}

/// Rejects string literals.
#[derive(Debug, Clone, Default)]
pub struct NoStrings;

impl AstFilter for NoStrings {
    fn name(&self) -> &'static str {
        "102_no_strings"
    }

    fn description(&self) -> &'static str {
        "Rejects string literals"
    }

    fn apply(&self, ast: Node) -> FilterResult<Node> {
        reject_if(
            ast,
            self.name(),
            "Illegal_strings",
            |node| matches!(node, Node::Str(_)),
            |node| format!("Strings such as {} are not allowed here", node),
        )
    }
}

/// Rejects `x = (a or b)`: equations cannot take a logical expression as a side.
#[derive(Debug, Clone, Default)]
pub struct NoEqualityWithLogic;

fn is_logic(node: &Node) -> bool {
    match node {
        Node::Op { op, .. } => LOGIC_OPERATORS.contains(&op.as_str()),
        Node::Prefix { op, .. } => op == "not",
        Node::Group(items) if items.len() == 1 => is_logic(&items[0]),
        _ => false,
    }
}

impl AstFilter for NoEqualityWithLogic {
    fn name(&self) -> &'static str {
        "520_no_equality_with_logic"
    }

    fn description(&self) -> &'static str {
        "Rejects equations whose sides are logical expressions"
    }

    fn apply(&self, ast: Node) -> FilterResult<Node> {
        reject_if(
            ast,
            self.name(),
            "Bad_assignment",
            |node| match node {
                Node::Op { op, lhs, rhs, .. } if op == "=" => is_logic(lhs) || is_logic(rhs),
                _ => false,
            },
            |node| format!("'{}' mixes an equation with logic; use 'x=a or x=b'", node),
        )
    }
}
