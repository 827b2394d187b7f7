//! Core checks on how trigonometric functions are written.

use super::reject_if;
use crate::core::ast::{Fix, Node};
use crate::core::error::FilterResult;
use crate::core::filter::AstFilter;
use crate::core::vocab::{is_trig, ARC_FUNCTIONS};

/// Rejects `arcsin` and friends; the CAS spells them `asin`.
#[derive(Debug, Clone, Default)]
pub struct NoArc;

fn is_arc(name: &str) -> bool {
    ARC_FUNCTIONS.contains(&name)
}

impl AstFilter for NoArc {
    fn name(&self) -> &'static str {
        "020_no_arc"
    }

    fn description(&self) -> &'static str {
        "Rejects arcsin-style names in favour of asin"
    }

    fn apply(&self, ast: Node) -> FilterResult<Node> {
        reject_if(
            ast,
            self.name(),
            "triginv",
            |node| {
                node.called_name()
                    .or_else(|| node.as_atom())
                    .map_or(false, is_arc)
            },
            |node| {
                let name = node.called_name().or_else(|| node.as_atom()).unwrap_or_default();
                format!(
                    "'{}' is not recognised, use '{}' instead",
                    name,
                    name.replacen("arc", "a", 1)
                )
            },
        )
    }
}

/// Rejects `sin^2(x)`, which parses as a call of `sin^2`.
#[derive(Debug, Clone, Default)]
pub struct NoTrigPower;

fn trig_power_base(node: &Node) -> Option<&str> {
    match node {
        Node::Call { name, .. } => match &**name {
            Node::Op { op, lhs, .. } if op == "^" => lhs.as_atom().filter(|n| is_trig(n)),
            _ => None,
        },
        _ => None,
    }
}

impl AstFilter for NoTrigPower {
    fn name(&self) -> &'static str {
        "025_no_trig_power"
    }

    fn description(&self) -> &'static str {
        "Rejects powers written on trig function names, such as sin^2(x)"
    }

    fn apply(&self, ast: Node) -> FilterResult<Node> {
        reject_if(
            ast,
            self.name(),
            "trigexp",
            |node| trig_power_base(node).is_some(),
            |node| {
                let name = trig_power_base(node).unwrap_or_default();
                format!("Put the power after the argument: write {}(x)^n, not {}^n(x)", name, name)
            },
        )
    }
}

/// Rejects `sin x`: a trig name followed by a space instead of brackets.
#[derive(Debug, Clone, Default)]
pub struct NoTrigSpace;

impl AstFilter for NoTrigSpace {
    fn name(&self) -> &'static str {
        "030_no_trig_space"
    }

    fn description(&self) -> &'static str {
        "Rejects a trig function separated from its argument by a space"
    }

    fn apply(&self, ast: Node) -> FilterResult<Node> {
        reject_if(
            ast,
            self.name(),
            "trigspace",
            |node| match node {
                Node::Op { lhs, fix: Some(Fix::Space), .. } => lhs.as_atom().map_or(false, is_trig),
                _ => false,
            },
            |node| format!("Function arguments need brackets: '{}' has a space instead", node),
        )
    }
}

/// Rejects a trig function name used without brackets, like `sinx` split to
/// `sin*x` or a bare `cos` in a product.
#[derive(Debug, Clone, Default)]
pub struct NoTrigBrackets;

impl AstFilter for NoTrigBrackets {
    fn name(&self) -> &'static str {
        "031_no_trig_brackets"
    }

    fn description(&self) -> &'static str {
        "Rejects trig function names that are not followed by bracketed arguments"
    }

    fn apply(&self, ast: Node) -> FilterResult<Node> {
        reject_if(
            ast,
            self.name(),
            "trigparens",
            |node| node.as_atom().map_or(false, is_trig),
            |node| format!("'{}' must be followed by its argument in brackets", node),
        )
    }
}
