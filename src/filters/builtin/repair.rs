//! Core repairs: rewrites that turn common notations into what the CAS expects.

use crate::core::ast::{Fix, Node};
use crate::core::error::FilterResult;
use crate::core::filter::AstFilter;

/// Turns calls of something that is not a name into multiplication.
///
/// `(x+1)(x-1)` parses as a call of the group `(x+1)`, and `f(x)(y)` as a call
/// of `f(x)`; both are products.
#[derive(Debug, Clone, Default)]
pub struct FixCallOfAGroupOrFunction;

impl AstFilter for FixCallOfAGroupOrFunction {
    fn name(&self) -> &'static str {
        "001_fix_call_of_a_group_or_function"
    }

    fn description(&self) -> &'static str {
        "Turns (a)(b) and f(a)(b) into multiplication"
    }

    fn apply(&self, ast: Node) -> FilterResult<Node> {
        Ok(ast.rewrite(&mut |node| match node {
            Node::Call { name, args }
                if matches!(*name, Node::Group(_) | Node::Call { .. }) =>
            {
                Node::fixed_mul(*name, Node::group(args), Fix::Star)
            }
            other => other,
        }))
    }
}

/// Rewrites `log_b(x)` and `log10(x)` into the two argument `lg(x, b)`.
#[derive(Debug, Clone, Default)]
pub struct LogCandy;

impl LogCandy {
    fn base_of(name: &str) -> Option<&str> {
        if name == "log10" {
            return Some("10");
        }
        name.strip_prefix("log_").filter(|base| !base.is_empty())
    }
}

impl AstFilter for LogCandy {
    fn name(&self) -> &'static str {
        "002_log_candy"
    }

    fn description(&self) -> &'static str {
        "Converts log_b(x) and log10(x) into lg(x,b)"
    }

    fn apply(&self, ast: Node) -> FilterResult<Node> {
        Ok(ast.rewrite(&mut |node| {
            let base = node.called_name().and_then(LogCandy::base_of).map(Node::atom_or_integer);
            match (node, base) {
                (Node::Call { mut args, .. }, Some(base)) => {
                    args.push(base);
                    Node::function("lg", args)
                }
                (other, _) => other,
            }
        }))
    }
}

/// `i(x)` is the imaginary unit times `x`, never a call.
#[derive(Debug, Clone, Default)]
pub struct IIsNeverAFunction;

impl AstFilter for IIsNeverAFunction {
    fn name(&self) -> &'static str {
        "005_i_is_never_a_function"
    }

    fn description(&self) -> &'static str {
        "Treats i(x) as i*(x)"
    }

    fn apply(&self, ast: Node) -> FilterResult<Node> {
        Ok(ast.rewrite(&mut |node| match node {
            Node::Call { name, args } if name.as_atom() == Some("i") => {
                Node::fixed_mul(*name, Node::group(args), Fix::Star)
            }
            other => other,
        }))
    }
}
