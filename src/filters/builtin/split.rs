//! Optional rewrites that split names and literals into products.
//!
//! Every split inserts `*` marked [`Fix::Star`], so later strictness filters
//! can still tell which multiplications the learner did not type.

use crate::core::ast::{Fix, Node};
use crate::core::error::FilterResult;
use crate::core::filter::{AstFilter, ExclusionAware};
use crate::core::vocab::{is_known_function, is_reserved_name, known_functions_longest_first};
use std::collections::HashSet;

/// `name(args)` as the product `name*(args)`.
fn split_call(name: Node, args: Vec<Node>) -> Node {
    Node::fixed_mul(name, Node::group(args), Fix::Star)
}

/// Splits an unknown prefix off a known function: `xsin(t)` becomes `x*sin(t)`.
#[derive(Debug, Clone, Default)]
pub struct SplitPrefixFromCommonFunctionName;

fn split_known_suffix(name: &str) -> Option<(&str, &'static str)> {
    if is_known_function(name) {
        return None;
    }
    known_functions_longest_first().iter().find_map(|&function| {
        name.strip_suffix(function)
            .filter(|prefix| !prefix.is_empty())
            .map(|prefix| (prefix, function))
    })
}

impl AstFilter for SplitPrefixFromCommonFunctionName {
    fn name(&self) -> &'static str {
        "402_split_prefix_from_common_function_name"
    }

    fn description(&self) -> &'static str {
        "Splits xsin(t) into x*sin(t)"
    }

    fn apply(&self, ast: Node) -> FilterResult<Node> {
        Ok(ast.rewrite(&mut |node| {
            let split = node
                .called_name()
                .and_then(split_known_suffix)
                .map(|(prefix, function)| (Node::atom_or_integer(prefix), function));
            match (node, split) {
                (Node::Call { args, .. }, Some((prefix, function))) => {
                    Node::fixed_mul(prefix, Node::function(function, args), Fix::Star)
                }
                (other, _) => other,
            }
        }))
    }
}

/// Splits a leading number off a name: `2x` becomes `2*x`.
#[derive(Debug, Clone, Default)]
pub struct SplitAtNumberLetterBoundary;

fn leading_number(name: &str) -> Option<(&str, &str)> {
    let end = name.find(|c: char| !c.is_ascii_digit())?;
    if end == 0 {
        return None;
    }
    Some(name.split_at(end))
}

impl AstFilter for SplitAtNumberLetterBoundary {
    fn name(&self) -> &'static str {
        "403_split_at_number_letter_boundary"
    }

    fn description(&self) -> &'static str {
        "Splits 2x into 2*x"
    }

    fn apply(&self, ast: Node) -> FilterResult<Node> {
        Ok(ast.rewrite(&mut |node| {
            let split = match &node {
                Node::Atom(name) => leading_number(name),
                Node::Call { name, .. } => name.as_atom().and_then(leading_number),
                _ => None,
            }
            .map(|(number, rest)| (number.to_string(), rest.to_string()));

            match (node, split) {
                (Node::Call { args, .. }, Some((number, rest))) => {
                    Node::fixed_mul(Node::int(number), Node::function(rest, args), Fix::Star)
                }
                (Node::Atom(_), Some((number, rest))) => {
                    Node::fixed_mul(Node::int(number), Node::atom(rest), Fix::Star)
                }
                (other, _) => other,
            }
        }))
    }
}

/// Splits a name made of two other names in the same expression: with `x`
/// and `y` present, `xy` becomes `x*y`.
#[derive(Debug, Clone, Default)]
pub struct SplitImpliedVariableNames;

impl AstFilter for SplitImpliedVariableNames {
    fn name(&self) -> &'static str {
        "406_split_implied_variable_names"
    }

    fn description(&self) -> &'static str {
        "Splits xy into x*y when x and y are used elsewhere in the expression"
    }

    fn apply(&self, ast: Node) -> FilterResult<Node> {
        let mut names = HashSet::new();
        ast.walk(&mut |node| {
            if let Some(name) = node.as_atom() {
                names.insert(name.to_string());
            }
        });

        Ok(ast.rewrite(&mut |node| {
            let split = node
                .as_atom()
                .filter(|name| !is_reserved_name(name))
                .and_then(|name| {
                    name.char_indices().skip(1).find_map(|(i, _)| {
                        let (left, right) = name.split_at(i);
                        (names.contains(left) && names.contains(right))
                            .then(|| (left.to_string(), right.to_string()))
                    })
                });
            match split {
                Some((left, right)) => Node::fixed_mul(Node::atom(left), Node::atom(right), Fix::Star),
                None => node,
            }
        }))
    }

    fn as_exclusion(&self) -> Option<&dyn ExclusionAware> {
        Some(self)
    }
}

impl ExclusionAware for SplitImpliedVariableNames {
    fn conflicts_with(&self, other: &str) -> bool {
        other == "410_single_char_vars"
    }
}

/// Treats every multi-letter name as a product of single letters: `xy`
/// becomes `x*y`. Digits and subscripts stay with the letter before them.
#[derive(Debug, Clone, Default)]
pub struct SingleCharVars;

fn single_letter_parts(name: &str) -> Vec<&str> {
    let mut starts: Vec<usize> = name
        .char_indices()
        .filter(|(_, c)| c.is_alphabetic())
        .map(|(i, _)| i)
        .collect();
    if starts.first() != Some(&0) {
        starts.insert(0, 0);
    }
    starts.push(name.len());
    starts.windows(2).map(|w| &name[w[0]..w[1]]).collect()
}

impl AstFilter for SingleCharVars {
    fn name(&self) -> &'static str {
        "410_single_char_vars"
    }

    fn description(&self) -> &'static str {
        "Splits multi-letter variable names into single letters"
    }

    fn apply(&self, ast: Node) -> FilterResult<Node> {
        Ok(ast.rewrite(&mut |node| {
            let parts = node
                .as_atom()
                .filter(|name| !is_reserved_name(name) && !name.contains('_'))
                .map(single_letter_parts)
                .filter(|parts| parts.len() > 1)
                .map(|parts| parts.into_iter().map(Node::atom_or_integer).collect::<Vec<_>>());
            match parts.and_then(|parts| Node::fixed_product(parts, Fix::Star)) {
                Some(product) => product,
                None => node,
            }
        }))
    }

    fn as_exclusion(&self) -> Option<&dyn ExclusionAware> {
        Some(self)
    }
}

impl ExclusionAware for SingleCharVars {
    fn conflicts_with(&self, other: &str) -> bool {
        other == "406_split_implied_variable_names"
    }
}

/// Turns calls of unknown functions into products: `a(b+c)` becomes `a*(b+c)`.
#[derive(Debug, Clone, Default)]
pub struct SplitUnknownFunctions;

impl AstFilter for SplitUnknownFunctions {
    fn name(&self) -> &'static str {
        "441_split_unknown_functions"
    }

    fn description(&self) -> &'static str {
        "Treats calls of unknown functions as multiplication"
    }

    fn apply(&self, ast: Node) -> FilterResult<Node> {
        Ok(ast.rewrite(&mut |node| match node {
            Node::Call { name, args }
                if name.as_atom().map_or(false, |n| !is_known_function(n)) =>
            {
                split_call(*name, args)
            }
            other => other,
        }))
    }

    fn as_exclusion(&self) -> Option<&dyn ExclusionAware> {
        Some(self)
    }
}

impl ExclusionAware for SplitUnknownFunctions {
    fn conflicts_with(&self, other: &str) -> bool {
        other == "442_split_all_functions"
    }
}

/// Turns every named call into a product, known functions included.
#[derive(Debug, Clone, Default)]
pub struct SplitAllFunctions;

impl AstFilter for SplitAllFunctions {
    fn name(&self) -> &'static str {
        "442_split_all_functions"
    }

    fn description(&self) -> &'static str {
        "Treats every function call as multiplication"
    }

    fn apply(&self, ast: Node) -> FilterResult<Node> {
        Ok(ast.rewrite(&mut |node| match node {
            Node::Call { name, args } if name.as_atom().is_some() => split_call(*name, args),
            other => other,
        }))
    }

    fn as_exclusion(&self) -> Option<&dyn ExclusionAware> {
        Some(self)
    }
}

impl ExclusionAware for SplitAllFunctions {
    fn conflicts_with(&self, other: &str) -> bool {
        other == "441_split_unknown_functions"
    }
}

/// Splits scientific notation: `1.5e3` becomes `1.5*10^3`.
#[derive(Debug, Clone, Default)]
pub struct SplitFloats;

fn split_exponent(literal: &str) -> Option<Node> {
    let (mantissa, exponent) = literal.split_once(|c: char| c == 'e' || c == 'E')?;
    let (negative, digits) = match exponent.as_bytes().first() {
        Some(b'-') => (true, &exponent[1..]),
        Some(b'+') => (false, &exponent[1..]),
        _ => (false, exponent),
    };
    if mantissa.is_empty() || digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let mantissa = if mantissa.contains('.') {
        Node::float(mantissa)
    } else {
        Node::int(mantissa)
    };
    let exponent = if negative {
        Node::prefix("-", Node::int(digits))
    } else {
        Node::int(digits)
    };
    Some(Node::fixed_mul(
        mantissa,
        Node::op("^", Node::int("10"), exponent),
        Fix::Star,
    ))
}

impl AstFilter for SplitFloats {
    fn name(&self) -> &'static str {
        "450_split_floats"
    }

    fn description(&self) -> &'static str {
        "Rewrites 1.5e3 as 1.5*10^3"
    }

    fn apply(&self, ast: Node) -> FilterResult<Node> {
        Ok(ast.rewrite(&mut |node| {
            let split = match &node {
                Node::Float(literal) => split_exponent(literal),
                _ => None,
            };
            split.unwrap_or(node)
        }))
    }
}
