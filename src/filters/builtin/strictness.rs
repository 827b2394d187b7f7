//! Late checks that refuse input which needed repairs.
//!
//! These run after every rewrite, so they see the operators inserted by the
//! repair and split filters as well as those inserted by the parser.

use super::reject_if;
use crate::core::ast::{Fix, Node};
use crate::core::error::FilterResult;
use crate::core::filter::AstFilter;

/// Rejects multiplication that the learner typed as a space.
#[derive(Debug, Clone, Default)]
pub struct NoFixingSpaces;

impl AstFilter for NoFixingSpaces {
    fn name(&self) -> &'static str {
        "990_no_fixing_spaces"
    }

    fn description(&self) -> &'static str {
        "Rejects spaces that stand for multiplication"
    }

    fn apply(&self, ast: Node) -> FilterResult<Node> {
        reject_if(
            ast,
            self.name(),
            "spaces",
            |node| node.fix() == Some(Fix::Space),
            |node| format!("Illegal spaces found in expression: '{}'", node),
        )
    }
}

/// Rejects multiplication that had to be inserted between adjacent tokens.
#[derive(Debug, Clone, Default)]
pub struct NoFixingStars;

impl AstFilter for NoFixingStars {
    fn name(&self) -> &'static str {
        "991_no_fixing_stars"
    }

    fn description(&self) -> &'static str {
        "Rejects missing '*' instead of inserting it"
    }

    fn apply(&self, ast: Node) -> FilterResult<Node> {
        reject_if(
            ast,
            self.name(),
            "missing_stars",
            |node| node.fix() == Some(Fix::Star),
            |node| format!("You seem to be missing a '*' in '{}'", node),
        )
    }
}

/// Rejects any input that needed any repair at all.
#[derive(Debug, Clone, Default)]
pub struct Strict;

impl AstFilter for Strict {
    fn name(&self) -> &'static str {
        "999_strict"
    }

    fn description(&self) -> &'static str {
        "Rejects input that needed any inserted operator"
    }

    fn apply(&self, ast: Node) -> FilterResult<Node> {
        reject_if(
            ast,
            self.name(),
            "strict",
            |node| node.fix().is_some(),
            |node| format!("The expression must be typed exactly; '{}' had to be repaired", node),
        )
    }
}
