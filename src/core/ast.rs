//! Expression tree handed from one filter to the next.
//!
//! The tree is produced by an external parser and consumed by the CAS. Filters
//! only see this representation, so it is deliberately small: literals, atoms,
//! bracketed groups and collections, calls, and unary/binary operators.
//!
//! Parentheses are explicit [`Node::Group`] nodes, which means printing never
//! needs to reason about operator precedence.

use crate::core::error::RulesResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why an operator exists in the tree even though the learner did not type it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fix {
    /// A `*` inserted between two tokens that were written next to each other.
    Star,
    /// A `*` inserted where the learner typed a space.
    Space,
}

/// A node of the expression tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Node {
    /// Integer literal, kept as written.
    Integer(String),
    /// Floating point literal, kept as written (may carry an exponent).
    Float(String),
    /// String literal.
    Str(String),
    /// `true` / `false`.
    Bool(bool),
    /// Identifier: a variable, constant or function name.
    Atom(String),
    /// Parenthesised, comma separated group `( ... )`.
    Group(Vec<Node>),
    /// List `[ ... ]`.
    List(Vec<Node>),
    /// Set `{ ... }`.
    Set(Vec<Node>),
    /// Function call `name(args)`.
    Call {
        /// Called expression, usually an [`Node::Atom`].
        name: Box<Node>,
        /// Arguments.
        args: Vec<Node>,
    },
    /// Prefix operator such as unary minus or `not`.
    Prefix {
        /// Operator text.
        op: String,
        /// Operand.
        operand: Box<Node>,
    },
    /// Binary operator.
    Op {
        /// Operator text.
        op: String,
        /// Left operand.
        lhs: Box<Node>,
        /// Right operand.
        rhs: Box<Node>,
        /// Set when the operator was inserted rather than typed.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fix: Option<Fix>,
    },
}

impl Node {
    /// Integer literal.
    pub fn int(value: impl Into<String>) -> Self {
        Node::Integer(value.into())
    }

    /// Float literal.
    pub fn float(value: impl Into<String>) -> Self {
        Node::Float(value.into())
    }

    /// String literal.
    pub fn string(value: impl Into<String>) -> Self {
        Node::Str(value.into())
    }

    /// Identifier.
    pub fn atom(name: impl Into<String>) -> Self {
        Node::Atom(name.into())
    }

    /// Either an integer literal or an atom, depending on what `text` looks like.
    pub fn atom_or_integer(text: &str) -> Self {
        if !text.is_empty() && text.chars().all(|c| c.is_ascii_digit()) {
            Node::int(text)
        } else {
            Node::atom(text)
        }
    }

    /// Bracketed group.
    pub fn group(items: Vec<Node>) -> Self {
        Node::Group(items)
    }

    /// Call of an arbitrary expression.
    pub fn call(name: Node, args: Vec<Node>) -> Self {
        Node::Call {
            name: Box::new(name),
            args,
        }
    }

    /// Call of a named function.
    pub fn function(name: impl Into<String>, args: Vec<Node>) -> Self {
        Node::call(Node::atom(name), args)
    }

    /// Prefix operator.
    pub fn prefix(op: impl Into<String>, operand: Node) -> Self {
        Node::Prefix {
            op: op.into(),
            operand: Box::new(operand),
        }
    }

    /// Binary operator typed by the learner.
    pub fn op(op: impl Into<String>, lhs: Node, rhs: Node) -> Self {
        Node::Op {
            op: op.into(),
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
            fix: None,
        }
    }

    /// Multiplication that was inserted for the given reason.
    pub fn fixed_mul(lhs: Node, rhs: Node, fix: Fix) -> Self {
        Node::Op {
            op: "*".to_string(),
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
            fix: Some(fix),
        }
    }

    /// Left-associated chain of inserted multiplications.
    ///
    /// Returns `None` for an empty iterator.
    pub fn fixed_product(factors: impl IntoIterator<Item = Node>, fix: Fix) -> Option<Self> {
        factors
            .into_iter()
            .reduce(|acc, next| Node::fixed_mul(acc, next, fix))
    }

    /// Name of an atom.
    pub fn as_atom(&self) -> Option<&str> {
        match self {
            Node::Atom(name) => Some(name),
            _ => None,
        }
    }

    /// Name of the called function when the callee is a plain atom.
    pub fn called_name(&self) -> Option<&str> {
        match self {
            Node::Call { name, .. } => name.as_atom(),
            _ => None,
        }
    }

    /// Operator text of a binary operator.
    pub fn binary_op(&self) -> Option<&str> {
        match self {
            Node::Op { op, .. } => Some(op),
            _ => None,
        }
    }

    /// Whether this node is an operator inserted for any reason.
    pub fn fix(&self) -> Option<Fix> {
        match self {
            Node::Op { fix, .. } => *fix,
            _ => None,
        }
    }

    /// Direct children in source order.
    ///
    /// A bare atom in call position belongs to its call and is not listed;
    /// any other callee expression is.
    pub fn children(&self) -> Vec<&Node> {
        match self {
            Node::Integer(_) | Node::Float(_) | Node::Str(_) | Node::Bool(_) | Node::Atom(_) => {
                Vec::new()
            }
            Node::Group(items) | Node::List(items) | Node::Set(items) => items.iter().collect(),
            Node::Call { name, args } => {
                let mut out = Vec::with_capacity(args.len() + 1);
                if !matches!(**name, Node::Atom(_)) {
                    out.push(&**name);
                }
                out.extend(args.iter());
                out
            }
            Node::Prefix { operand, .. } => vec![&**operand],
            Node::Op { lhs, rhs, .. } => vec![&**lhs, &**rhs],
        }
    }

    /// Pre-order search for the first node matching `pred`.
    pub fn find(&self, pred: &impl Fn(&Node) -> bool) -> Option<&Node> {
        if pred(self) {
            return Some(self);
        }
        self.children().into_iter().find_map(|child| child.find(pred))
    }

    /// Visit every node in pre-order.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }

    /// Rebuild the tree bottom-up: every child is rewritten before `f` sees
    /// its parent. Stops at the first error.
    ///
    /// Follows the same rule as [`Node::children`]: a bare atom callee is not
    /// passed to `f` on its own, only as part of the enclosing call.
    pub fn map_bottom_up<E>(self, f: &mut impl FnMut(Node) -> Result<Node, E>) -> Result<Node, E> {
        let rebuilt = match self {
            leaf @ (Node::Integer(_)
            | Node::Float(_)
            | Node::Str(_)
            | Node::Bool(_)
            | Node::Atom(_)) => leaf,
            Node::Group(items) => Node::Group(map_all(items, f)?),
            Node::List(items) => Node::List(map_all(items, f)?),
            Node::Set(items) => Node::Set(map_all(items, f)?),
            Node::Call { name, args } => {
                let name = match *name {
                    atom @ Node::Atom(_) => atom,
                    other => other.map_bottom_up(f)?,
                };
                Node::Call {
                    name: Box::new(name),
                    args: map_all(args, f)?,
                }
            }
            Node::Prefix { op, operand } => Node::Prefix {
                op,
                operand: Box::new(operand.map_bottom_up(f)?),
            },
            Node::Op { op, lhs, rhs, fix } => Node::Op {
                op,
                lhs: Box::new(lhs.map_bottom_up(f)?),
                rhs: Box::new(rhs.map_bottom_up(f)?),
                fix,
            },
        };
        f(rebuilt)
    }

    /// Infallible variant of [`Node::map_bottom_up`].
    pub fn rewrite(self, f: &mut impl FnMut(Node) -> Node) -> Node {
        let result: Result<Node, std::convert::Infallible> = self.map_bottom_up(&mut |n| Ok(f(n)));
        match result {
            Ok(node) => node,
            Err(never) => match never {},
        }
    }
}

fn map_all<E>(
    items: Vec<Node>,
    f: &mut impl FnMut(Node) -> Result<Node, E>,
) -> Result<Vec<Node>, E> {
    items.into_iter().map(|item| item.map_bottom_up(f)).collect()
}

fn write_joined(f: &mut fmt::Formatter<'_>, items: &[Node]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ",")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

fn is_word_operator(op: &str) -> bool {
    op.chars().all(|c| c.is_ascii_alphabetic())
}

impl Node {
    /// Parse a tree from its JSON form.
    pub fn from_json(json: &str) -> RulesResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Pretty-printed JSON form of the tree.
    pub fn to_json(&self) -> RulesResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Integer(v) | Node::Float(v) | Node::Atom(v) => write!(f, "{}", v),
            Node::Str(s) => write!(f, "\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\"")),
            Node::Bool(b) => write!(f, "{}", b),
            Node::Group(items) => {
                write!(f, "(")?;
                write_joined(f, items)?;
                write!(f, ")")
            }
            Node::List(items) => {
                write!(f, "[")?;
                write_joined(f, items)?;
                write!(f, "]")
            }
            Node::Set(items) => {
                write!(f, "{{")?;
                write_joined(f, items)?;
                write!(f, "}}")
            }
            Node::Call { name, args } => {
                write!(f, "{}(", name)?;
                write_joined(f, args)?;
                write!(f, ")")
            }
            Node::Prefix { op, operand } if is_word_operator(op) => {
                write!(f, "{} {}", op, operand)
            }
            Node::Prefix { op, operand } => write!(f, "{}{}", op, operand),
            Node::Op { op, lhs, rhs, .. } if is_word_operator(op) => {
                write!(f, "{} {} {}", lhs, op, rhs)
            }
            Node::Op { op, lhs, rhs, .. } => write!(f, "{}{}{}", lhs, op, rhs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let tree = Node::op(
            "+",
            Node::fixed_mul(Node::int("2"), Node::atom("x"), Fix::Star),
            Node::function("sin", vec![Node::group(vec![Node::atom("y")])]),
        );
        assert_eq!(tree.to_string(), "2*x+sin((y))");

        let logic = Node::op("and", Node::Bool(true), Node::prefix("not", Node::atom("p")));
        assert_eq!(logic.to_string(), "true and not p");

        let coll = Node::List(vec![Node::Set(vec![Node::int("1")]), Node::string("a\"b")]);
        assert_eq!(coll.to_string(), "[{1},\"a\\\"b\"]");
    }

    #[test]
    fn test_children_skip_atom_callee() {
        let call = Node::function("f", vec![Node::atom("x")]);
        assert_eq!(call.children(), vec![&Node::atom("x")]);

        let group_call = Node::call(Node::group(vec![Node::atom("a")]), vec![Node::atom("b")]);
        assert_eq!(group_call.children().len(), 2);
    }

    #[test]
    fn test_find_and_walk() {
        let tree = Node::op("*", Node::atom("a"), Node::function("g", vec![Node::float("1.5")]));
        assert_eq!(
            tree.find(&|n| matches!(n, Node::Float(_))),
            Some(&Node::float("1.5"))
        );
        assert!(tree.find(&|n| n.as_atom() == Some("g")).is_none());

        let mut count = 0;
        tree.walk(&mut |_| count += 1);
        assert_eq!(count, 4);
    }

    #[test]
    fn test_map_bottom_up_order_and_error() {
        let tree = Node::op("+", Node::atom("a"), Node::atom("b"));
        let mut seen = Vec::new();
        let out: Result<Node, ()> = tree.clone().map_bottom_up(&mut |n| {
            seen.push(n.to_string());
            Ok(n)
        });
        assert_eq!(out.unwrap(), tree);
        assert_eq!(seen, vec!["a", "b", "a+b"]);

        let failed: Result<Node, &str> = tree.map_bottom_up(&mut |n| match n {
            Node::Atom(ref a) if a == "b" => Err("b"),
            other => Ok(other),
        });
        assert_eq!(failed, Err("b"));
    }

    #[test]
    fn test_fixed_product() {
        let product =
            Node::fixed_product(vec![Node::atom("a"), Node::atom("b"), Node::atom("c")], Fix::Star)
                .unwrap();
        assert_eq!(product.to_string(), "a*b*c");
        assert_eq!(product.fix(), Some(Fix::Star));
        assert!(Node::fixed_product(Vec::new(), Fix::Star).is_none());
    }

    #[test]
    fn test_serde_shape() {
        let tree = Node::fixed_mul(Node::int("2"), Node::atom("x"), Fix::Space);
        let json = serde_json::to_string(&tree).unwrap();
        assert!(json.contains("\"type\":\"Op\""));
        assert!(json.contains("\"fix\":\"space\""));
        let back: Node = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tree);

        let typed = Node::op("+", Node::atom("a"), Node::atom("b"));
        let json = serde_json::to_string(&typed).unwrap();
        assert!(!json.contains("fix"));
    }

    #[test]
    fn test_json_helpers() {
        let tree = Node::function("f", vec![Node::float("1.5e3"), Node::Bool(true)]);
        assert_eq!(Node::from_json(&tree.to_json().unwrap()).unwrap(), tree);

        let error = Node::from_json(r#"{"type":"Matrix","data":[]}"#).unwrap_err();
        assert!(matches!(error, crate::core::error::RulesError::Json(_)));
    }
}
