//! Restrictions on which functions may be called at all.

use super::reject_if;
use crate::core::ast::Node;
use crate::core::error::FilterResult;
use crate::core::filter::AstFilter;
use crate::core::vocab::is_known_function;

/// Rejects calls of functions the CAS does not know.
#[derive(Debug, Clone, Default)]
pub struct NoUnknownFunctions;

impl AstFilter for NoUnknownFunctions {
    fn name(&self) -> &'static str {
        "541_no_unknown_functions"
    }

    fn description(&self) -> &'static str {
        "Rejects calls of unknown functions"
    }

    fn apply(&self, ast: Node) -> FilterResult<Node> {
        reject_if(
            ast,
            self.name(),
            "unknownFunction",
            |node| node.called_name().map_or(false, |name| !is_known_function(name)),
            |node| {
                format!(
                    "Unknown function '{}'; did you forget a '*'?",
                    node.called_name().unwrap_or_default()
                )
            },
        )
    }
}

/// Rejects every function call, for answers that must be plain expressions.
#[derive(Debug, Clone, Default)]
pub struct NoFunctionsAtAll;

impl AstFilter for NoFunctionsAtAll {
    fn name(&self) -> &'static str {
        "542_no_functions_at_all"
    }

    fn description(&self) -> &'static str {
        "Rejects all function calls"
    }

    fn apply(&self, ast: Node) -> FilterResult<Node> {
        reject_if(
            ast,
            self.name(),
            "noFunctions",
            |node| matches!(node, Node::Call { .. }),
            |node| format!("Functions are not allowed in this answer: '{}'", node),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_functions() {
        let tree = Node::op(
            "+",
            Node::function("sqrt", vec![Node::atom("x")]),
            Node::function("foo", vec![Node::atom("y")]),
        );
        let error = NoUnknownFunctions.apply(tree).unwrap_err();
        assert_eq!(error.answer_note, "unknownFunction");
        assert!(error.message.contains("foo"));

        let known = Node::function("cos", vec![Node::atom("x")]);
        assert!(NoUnknownFunctions.apply(known).is_ok());
    }

    #[test]
    fn test_no_functions_at_all() {
        let known = Node::function("cos", vec![Node::atom("x")]);
        assert_eq!(NoFunctionsAtAll.apply(known).unwrap_err().answer_note, "noFunctions");
        assert!(NoFunctionsAtAll.apply(Node::op("*", Node::atom("a"), Node::atom("b"))).is_ok());
    }
}
