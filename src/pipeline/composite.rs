//! The composite filter: an ordered run of filters.

use crate::core::ast::Node;
use crate::core::error::FilterResult;
use crate::core::filter::AstFilter;
use log::{debug, trace};
use rayon::prelude::*;
use std::fmt;
use std::sync::Arc;

/// Ordered, immutable sequence of filters applied one after another.
///
/// Built by [`PipelineBuilder`](crate::pipeline::PipelineBuilder). Holds no
/// mutable state, so one pipeline can be applied to any number of trees,
/// including from several threads at once.
#[derive(Clone, Default)]
pub struct Pipeline {
    filters: Vec<(String, Arc<dyn AstFilter>)>,
}

impl Pipeline {
    /// Wrap filters that are already in execution order.
    pub(crate) fn new(filters: Vec<(String, Arc<dyn AstFilter>)>) -> Self {
        Self { filters }
    }

    /// Pipeline that returns its input unchanged.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Feed the tree through every filter in order.
    ///
    /// The first rejection stops the run and is returned as-is; whatever the
    /// earlier filters produced is dropped.
    pub fn apply(&self, ast: Node) -> FilterResult<Node> {
        self.filters.iter().try_fold(ast, |ast, (name, filter)| {
            trace!("Applying filter '{}'", name);
            filter.apply(ast).map_err(|error| {
                debug!("Filter '{}' rejected input: {}", name, error);
                error
            })
        })
    }

    /// Apply the pipeline to many independent trees in parallel.
    ///
    /// Results keep the order of `trees`.
    pub fn apply_batch(&self, trees: Vec<Node>) -> Vec<FilterResult<Node>> {
        trees.into_par_iter().map(|tree| self.apply(tree)).collect()
    }

    /// Filter names in execution order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.filters.iter().map(|(name, _)| name.as_str())
    }

    /// Whether a filter is part of this pipeline.
    pub fn contains(&self, name: &str) -> bool {
        self.filters.iter().any(|(n, _)| n == name)
    }

    /// Number of filters.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Whether the pipeline has no filters.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl AstFilter for Pipeline {
    fn name(&self) -> &'static str {
        "pipeline"
    }

    fn description(&self) -> &'static str {
        "Applies a sequence of filters in name order"
    }

    fn apply(&self, ast: Node) -> FilterResult<Node> {
        Pipeline::apply(self, ast)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ValidationError;

    #[derive(Debug)]
    struct Append(&'static str);

    impl AstFilter for Append {
        fn name(&self) -> &'static str {
            self.0
        }

        fn apply(&self, ast: Node) -> FilterResult<Node> {
            Ok(Node::op("+", ast, Node::atom(self.0)))
        }
    }

    #[derive(Debug)]
    struct Reject;

    impl AstFilter for Reject {
        fn name(&self) -> &'static str {
            "500_reject"
        }

        fn apply(&self, _ast: Node) -> FilterResult<Node> {
            Err(ValidationError::new("500_reject", "rejected", "Always rejects"))
        }
    }

    fn arc(filter: impl AstFilter + 'static) -> Arc<dyn AstFilter> {
        Arc::new(filter)
    }

    fn pipeline(filters: Vec<Arc<dyn AstFilter>>) -> Pipeline {
        Pipeline::new(
            filters
                .into_iter()
                .map(|f| (f.name().to_string(), f))
                .collect(),
        )
    }

    #[test]
    fn test_empty_is_identity() {
        let tree = Node::function("f", vec![Node::atom("x")]);
        assert_eq!(Pipeline::empty().apply(tree.clone()), Ok(tree));
        assert!(Pipeline::empty().is_empty());
    }

    #[test]
    fn test_outputs_feed_forward() {
        let p = pipeline(vec![arc(Append("a")), arc(Append("b"))]);
        assert_eq!(p.apply(Node::atom("x")).unwrap().to_string(), "x+a+b");
    }

    #[test]
    fn test_first_failure_aborts() {
        let p = pipeline(vec![arc(Append("a")), arc(Reject), arc(Append("z"))]);
        let error = p.apply(Node::atom("x")).unwrap_err();
        assert_eq!(error.filter, "500_reject");
        assert_eq!(error.answer_note, "rejected");
    }

    #[test]
    fn test_reusable_and_composite() {
        let inner = pipeline(vec![arc(Append("a"))]);
        let outer = pipeline(vec![arc(inner.clone()), arc(Append("b"))]);

        assert_eq!(outer.names().collect::<Vec<_>>(), vec!["pipeline", "b"]);
        assert_eq!(outer.apply(Node::atom("x")).unwrap().to_string(), "x+a+b");
        assert_eq!(outer.apply(Node::atom("y")).unwrap().to_string(), "y+a+b");
        assert_eq!(inner.apply(Node::atom("x")).unwrap().to_string(), "x+a");
    }

    #[test]
    fn test_apply_batch_matches_apply() {
        let p = pipeline(vec![arc(Append("a"))]);
        let trees: Vec<Node> = (0..32).map(|i| Node::int(i.to_string())).collect();
        let expected: Vec<_> = trees.iter().cloned().map(|t| p.apply(t)).collect();
        assert_eq!(p.apply_batch(trees), expected);
    }

    #[test]
    fn test_debug_lists_names() {
        let p = pipeline(vec![arc(Append("a")), arc(Append("b"))]);
        assert_eq!(format!("{:?}", p), "[\"a\", \"b\"]");
    }
}
