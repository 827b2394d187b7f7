//! AstFilter trait and its optional capabilities.
//!
//! Every rule is an [`AstFilter`]: a named transform from one expression tree
//! to the next that may reject its input instead. Two extra capabilities are
//! exposed as optional facets on the trait rather than through the concrete
//! type, so the pipeline builder can inspect any filter the same way:
//!
//! - [`ParametricFilter`]: the filter needs per-question settings and must never
//!   be shared between pipelines.
//! - [`ExclusionAware`]: the filter knows other filters it cannot run with.

use crate::core::ast::Node;
use crate::core::error::FilterResult;
use crate::core::params::ParamBundle;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single named rewrite or validation rule over an expression tree.
pub trait AstFilter: Send + Sync + fmt::Debug {
    /// Unique name; the numeric prefix doubles as the execution priority.
    fn name(&self) -> &'static str;

    /// One line describing what the filter does.
    fn description(&self) -> &'static str {
        ""
    }

    /// Transform the tree, or reject it.
    fn apply(&self, ast: Node) -> FilterResult<Node>;

    /// Parametric facet, if the filter has one.
    fn as_parametric(&self) -> Option<&dyn ParametricFilter> {
        None
    }

    /// Mutable parametric facet, used to bind settings to a fresh instance.
    fn as_parametric_mut(&mut self) -> Option<&mut dyn ParametricFilter> {
        None
    }

    /// Exclusion facet, if the filter declares conflicts.
    fn as_exclusion(&self) -> Option<&dyn ExclusionAware> {
        None
    }
}

/// A filter that must be configured before use.
pub trait ParametricFilter {
    /// Bind settings. Returns a reason on malformed settings.
    fn set_parameters(&mut self, params: &ParamBundle) -> Result<(), String>;

    /// Settings currently bound.
    fn parameters(&self) -> ParamBundle;
}

/// A filter that can declare incompatibility with other filters.
pub trait ExclusionAware {
    /// Whether this filter cannot share a pipeline with `other`.
    fn conflicts_with(&self, other: &str) -> bool;
}

/// Core filters run by default; by convention their names start with `0`.
pub fn is_core(name: &str) -> bool {
    name.starts_with('0')
}

/// Summary of a filter for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterInfo {
    /// Filter name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Included by default.
    pub core: bool,
    /// Needs settings.
    pub parametric: bool,
    /// Declares conflicts.
    pub exclusion_aware: bool,
}

impl FilterInfo {
    /// Describe a filter instance.
    pub fn of(filter: &dyn AstFilter) -> Self {
        Self {
            name: filter.name().to_string(),
            description: filter.description().to_string(),
            core: is_core(filter.name()),
            parametric: filter.as_parametric().is_some(),
            exclusion_aware: filter.as_exclusion().is_some(),
        }
    }
}

/// Filter that returns its input unchanged.
#[derive(Debug, Clone, Default)]
pub struct Passthrough;

impl AstFilter for Passthrough {
    fn name(&self) -> &'static str {
        "passthrough"
    }

    fn description(&self) -> &'static str {
        "Returns the expression unchanged"
    }

    fn apply(&self, ast: Node) -> FilterResult<Node> {
        Ok(ast)
    }
}
