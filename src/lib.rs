//! # parsing-rules - Normalizing learner maths input
//!
//! Learners type maths the way they write it on paper: `2x`, `sin x`,
//! `sin^2(x)`, `a<x<b`. Before the CAS sees such an answer, its expression tree
//! passes through a pipeline of small filters that either repair it (insert the
//! missing `*`, split `xy` into `x*y`) or reject it with a note saying why.
//!
//! ## Features
//!
//! - **Named filters**: every rule has a stable name whose numeric prefix is
//!   its execution priority
//! - **Core filters**: rules starting with `0` run unless explicitly switched off
//! - **Parametric filters**: per-question settings bound to a fresh instance
//! - **Conflict detection**: filters that cannot run together are refused at build time
//! - **Batch application**: apply one pipeline to many trees in parallel
//!
//! ## Quick Start
//!
//! ```rust
//! use parsing_rules::prelude::*;
//!
//! let registry = FilterRegistry::new();
//! let request = PipelineRequest::new().activate("403_split_at_number_letter_boundary");
//! let pipeline = PipelineBuilder::new(&registry).build(&request).unwrap();
//!
//! let tree = pipeline.apply(Node::atom("2x")).unwrap();
//! assert_eq!(tree.to_string(), "2*x");
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: expression tree, filter trait, parameters and errors
//! - [`filters`]: the registry and the built-in filters
//! - [`pipeline`]: requests, the builder and the composite pipeline
//!
//! ## Creating Custom Filters
//!
//! Implement [`AstFilter`](core::filter::AstFilter) and list it in a table of
//! [`FilterEntry`](filters::registry::FilterEntry) rows:
//!
//! ```rust
//! use parsing_rules::prelude::*;
//!
//! #[derive(Debug, Default)]
//! struct NoBooleans;
//!
//! impl AstFilter for NoBooleans {
//!     fn name(&self) -> &'static str {
//!         "600_no_booleans"
//!     }
//!
//!     fn apply(&self, ast: Node) -> Result<Node, ValidationError> {
//!         match ast.find(&|node: &Node| matches!(node, Node::Bool(_))) {
//!             Some(_) => Err(ValidationError::new(self.name(), "booleans", "No booleans")),
//!             None => Ok(ast),
//!         }
//!     }
//! }
//!
//! static TABLE: &[FilterEntry] = &[FilterEntry {
//!     name: "600_no_booleans",
//!     factory: boxed::<NoBooleans>,
//! }];
//!
//! let registry = FilterRegistry::with_table(TABLE);
//! assert!(registry.contains("600_no_booleans"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod core;
pub mod filters;
pub mod pipeline;

/// Prelude module for convenient imports.
///
/// Import everything commonly needed with:
/// ```rust,ignore
/// use parsing_rules::prelude::*;
/// ```
pub mod prelude {
    // Expression tree
    pub use crate::core::ast::{Fix, Node};

    // Filter traits and types
    pub use crate::core::filter::{is_core, AstFilter, ExclusionAware, FilterInfo, ParametricFilter};

    // Parameters
    pub use crate::core::params::{FilterSettings, ParamBundle};

    // Errors
    pub use crate::core::error::{
        BuildError, BuildResult, FilterResult, RulesError, RulesResult, ValidationError,
    };

    // Registry
    pub use crate::filters::registry::{boxed, FilterEntry, FilterFactory, FilterRegistry};
    pub use crate::filters::builtin::{SecurityLevel, BUILTIN_FILTERS};

    // Pipeline
    pub use crate::pipeline::{Pipeline, PipelineBuilder, PipelineRequest};
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
