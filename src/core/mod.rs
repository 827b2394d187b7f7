//! Core types and traits for the parsing rules.
//!
//! This module contains the foundational pieces every filter builds on:
//! - The expression tree
//! - The filter trait and its capabilities
//! - Parameter bundles for parametric filters
//! - Error types
//! - Shared word lists

pub mod ast;
pub mod error;
pub mod filter;
pub mod params;
pub mod vocab;

// Re-export commonly used types
pub use ast::{Fix, Node};
pub use error::{BuildError, RulesError, ValidationError};
pub use filter::{AstFilter, ExclusionAware, FilterInfo, ParametricFilter};
pub use params::{FilterSettings, ParamBundle};
