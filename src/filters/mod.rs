//! Filter module.
//!
//! Contains the filter registry and built-in filter implementations.

pub mod builtin;
pub mod registry;

pub use registry::{boxed, FilterEntry, FilterFactory, FilterRegistry};
