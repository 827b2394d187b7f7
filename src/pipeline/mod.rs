//! Pipeline construction and execution.
//!
//! A [`PipelineRequest`] names the filters a question wants. The
//! [`PipelineBuilder`] resolves it against a registry into a [`Pipeline`],
//! which then normalizes and validates expression trees.

pub mod builder;
pub mod composite;
pub mod request;

pub use builder::PipelineBuilder;
pub use composite::Pipeline;
pub use request::PipelineRequest;
