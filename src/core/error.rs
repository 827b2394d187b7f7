//! Error types for the parsing rules.
//!
//! Uses thiserror for structured errors. Errors fall into two phases:
//! - [`BuildError`]: a pipeline request could not be turned into a pipeline
//! - [`ValidationError`]: a filter rejected an expression while being applied
//!
//! [`RulesError`] ties both together with the I/O and format errors that
//! loading a request from disk can produce.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum RulesError {
    #[error("Pipeline construction failed: {0}")]
    Build(#[from] BuildError),

    #[error("Input rejected: {0}")]
    Validation(#[from] ValidationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid pipeline request: {0}")]
    Config(#[from] toml::de::Error),
}

/// Errors raised while building a pipeline.
///
/// Construction is all-or-nothing: any of these means no pipeline was
/// produced.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildError {
    #[error("Unknown filter '{name}'")]
    UnknownFilter { name: String },

    #[error("Filter '{filter}' needs settings but none were supplied")]
    MissingParameters { filter: String },

    #[error("Invalid settings for filter '{filter}': {reason}")]
    InvalidParameters { filter: String, reason: String },

    #[error("Conflicting filters present in pipeline: '{filter}' and '{other}'")]
    Conflict { filter: String, other: String },
}

impl BuildError {
    /// Names of the filters involved.
    pub fn filter_names(&self) -> Vec<&str> {
        match self {
            BuildError::UnknownFilter { name } => vec![name.as_str()],
            BuildError::MissingParameters { filter }
            | BuildError::InvalidParameters { filter, .. } => vec![filter.as_str()],
            BuildError::Conflict { filter, other } => vec![filter.as_str(), other.as_str()],
        }
    }

    /// Get suggestion for fixing this error.
    pub fn suggested_fix(&self) -> Option<String> {
        match self {
            BuildError::UnknownFilter { .. } => {
                Some("Use 'list' to see the available filters".to_string())
            }
            BuildError::MissingParameters { filter } => {
                Some(format!("Add a [settings.{}] table to the request", filter))
            }
            BuildError::Conflict { filter, other } => {
                Some(format!("Remove either '{}' or '{}'", filter, other))
            }
            BuildError::InvalidParameters { .. } => None,
        }
    }
}

/// Rejection of an expression by a filter.
///
/// `answer_note` is a stable tag meant for machines (grading reports,
/// feedback lookup); `message` is meant for the learner.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{message} [{filter}: {answer_note}]")]
pub struct ValidationError {
    /// Name of the filter that rejected the input.
    pub filter: String,
    /// Stable machine-readable tag.
    pub answer_note: String,
    /// Human readable explanation.
    pub message: String,
}

impl ValidationError {
    /// Create a new validation error.
    pub fn new(
        filter: impl Into<String>,
        answer_note: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            filter: filter.into(),
            answer_note: answer_note.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for the top-level error.
pub type RulesResult<T> = Result<T, RulesError>;

/// Result type alias for pipeline construction.
pub type BuildResult<T> = Result<T, BuildError>;

/// Result type alias for applying a filter.
pub type FilterResult<T> = Result<T, ValidationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_names_both_filters() {
        let error = BuildError::Conflict {
            filter: "441_split_unknown_functions".to_string(),
            other: "442_split_all_functions".to_string(),
        };
        let text = error.to_string();
        assert!(text.contains("441_split_unknown_functions"));
        assert!(text.contains("442_split_all_functions"));
        assert_eq!(error.filter_names().len(), 2);
        assert!(error.suggested_fix().is_some());
    }

    #[test]
    fn test_validation_error_display() {
        let error = ValidationError::new("101_no_floats", "Illegal_floats", "Floats are not allowed");
        assert_eq!(
            error.to_string(),
            "Floats are not allowed [101_no_floats: Illegal_floats]"
        );
    }

    #[test]
    fn test_top_level_conversion() {
        let error: RulesError = BuildError::UnknownFilter {
            name: "999_does_not_exist".to_string(),
        }
        .into();
        assert!(matches!(error, RulesError::Build(BuildError::UnknownFilter { .. })));
    }
}
