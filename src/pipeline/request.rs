//! Pipeline requests: which filters a question wants, and their settings.
//!
//! Requests are plain data and can be written by hand as TOML:
//!
//! ```toml
//! include_core = true
//! active = ["410_single_char_vars", "998_security"]
//!
//! [settings.998_security]
//! security = "s"
//! allowwords = "foo, bar"
//! ```

use crate::core::error::RulesResult;
use crate::core::params::{FilterSettings, ParamBundle};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Everything needed to build a pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineRequest {
    /// Names selected explicitly. Order does not matter.
    pub active: IndexSet<String>,
    /// Settings for parametric filters, keyed by filter name.
    pub settings: FilterSettings,
    /// Whether to add every core filter.
    pub include_core: bool,
}

impl PipelineRequest {
    /// Request with no active filters that includes the core ones.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a filter.
    pub fn activate(mut self, name: impl Into<String>) -> Self {
        self.active.insert(name.into());
        self
    }

    /// Provide settings for a filter.
    pub fn with_settings(mut self, name: impl Into<String>, params: ParamBundle) -> Self {
        self.settings.insert(name.into(), params);
        self
    }

    /// Include or exclude the core filters.
    pub fn with_core(mut self, include: bool) -> Self {
        self.include_core = include;
        self
    }

    /// Parse a request from TOML text.
    pub fn from_toml_str(text: &str) -> RulesResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load a request from a TOML file.
    pub fn from_path(path: impl AsRef<Path>) -> RulesResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

impl Default for PipelineRequest {
    fn default() -> Self {
        Self {
            active: IndexSet::new(),
            settings: FilterSettings::new(),
            include_core: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::RulesError;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let request = PipelineRequest::from_toml_str("").unwrap();
        assert!(request.include_core);
        assert!(request.active.is_empty());
        assert!(request.settings.is_empty());
    }

    #[test]
    fn test_parse_settings() {
        let request = PipelineRequest::from_toml_str(
            r#"
            include_core = false
            active = ["998_security", "101_no_floats"]

            [settings.998_security]
            security = "t"
            forbidwords = ["foo", "bar"]
            "#,
        )
        .unwrap();

        assert!(!request.include_core);
        assert!(request.active.contains("101_no_floats"));
        let security = &request.settings["998_security"];
        assert_eq!(security.get_str("security"), Ok(Some("t")));
        assert_eq!(security.get_words("forbidwords").unwrap(), vec!["foo", "bar"]);
    }

    #[test]
    fn test_invalid_toml() {
        let result = PipelineRequest::from_toml_str("active = 3");
        assert!(matches!(result, Err(RulesError::Config(_))));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "active = [\"102_no_strings\"]").unwrap();

        let request = PipelineRequest::from_path(file.path()).unwrap();
        assert_eq!(request, PipelineRequest::new().activate("102_no_strings"));

        let missing = PipelineRequest::from_path(file.path().with_extension("missing"));
        assert!(matches!(missing, Err(RulesError::Io(_))));
    }

    #[test]
    fn test_builder_methods() {
        let request = PipelineRequest::new()
            .activate("998_security")
            .with_settings("998_security", ParamBundle::new().with("security", "s"))
            .with_core(false);
        assert!(!request.include_core);
        assert_eq!(request.active.len(), 1);
        assert_eq!(request.settings.len(), 1);
    }
}
