//! Turns a [`PipelineRequest`] into a [`Pipeline`].
//!
//! Building runs in fixed steps:
//! 1. seed the selection with every core filter (when requested)
//! 2. resolve each active name, binding settings for parametric filters
//! 3. check the final selection for declared conflicts
//! 4. order by name and wrap
//!
//! Any failure aborts the whole build.

use crate::core::error::{BuildError, BuildResult};
use crate::core::filter::AstFilter;
use crate::core::params::FilterSettings;
use crate::filters::registry::FilterRegistry;
use crate::pipeline::composite::Pipeline;
use crate::pipeline::request::PipelineRequest;
use log::{debug, warn};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Selection keyed by name. A `BTreeMap` keeps it in ascending name order,
/// which is also execution order.
type Selection = BTreeMap<String, Arc<dyn AstFilter>>;

/// Builds pipelines against a registry.
#[derive(Debug, Clone, Copy)]
pub struct PipelineBuilder<'r> {
    registry: &'r FilterRegistry,
}

impl<'r> PipelineBuilder<'r> {
    /// Create a builder resolving names through `registry`.
    pub fn new(registry: &'r FilterRegistry) -> Self {
        Self { registry }
    }

    /// Build a pipeline for `request`.
    pub fn build(&self, request: &PipelineRequest) -> BuildResult<Pipeline> {
        let mut selection = Selection::new();

        if request.include_core {
            for (name, filter) in self.registry.core_filters() {
                selection.insert(name.to_string(), Arc::clone(filter));
            }
        }

        // Explicit selections replace core defaults of the same name.
        for name in &request.active {
            let filter = self.resolve_active(name, &request.settings)?;
            selection.insert(name.clone(), filter);
        }

        check_conflicts(&selection)?;

        let pipeline = Pipeline::new(selection.into_iter().collect());
        debug!(
            "Built pipeline with {} filters: {}",
            pipeline.len(),
            pipeline.names().collect::<Vec<_>>().join(", ")
        );
        Ok(pipeline)
    }

    fn resolve_active(
        &self,
        name: &str,
        settings: &FilterSettings,
    ) -> BuildResult<Arc<dyn AstFilter>> {
        let singleton = self.registry.resolve_singleton(name)?;
        if singleton.as_parametric().is_none() {
            return Ok(singleton);
        }

        // Parametric filters are never shared: build a fresh instance and
        // bind this request's settings to it.
        let params = settings.get(name).ok_or_else(|| {
            warn!("No settings supplied for parametric filter '{}'", name);
            BuildError::MissingParameters {
                filter: name.to_string(),
            }
        })?;

        let mut fresh = self.registry.instantiate(name)?;
        let parametric = fresh
            .as_parametric_mut()
            .ok_or_else(|| BuildError::InvalidParameters {
                filter: name.to_string(),
                reason: "a fresh instance does not accept settings".to_string(),
            })?;
        parametric
            .set_parameters(params)
            .map_err(|reason| {
                warn!("Rejected settings for filter '{}': {}", name, reason);
                BuildError::InvalidParameters {
                    filter: name.to_string(),
                    reason,
                }
            })?;

        debug!("Bound settings to a fresh '{}' instance", name);
        Ok(Arc::from(fresh))
    }
}

/// Pairwise check over the final selection.
fn check_conflicts(selection: &Selection) -> BuildResult<()> {
    for (name, filter) in selection {
        let Some(exclusion) = filter.as_exclusion() else {
            continue;
        };
        if let Some(other) = selection
            .keys()
            .find(|other| *other != name && exclusion.conflicts_with(other))
        {
            warn!("Filters '{}' and '{}' cannot be combined", name, other);
            return Err(BuildError::Conflict {
                filter: name.clone(),
                other: other.clone(),
            });
        }
    }
    Ok(())
}
