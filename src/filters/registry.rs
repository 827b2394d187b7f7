//! Filter registry for the closed set of known filters.
//!
//! The registry is built from a static table mapping names to constructors.
//! Nothing is instantiated until first use; then every known filter is built
//! at once and cached as a shared singleton. Population happens behind a
//! [`OnceLock`], so concurrent first callers wait for a single population
//! and never observe a partial cache.

use crate::core::error::{BuildError, BuildResult};
use crate::core::filter::{is_core, AstFilter, FilterInfo};
use crate::core::params::FilterSettings;
use crate::pipeline::{Pipeline, PipelineBuilder, PipelineRequest};
use indexmap::IndexMap;
use log::{trace, warn};
use std::sync::{Arc, OnceLock};

/// Factory function for creating filter instances.
pub type FilterFactory = fn() -> Box<dyn AstFilter>;

/// Factory for any filter with a default constructor.
pub fn boxed<F: AstFilter + Default + 'static>() -> Box<dyn AstFilter> {
    Box::new(F::default())
}

/// One row of a registration table.
#[derive(Clone, Copy)]
pub struct FilterEntry {
    /// Unique filter name.
    pub name: &'static str,
    /// Constructor.
    pub factory: FilterFactory,
}

impl std::fmt::Debug for FilterEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterEntry").field("name", &self.name).finish()
    }
}

type SingletonMap = IndexMap<&'static str, Arc<dyn AstFilter>>;

/// Registry of every known filter.
///
/// Lifecycle is `Uninitialized -> Populated`, triggered by the first lookup or
/// listing. There is no refresh.
pub struct FilterRegistry {
    table: &'static [FilterEntry],
    singletons: OnceLock<SingletonMap>,
}

impl FilterRegistry {
    /// Create a registry over the built-in filters.
    pub fn new() -> Self {
        Self::with_table(crate::filters::builtin::BUILTIN_FILTERS)
    }

    /// Create a registry over a custom registration table.
    pub const fn with_table(table: &'static [FilterEntry]) -> Self {
        Self {
            table,
            singletons: OnceLock::new(),
        }
    }

    fn singletons(&self) -> &SingletonMap {
        self.singletons.get_or_init(|| populate(self.table))
    }

    /// Whether the singleton cache has been populated.
    pub fn is_populated(&self) -> bool {
        self.singletons.get().is_some()
    }

    /// Shared instance of a filter.
    ///
    /// Populates the whole cache on first use.
    pub fn resolve_singleton(&self, name: &str) -> BuildResult<Arc<dyn AstFilter>> {
        self.singletons()
            .get(name)
            .cloned()
            .ok_or_else(|| BuildError::UnknownFilter {
                name: name.to_string(),
            })
    }

    /// Fresh, unshared instance of a filter.
    ///
    /// Goes through the same table as the cache; the cache is not touched.
    pub fn instantiate(&self, name: &str) -> BuildResult<Box<dyn AstFilter>> {
        self.table
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| (entry.factory)())
            .ok_or_else(|| BuildError::UnknownFilter {
                name: name.to_string(),
            })
    }

    /// Every known name, in registration order.
    pub fn list_names(&self) -> Vec<&'static str> {
        self.singletons().keys().copied().collect()
    }

    /// Shared instances of every core filter, in registration order.
    pub fn core_filters(&self) -> impl Iterator<Item = (&'static str, &Arc<dyn AstFilter>)> {
        self.singletons()
            .iter()
            .filter(|(name, _)| is_core(name))
            .map(|(name, filter)| (*name, filter))
    }

    /// Check if a filter is known.
    pub fn contains(&self, name: &str) -> bool {
        self.table.iter().any(|entry| entry.name == name)
    }

    /// Describe one filter.
    pub fn info(&self, name: &str) -> BuildResult<FilterInfo> {
        self.resolve_singleton(name)
            .map(|filter| FilterInfo::of(filter.as_ref()))
    }

    /// Describe every filter.
    pub fn infos(&self) -> Vec<FilterInfo> {
        self.singletons()
            .values()
            .map(|filter| FilterInfo::of(filter.as_ref()))
            .collect()
    }

    /// Search filters by name or description.
    pub fn search(&self, query: &str) -> Vec<&'static str> {
        let query = query.to_lowercase();

        self.singletons()
            .iter()
            .filter(|(name, filter)| {
                name.to_lowercase().contains(&query)
                    || filter.description().to_lowercase().contains(&query)
            })
            .map(|(name, _)| *name)
            .collect()
    }

    /// Build a pipeline from active names and settings.
    ///
    /// Shorthand for [`PipelineBuilder::build`] with a request assembled from
    /// the arguments.
    pub fn pipeline<I, S>(
        &self,
        active: I,
        settings: FilterSettings,
        include_core: bool,
    ) -> BuildResult<Pipeline>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let request = PipelineRequest {
            active: active.into_iter().map(Into::into).collect(),
            settings,
            include_core,
        };
        PipelineBuilder::new(self).build(&request)
    }

    /// Number of distinct known filters. Populates the cache.
    pub fn len(&self) -> usize {
        self.singletons().len()
    }

    /// Check if registry is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for FilterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterRegistry")
            .field("table_rows", &self.table.len())
            .field("populated", &self.is_populated())
            .finish()
    }
}

fn populate(table: &'static [FilterEntry]) -> SingletonMap {
    let mut singletons = SingletonMap::with_capacity(table.len());

    for entry in table {
        if singletons.contains_key(entry.name) {
            warn!("Filter '{}' is registered twice; keeping the first entry", entry.name);
            continue;
        }
        let filter = (entry.factory)();
        if filter.name() != entry.name {
            warn!(
                "Filter registered as '{}' reports its name as '{}'",
                entry.name,
                filter.name()
            );
        }
        singletons.insert(entry.name, Arc::from(filter));
    }

    trace!("Populated filter registry with {} filters", singletons.len());
    singletons
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filter::Passthrough;
    use std::thread;

    static PASSTHROUGH_ONLY: &[FilterEntry] = &[FilterEntry {
        name: "passthrough",
        factory: boxed::<Passthrough>,
    }];

    #[test]
    fn test_lazy_population() {
        let registry = FilterRegistry::new();
        assert!(!registry.is_populated());
        assert!(registry.contains("101_no_floats"));
        assert!(!registry.is_populated());

        registry.resolve_singleton("101_no_floats").unwrap();
        assert!(registry.is_populated());
        assert_eq!(registry.list_names().len(), registry.len());
    }

    #[test]
    fn test_listing_populates() {
        let registry = FilterRegistry::new();
        let names = registry.list_names();
        assert!(registry.is_populated());
        assert_eq!(names.len(), 25);
        assert_eq!(names, registry.list_names());
    }

    #[test]
    fn test_singleton_identity() {
        let registry = FilterRegistry::new();
        let first = registry.resolve_singleton("410_single_char_vars").unwrap();
        let second = registry.resolve_singleton("410_single_char_vars").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_unknown_name() {
        let registry = FilterRegistry::new();
        assert_eq!(
            registry.resolve_singleton("999_does_not_exist").unwrap_err(),
            BuildError::UnknownFilter {
                name: "999_does_not_exist".to_string()
            }
        );
        assert!(registry.instantiate("999_does_not_exist").is_err());
        assert!(registry.info("999_does_not_exist").is_err());
    }

    #[test]
    fn test_instantiate_is_fresh() {
        let registry = FilterRegistry::new();
        let fresh = registry.instantiate("998_security").unwrap();
        assert_eq!(fresh.name(), "998_security");
        assert!(fresh.as_parametric().is_some());
        assert!(!registry.is_populated());
    }

    #[test]
    fn test_core_filters() {
        let registry = FilterRegistry::new();
        let core: Vec<_> = registry.core_filters().map(|(name, _)| name).collect();
        assert_eq!(core.len(), 9);
        assert!(core.iter().all(|name| name.starts_with('0')));
        assert!(core.contains(&"001_fix_call_of_a_group_or_function"));
    }

    #[test]
    fn test_search() {
        let registry = FilterRegistry::new();
        let results = registry.search("trig");
        assert!(results.contains(&"025_no_trig_power"));
        assert!(results.contains(&"031_no_trig_brackets"));

        let results = registry.search("nonexistent");
        assert!(results.is_empty());
    }

    #[test]
    fn test_duplicate_rows_count_once() {
        static DUPLICATED: &[FilterEntry] = &[
            FilterEntry { name: "passthrough", factory: boxed::<Passthrough> },
            FilterEntry { name: "passthrough", factory: boxed::<Passthrough> },
        ];
        let registry = FilterRegistry::with_table(DUPLICATED);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.list_names(), vec!["passthrough"]);
        assert!(!registry.is_empty());
    }

    #[test]
    fn test_custom_table() {
        let registry = FilterRegistry::with_table(PASSTHROUGH_ONLY);
        assert_eq!(registry.list_names(), vec!["passthrough"]);
        assert!(registry.core_filters().next().is_none());
        assert!(registry.resolve_singleton("101_no_floats").is_err());
    }

    #[test]
    fn test_concurrent_first_use() {
        let registry = Arc::new(FilterRegistry::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || registry.resolve_singleton("999_strict").unwrap())
            })
            .collect();

        let instances: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(instances.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
        assert_eq!(registry.list_names().len(), 25);
    }
}
