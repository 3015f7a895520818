use std::collections::HashMap;

use crate::config::FilterKind;
use crate::filters::{
    CoolFilter, DramaticFilter, MonoFilter, NormalFilter, ToneFilter, VintageFilter, WarmFilter,
};

/// Registry for the built-in tone filters
///
/// The registry provides a central place to resolve the filter named in a
/// layout configuration. All filters are stateless, so one instance of each
/// is shared for the registry's lifetime.
pub struct FilterRegistry {
    filters: HashMap<FilterKind, Box<dyn ToneFilter>>,
}

impl FilterRegistry {
    /// Create a new registry with all built-in filters
    pub fn new() -> Self {
        let mut filters: HashMap<FilterKind, Box<dyn ToneFilter>> = HashMap::new();

        filters.insert(FilterKind::Normal, Box::new(NormalFilter::new()));
        filters.insert(FilterKind::Warm, Box::new(WarmFilter::new()));
        filters.insert(FilterKind::Cool, Box::new(CoolFilter::new()));
        filters.insert(FilterKind::Vintage, Box::new(VintageFilter::new()));
        filters.insert(FilterKind::Bw, Box::new(MonoFilter::new()));
        filters.insert(FilterKind::Dramatic, Box::new(DramaticFilter::new()));

        Self { filters }
    }

    /// Get the filter for a layout's filter kind
    pub fn get(&self, kind: FilterKind) -> Option<&dyn ToneFilter> {
        self.filters.get(&kind).map(|f| f.as_ref())
    }

    /// Get all available filter names
    pub fn available_filters(&self) -> Vec<&str> {
        self.filters.values().map(|f| f.name()).collect()
    }

    /// Get the number of registered filters
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl Default for FilterRegistry {
    fn default() -> Self {
        Self::new()
    }
}
