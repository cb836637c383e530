//! Per-class behavior configuration.

use serde::{Deserialize, Serialize};

/// Switches that tune how behaviors treat a class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MagicConfig {
    /// Coerce values written to unbound properties to their declared doc type
    pub coerce_unbound: bool,
    /// Memoize computed properties that allow caching
    pub cache_computed: bool,
    /// Read, write and call public members directly instead of dispatching
    pub public_passthrough: bool,
}

impl Default for MagicConfig {
    fn default() -> Self {
        Self {
            coerce_unbound: true,
            cache_computed: true,
            public_passthrough: true,
        }
    }
}

impl MagicConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// No coercion and no memoization: values are stored and computed as given.
    pub fn strict() -> Self {
        Self {
            coerce_unbound: false,
            cache_computed: false,
            public_passthrough: true,
        }
    }

    pub fn with_coerce_unbound(mut self, enabled: bool) -> Self {
        self.coerce_unbound = enabled;
        self
    }

    pub fn with_cache_computed(mut self, enabled: bool) -> Self {
        self.cache_computed = enabled;
        self
    }

    pub fn with_public_passthrough(mut self, enabled: bool) -> Self {
        self.public_passthrough = enabled;
        self
    }
}
