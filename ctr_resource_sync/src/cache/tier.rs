/// Generic name-keyed tier storage
///
/// A plain map from resource name to a tier-specific value. It enforces
/// nothing about other tiers; cross-tier consistency is up to the cache set.

use rustc_hash::FxHashMap;

/// Name -> value map shared by the render and thumbnail tiers
pub struct NamedTier<V> {
    entries: FxHashMap<String, V>,
}

impl<V> Default for NamedTier<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> NamedTier<V> {
    /// Create an empty tier
    pub fn new() -> Self {
        Self {
            entries: FxHashMap::default(),
        }
    }

    /// Insert or replace, returning the previous value
    pub fn insert(&mut self, name: &str, value: V) -> Option<V> {
        self.entries.insert(name.to_string(), value)
    }

    /// Remove, returning the value if present
    pub fn remove(&mut self, name: &str) -> Option<V> {
        self.entries.remove(name)
    }

    /// Value under `name`
    pub fn get(&self, name: &str) -> Option<&V> {
        self.entries.get(name)
    }

    /// Whether `name` has an entry
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the tier is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All names (unordered)
    pub fn names(&self) -> Vec<&str> {
        self.entries.keys().map(|k| k.as_str()).collect()
    }
}
