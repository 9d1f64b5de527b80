//! # Query cache: last-known query results with explicit invalidation
//!
//! Holds the most recent result of each keyed read (e.g. the caller's property
//! list). Mutations never write into the cache; after a confirmed success they
//! call [`QueryCache::invalidate`], which marks the entry stale and bumps its
//! version. Readers watch [`QueryCache::version`] and refetch when it changes,
//! while stale data stays available for display until the refetch lands.
//!
//! Entries live only in memory and disappear with the page.

use std::collections::HashMap;

#[derive(Clone, Debug, PartialEq)]
struct Entry<T> {
    data: Option<T>,
    stale: bool,
    version: u64,
}

impl<T> Default for Entry<T> {
    fn default() -> Self {
        Self {
            data: None,
            stale: true,
            version: 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct QueryCache<T> {
    entries: HashMap<String, Entry<T>>,
}

impl<T> Default for QueryCache<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<T: Clone> QueryCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last stored result, fresh or stale.
    pub fn get(&self, key: &str) -> Option<&T> {
        self.entries.get(key).and_then(|e| e.data.as_ref())
    }

    /// True when the entry was never loaded or has been invalidated since.
    pub fn is_stale(&self, key: &str) -> bool {
        self.entries.get(key).map_or(true, |e| e.stale)
    }

    /// Counter bumped on every invalidation of `key`. Starts at 0.
    pub fn version(&self, key: &str) -> u64 {
        self.entries.get(key).map_or(0, |e| e.version)
    }

    /// Store a freshly fetched result. Does not change the version.
    pub fn store(&mut self, key: &str, data: T) {
        let entry = self.entries.entry(key.to_string()).or_default();
        entry.data = Some(data);
        entry.stale = false;
    }

    /// Mark `key` stale so the next read refetches. Prior data is kept.
    pub fn invalidate(&mut self, key: &str) {
        let entry = self.entries.entry(key.to_string()).or_default();
        entry.stale = true;
        entry.version += 1;
    }

    /// Invalidate every key starting with `prefix`.
    pub fn invalidate_prefix(&mut self, prefix: &str) {
        for (_, entry) in self.entries.iter_mut().filter(|(k, _)| k.starts_with(prefix)) {
            entry.stale = true;
            entry.version += 1;
        }
    }

    /// Drop everything, e.g. on logout.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_cache_is_stale() {
        let cache: QueryCache<Vec<u32>> = QueryCache::new();
        assert!(cache.get("properties").is_none());
        assert!(cache.is_stale("properties"));
        assert_eq!(cache.version("properties"), 0);
    }

    #[test]
    fn test_store_makes_entry_fresh_without_bumping_version() {
        let mut cache = QueryCache::new();
        cache.store("properties", vec![1, 2]);
        assert_eq!(cache.get("properties"), Some(&vec![1, 2]));
        assert!(!cache.is_stale("properties"));
        assert_eq!(cache.version("properties"), 0);
    }

    #[test]
    fn test_invalidate_keeps_data_and_bumps_version() {
        let mut cache = QueryCache::new();
        cache.store("properties", vec![1]);
        cache.invalidate("properties");

        assert!(cache.is_stale("properties"));
        assert_eq!(cache.version("properties"), 1);
        assert_eq!(cache.get("properties"), Some(&vec![1]));

        // Refetch lands
        cache.store("properties", vec![]);
        assert!(!cache.is_stale("properties"));
        assert_eq!(cache.version("properties"), 1);
        assert_eq!(cache.get("properties"), Some(&vec![]));
    }

    #[test]
    fn test_invalidate_prefix_only_touches_matching_keys() {
        let mut cache = QueryCache::new();
        cache.store("properties", 1);
        cache.store("properties:detail", 2);
        cache.store("settings", 3);

        cache.invalidate_prefix("properties");

        assert!(cache.is_stale("properties"));
        assert!(cache.is_stale("properties:detail"));
        assert!(!cache.is_stale("settings"));
        assert_eq!(cache.version("settings"), 0);
    }

    #[test]
    fn test_clear() {
        let mut cache = QueryCache::new();
        cache.store("properties", 1);
        cache.clear();
        assert!(cache.get("properties").is_none());
    }
}
