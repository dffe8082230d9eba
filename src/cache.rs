//! Caching infrastructure for compiled ingredient patterns
//!
//! Building an ingredient pattern means normalizing the name and compiling a
//! regex. A recipe page renders every step against every ingredient, so the
//! same names come back again and again. [`PatternCache`] memoizes the
//! compiled pattern under the raw ingredient name.
//!
//! Entries are never invalidated: a pattern depends only on the name it was
//! built from. Names that normalize to nothing are not stored.
//!
//! ## Usage Examples
//!
//! ```rust
//! use ingredient_highlighter::cache::PatternCache;
//! use ingredient_highlighter::text_processing::DEFAULT_PATTERN_SIZE_LIMIT;
//!
//! let cache = PatternCache::new(DEFAULT_PATTERN_SIZE_LIMIT);
//! let first = cache.get_or_build("tomate")?;
//! let second = cache.get_or_build("tomate")?;
//! assert!(std::sync::Arc::ptr_eq(&first, &second));
//! assert_eq!(cache.stats().builds, 1);
//! # Ok::<(), ingredient_highlighter::errors::AppError>(())
//! ```

use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use crate::errors::AppResult;
use crate::observability;
use crate::text_processing::{build_ingredient_pattern, IngredientPattern};

/// Cache statistics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheStats {
    /// Total number of entries
    pub entries: usize,
    /// Number of hits
    pub hits: u64,
    /// Number of misses
    pub misses: u64,
    /// Patterns compiled and stored
    pub builds: u64,
    /// Lookups for names that normalize to nothing (never stored)
    pub uncacheable: u64,
    /// Failed pattern constructions
    pub failures: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

/// Thread-safe memoization table from raw ingredient name to compiled pattern
pub struct PatternCache {
    patterns: RwLock<HashMap<String, Arc<IngredientPattern>>>,
    stats: Mutex<CacheStats>,
    size_limit: usize,
}

impl PatternCache {
    /// Create an empty cache whose patterns are compiled with `size_limit`
    pub fn new(size_limit: usize) -> Self {
        Self {
            patterns: RwLock::new(HashMap::new()),
            stats: Mutex::new(CacheStats::default()),
            size_limit,
        }
    }

    /// Look up a pattern without building it
    pub fn get(&self, raw_name: &str) -> Option<Arc<IngredientPattern>> {
        self.patterns.read().get(raw_name).cloned()
    }

    /// Return the cached pattern for `raw_name`, building and storing it on first use.
    ///
    /// The key is the untransformed name: `"l'ail"` and `"ail"` are distinct
    /// entries even though they compile to the same pattern. When two threads
    /// race on a new name, the first pattern stored wins and both get it.
    pub fn get_or_build(&self, raw_name: &str) -> AppResult<Arc<IngredientPattern>> {
        if let Some(pattern) = self.get(raw_name) {
            self.stats.lock().hits += 1;
            observability::record_pattern_cache_lookup(true);
            return Ok(pattern);
        }

        self.stats.lock().misses += 1;
        observability::record_pattern_cache_lookup(false);

        let start = Instant::now();
        let pattern = match build_ingredient_pattern(raw_name, self.size_limit) {
            Ok(pattern) => pattern,
            Err(e) => {
                self.stats.lock().failures += 1;
                observability::record_pattern_build(observability::PatternBuildOutcome::Failure, start.elapsed());
                return Err(e);
            }
        };

        if pattern.is_never() {
            self.stats.lock().uncacheable += 1;
            observability::record_pattern_build(observability::PatternBuildOutcome::Never, start.elapsed());
            return Ok(Arc::new(pattern));
        }

        let mut patterns = self.patterns.write();
        let stored = match patterns.get(raw_name) {
            Some(existing) => Arc::clone(existing),
            None => {
                let built = Arc::new(pattern);
                patterns.insert(raw_name.to_string(), Arc::clone(&built));
                self.stats.lock().builds += 1;
                observability::record_pattern_build(observability::PatternBuildOutcome::Success, start.elapsed());
                tracing::debug!(
                    ingredient_name = %raw_name,
                    entries = patterns.len(),
                    "Cached ingredient pattern"
                );
                built
            }
        };
        Ok(stored)
    }

    /// Get cache size
    pub fn len(&self) -> usize {
        self.patterns.read().len()
    }

    /// Check if cache is empty
    pub fn is_empty(&self) -> bool {
        self.patterns.read().is_empty()
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.lock().clone();
        stats.entries = self.len();

        let total_requests = stats.hits + stats.misses;
        if total_requests > 0 {
            stats.hit_rate = stats.hits as f64 / total_requests as f64;
        }

        stats
    }
}

impl Default for PatternCache {
    fn default() -> Self {
        Self::new(crate::text_processing::DEFAULT_PATTERN_SIZE_LIMIT)
    }
}

impl std::fmt::Debug for PatternCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatternCache")
            .field("entries", &self.len())
            .field("size_limit", &self.size_limit)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use std::thread;

    #[test]
    fn test_second_lookup_is_a_hit() {
        let cache = PatternCache::default();
        let first = cache.get_or_build("tomate").unwrap();
        let second = cache.get_or_build("tomate").unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        let stats = cache.stats();
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.builds, 1);
        assert_eq!(stats.hit_rate, 0.5);
    }

    #[test]
    fn test_key_is_the_raw_name() {
        let cache = PatternCache::default();
        cache.get_or_build("l'ail").unwrap();
        cache.get_or_build("ail").unwrap();
        cache.get_or_build("Ail").unwrap();

        assert_eq!(cache.len(), 3);
        assert_eq!(cache.stats().builds, 3);
        assert!(cache.get("l'ail").is_some());
        assert!(cache.get("L'ail").is_none());
    }

    #[test]
    fn test_never_patterns_are_not_stored() {
        let cache = PatternCache::default();
        let never = cache.get_or_build("  ").unwrap();
        assert!(never.is_never());
        let again = cache.get_or_build("  ").unwrap();
        assert!(again.is_never());

        assert!(cache.is_empty());
        let stats = cache.stats();
        assert_eq!(stats.uncacheable, 2);
        assert_eq!(stats.misses, 2);
        assert_eq!(stats.builds, 0);
    }

    #[test]
    fn test_failed_builds_are_not_stored() {
        let cache = PatternCache::new(16);
        let result = cache.get_or_build("tomate");
        assert!(matches!(result, Err(AppError::Pattern(_))));
        assert!(cache.is_empty());
        assert_eq!(cache.stats().failures, 1);
    }

    #[test]
    fn test_concurrent_lookups_share_one_pattern() {
        let cache = Arc::new(PatternCache::default());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || cache.get_or_build("farine").unwrap())
            })
            .collect();
        let patterns: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        let stored = cache.get("farine").unwrap();
        assert!(patterns.iter().all(|p| Arc::ptr_eq(p, &stored)));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.stats().builds, 1);
    }
}
