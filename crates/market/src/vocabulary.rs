//! Live commodity vocabulary
//!
//! The set of commodity names the dataset actually carries, sourced from the
//! dataset itself. Held by an explicit cache object with a TTL and a manual
//! invalidation hook so staleness is controllable (and testable) instead of
//! hidden in module-level memoization. Entries are keyed by API key; a
//! populated entry is read concurrently by every in-flight request.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;

/// Sorted, deduplicated commodity names
#[derive(Debug, Clone, Default)]
pub struct CommodityVocabulary {
    entries: Vec<String>,
}

impl CommodityVocabulary {
    /// Build from raw commodity mentions; blanks are dropped, duplicates
    /// collapse case-insensitively (first spelling wins).
    pub fn from_names<I: IntoIterator<Item = String>>(names: I) -> Self {
        let mut seen = HashMap::new();
        for name in names {
            let trimmed = name.trim();
            if trimmed.is_empty() {
                continue;
            }
            seen.entry(trimmed.to_lowercase())
                .or_insert_with(|| trimmed.to_string());
        }
        let mut entries: Vec<String> = seen.into_values().collect();
        entries.sort();
        Self { entries }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

struct CachedVocabulary {
    vocabulary: Arc<CommodityVocabulary>,
    fetched_at: Instant,
}

/// TTL cache for vocabularies, keyed by dataset API key
pub struct VocabularyCache {
    ttl: Duration,
    inner: RwLock<HashMap<String, CachedVocabulary>>,
}

impl VocabularyCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            inner: RwLock::new(HashMap::new()),
        }
    }

    /// A still-fresh vocabulary for this key, if one is cached
    pub fn get(&self, api_key: &str) -> Option<Arc<CommodityVocabulary>> {
        let inner = self.inner.read();
        let cached = inner.get(api_key)?;
        if cached.fetched_at.elapsed() > self.ttl {
            return None;
        }
        Some(Arc::clone(&cached.vocabulary))
    }

    pub fn put(&self, api_key: &str, vocabulary: CommodityVocabulary) -> Arc<CommodityVocabulary> {
        let vocabulary = Arc::new(vocabulary);
        self.inner.write().insert(
            api_key.to_string(),
            CachedVocabulary {
                vocabulary: Arc::clone(&vocabulary),
                fetched_at: Instant::now(),
            },
        );
        tracing::info!(commodities = vocabulary.len(), "Commodity vocabulary cached");
        vocabulary
    }

    /// Drop the cached entry for a key so the next lookup refetches
    pub fn invalidate(&self, api_key: &str) {
        self.inner.write().remove(api_key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_names_sorts_and_dedupes() {
        let vocab = CommodityVocabulary::from_names(vec![
            "Wheat".to_string(),
            "Onion".to_string(),
            "wheat".to_string(),
            "  ".to_string(),
            "Tomato".to_string(),
        ]);
        assert_eq!(vocab.entries(), &["Onion", "Tomato", "Wheat"]);
    }

    #[test]
    fn test_cache_hit_and_invalidate() {
        let cache = VocabularyCache::new(Duration::from_secs(60));
        assert!(cache.get("key").is_none());

        cache.put("key", CommodityVocabulary::from_names(vec!["Wheat".into()]));
        assert_eq!(cache.get("key").unwrap().len(), 1);
        // entries are keyed per API key
        assert!(cache.get("other-key").is_none());

        cache.invalidate("key");
        assert!(cache.get("key").is_none());
    }

    #[test]
    fn test_cache_expires_after_ttl() {
        let cache = VocabularyCache::new(Duration::ZERO);
        cache.put("key", CommodityVocabulary::from_names(vec!["Wheat".into()]));
        // TTL of zero: anything cached is already stale
        assert!(cache.get("key").is_none());
    }
}
