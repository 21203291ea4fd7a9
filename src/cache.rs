use lru::LruCache;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs;
use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::Mutex;

pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

/// Identity of a translation request: trimmed text plus both language codes.
/// Text is compared case-sensitively.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub text: String,
    pub source: String,
    pub target: String,
}

impl CacheKey {
    pub fn new(text: &str, source: &str, target: &str) -> Self {
        Self {
            text: text.trim().to_string(),
            source: source.to_string(),
            target: target.to_string(),
        }
    }
}

/// On-disk form of a single cache entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheRecord {
    pub text: String,
    pub source: String,
    pub target: String,
    pub translation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
}

struct CacheInner {
    entries: LruCache<CacheKey, String>,
    hits: u64,
    misses: u64,
}

/// Bounded in-memory translation cache.
///
/// Entries live until the process exits or they are evicted as least recently
/// used once `capacity` is reached.
pub struct TranslationCache {
    inner: Mutex<CacheInner>,
}

impl TranslationCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity)
            .unwrap_or(NonZeroUsize::MIN);

        Self {
            inner: Mutex::new(CacheInner {
                entries: LruCache::new(capacity),
                hits: 0,
                misses: 0,
            }),
        }
    }

    pub fn get(&self, key: &CacheKey) -> Option<String> {
        let mut inner = self.inner.lock().unwrap();
        let found = inner.entries.get(key).cloned();
        match found {
            Some(value) => {
                inner.hits += 1;
                Some(value)
            }
            None => {
                inner.misses += 1;
                None
            }
        }
    }

    pub fn insert(&self, key: CacheKey, translation: String) {
        let mut inner = self.inner.lock().unwrap();
        if let Some((evicted, _)) = inner.entries.push(key.clone(), translation) {
            if evicted != key {
                log::debug!(
                    "Translation cache full, evicted '{}' ({}|{})",
                    evicted.text,
                    evicted.source,
                    evicted.target
                );
            }
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.entries.clear();
        inner.hits = 0;
        inner.misses = 0;
    }

    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock().unwrap();
        CacheStats {
            entries: inner.entries.len(),
            capacity: inner.entries.cap().get(),
            hits: inner.hits,
            misses: inner.misses,
        }
    }

    /// Export entries, least recently used first, so that `restore` rebuilds the same order
    pub fn snapshot(&self) -> Vec<CacheRecord> {
        let inner = self.inner.lock().unwrap();
        inner
            .entries
            .iter()
            .rev()
            .map(|(key, translation)| CacheRecord {
                text: key.text.clone(),
                source: key.source.clone(),
                target: key.target.clone(),
                translation: translation.clone(),
            })
            .collect()
    }

    pub fn restore(&self, records: Vec<CacheRecord>) {
        for record in records {
            let key = CacheKey::new(&record.text, &record.source, &record.target);
            self.insert(key, record.translation);
        }
    }

    /// Load entries from a JSON file written by `save_to_file`.
    /// A missing file is not an error; returns the number of entries read.
    pub fn load_from_file(&self, path: &Path) -> Result<usize, Box<dyn Error>> {
        if !path.exists() {
            return Ok(0);
        }

        let content = fs::read_to_string(path)?;
        let records: Vec<CacheRecord> = serde_json::from_str(&content)?;
        let count = records.len();
        self.restore(records);

        Ok(count)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<usize, Box<dyn Error>> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let records = self.snapshot();
        let count = records.len();
        fs::write(path, serde_json::to_string_pretty(&records)?)?;

        Ok(count)
    }
}

impl Default for TranslationCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(text: &str) -> CacheKey {
        CacheKey::new(text, "en", "pt")
    }

    // peek without touching hit counters or recency
    fn resident(cache: &TranslationCache, key: &CacheKey) -> bool {
        cache.inner.lock().unwrap().entries.contains(key)
    }

    #[test]
    fn test_key_trims_but_keeps_case() {
        assert_eq!(key("  hello "), key("hello"));
        assert_ne!(key("Hello"), key("hello"));
        assert_ne!(CacheKey::new("hello", "en", "pt"), CacheKey::new("hello", "en", "es"));
    }

    #[test]
    fn test_get_and_insert() {
        let cache = TranslationCache::new(4);
        assert_eq!(cache.get(&key("hello")), None);

        cache.insert(key("hello"), "Olá".to_string());
        assert_eq!(cache.get(&key("hello")), Some("Olá".to_string()));

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.capacity, 4);
    }

    #[test]
    fn test_evicts_least_recently_used() {
        let cache = TranslationCache::new(2);
        cache.insert(key("one"), "Um".to_string());
        cache.insert(key("two"), "Dois".to_string());

        // touch "one" so "two" becomes the eviction candidate
        assert!(cache.get(&key("one")).is_some());
        cache.insert(key("three"), "Três".to_string());

        assert!(resident(&cache, &key("one")));
        assert!(!resident(&cache, &key("two")));
        assert!(resident(&cache, &key("three")));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_zero_capacity_still_holds_one_entry() {
        let cache = TranslationCache::new(0);
        cache.insert(key("one"), "Um".to_string());
        assert_eq!(cache.stats().capacity, 1);
        assert_eq!(cache.get(&key("one")), Some("Um".to_string()));
    }

    #[test]
    fn test_snapshot_restore_keeps_recency_order() {
        let cache = TranslationCache::new(2);
        cache.insert(key("one"), "Um".to_string());
        cache.insert(key("two"), "Dois".to_string());

        let records = cache.snapshot();
        assert_eq!(records[0].text, "one");
        assert_eq!(records[1].text, "two");

        let restored = TranslationCache::new(2);
        restored.restore(records);
        restored.insert(key("three"), "Três".to_string());

        assert!(!resident(&restored, &key("one")));
        assert!(resident(&restored, &key("two")));
    }

    #[test]
    fn test_file_round_trip() {
        let path = std::env::temp_dir().join(format!(
            "martins_cache_test_{}.json",
            std::process::id()
        ));

        let cache = TranslationCache::new(8);
        cache.insert(key("hello"), "Olá".to_string());
        assert_eq!(cache.save_to_file(&path).unwrap(), 1);

        let loaded = TranslationCache::new(8);
        assert_eq!(loaded.load_from_file(&path).unwrap(), 1);
        assert_eq!(loaded.get(&key("hello")), Some("Olá".to_string()));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_missing_file() {
        let cache = TranslationCache::new(8);
        let path = Path::new("definitely/not/here/cache.json");
        assert_eq!(cache.load_from_file(path).unwrap(), 0);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_clear_resets_stats() {
        let cache = TranslationCache::new(8);
        cache.insert(key("hello"), "Olá".to_string());
        cache.get(&key("hello"));
        cache.clear();

        let stats = cache.stats();
        assert_eq!(stats.entries, 0);
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
    }
}
