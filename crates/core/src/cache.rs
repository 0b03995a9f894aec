//! In-memory expiring cache for query results
//!
//! Memoizes expensive catalog reads (ranked searches, filtered listings)
//! keyed by the caller's query parameters. Entries carry an absolute expiry;
//! expired entries are never returned and are dropped lazily on read or in
//! bulk via [`ExpiringCache::purge_expired`].
//!
//! Any write to the catalog is expected to call [`ExpiringCache::clear`]:
//! whole-cache invalidation keeps results correct without tracking which
//! keys a write affects.
//!
//! # Example
//!
//! ```rust
//! use catalog_core::cache::{CacheConfig, ExpiringCache};
//! use std::time::Duration;
//!
//! let cache: ExpiringCache<Vec<i64>> = ExpiringCache::new(CacheConfig::default());
//!
//! cache.set("products_laptop_1_20", vec![3, 1, 2], None);
//! assert_eq!(cache.get("products_laptop_1_20"), Some(vec![3, 1, 2]));
//!
//! cache.set("short", vec![], Some(Duration::from_millis(1)));
//! std::thread::sleep(Duration::from_millis(5));
//! assert_eq!(cache.get("short"), None);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// TTL applied when `set` is called without one
    pub default_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl: Duration::from_secs(300), // 5 minutes
        }
    }
}

impl CacheConfig {
    /// Configuration with a custom default TTL
    #[must_use]
    pub fn with_ttl(default_ttl: Duration) -> Self {
        Self { default_ttl }
    }
}

/// Stored value with its absolute expiry
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        now > self.expires_at
    }
}

/// Thread-safe key/value cache with per-entry TTL
///
/// A single mutex guards the whole map; every operation holds it for the
/// full check-and-update sequence and never performs I/O while locked.
pub struct ExpiringCache<V> {
    config: CacheConfig,
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
    hits: AtomicU64,
    misses: AtomicU64,
    expired: AtomicU64,
}

impl<V: Clone> ExpiringCache<V> {
    /// Create a new cache instance
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            entries: Mutex::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            expired: AtomicU64::new(0),
        }
    }

    /// Create with a default TTL
    pub fn with_default_ttl(default_ttl: Duration) -> Self {
        Self::new(CacheConfig::with_ttl(default_ttl))
    }

    /// Default TTL for entries stored without one
    pub fn default_ttl(&self) -> Duration {
        self.config.default_ttl
    }

    /// Get a cached value
    ///
    /// Returns `None` for missing or expired keys; an expired entry is
    /// removed as part of the lookup.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        let mut entries = self.lock();

        match entries.get(key) {
            Some(entry) if !entry.is_expired(now) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(entry.value.clone())
            }
            Some(_) => {
                entries.remove(key);
                self.expired.fetch_add(1, Ordering::Relaxed);
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Set a cached value, replacing any existing entry for `key`
    ///
    /// `ttl` of `None` uses the configured default.
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Option<Duration>) {
        let ttl = ttl.unwrap_or(self.config.default_ttl);
        let now = Instant::now();
        // Saturate instead of panicking on absurd TTLs.
        let expires_at = now
            .checked_add(ttl)
            .unwrap_or_else(|| now + Duration::from_secs(u64::from(u32::MAX)));

        self.lock()
            .insert(key.into(), CacheEntry { value, expires_at });
    }

    /// Remove a cached value
    ///
    /// Returns whether a live entry was present.
    pub fn remove(&self, key: &str) -> bool {
        let now = Instant::now();
        self.lock()
            .remove(key)
            .is_some_and(|entry| !entry.is_expired(now))
    }

    /// Clear all cached values
    pub fn clear(&self) {
        let mut entries = self.lock();
        let dropped = entries.len();
        entries.clear();
        drop(entries);

        tracing::debug!(dropped, "Cache cleared");
    }

    /// Drop every expired entry, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        let removed = before - entries.len();
        drop(entries);

        self.expired.fetch_add(removed as u64, Ordering::Relaxed);
        if removed > 0 {
            tracing::debug!(removed, "Purged expired cache entries");
        }
        removed
    }

    /// Get a value, computing and storing it on a miss
    ///
    /// The lock is not held while `f` runs, so concurrent misses on the same
    /// key may both compute; the last store wins.
    pub fn get_or_insert_with<F, E>(&self, key: &str, ttl: Option<Duration>, f: F) -> Result<V, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        if let Some(value) = self.get(key) {
            return Ok(value);
        }

        let value = f()?;
        self.set(key, value.clone(), ttl);
        Ok(value)
    }

    /// Number of stored entries, including expired ones not yet purged
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        let now = Instant::now();
        let entries = self.lock();
        let expired_entries = entries.values().filter(|e| e.is_expired(now)).count();

        CacheStats {
            total_entries: entries.len(),
            expired_entries,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.expired.load(Ordering::Relaxed),
        }
    }

    // Every critical section leaves the map consistent, so a poisoned lock
    // is safe to keep using.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry<V>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<V: Clone> Default for ExpiringCache<V> {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

/// Cache statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Total number of stored entries
    pub total_entries: usize,
    /// Stored entries already past expiry
    pub expired_entries: usize,
    /// Successful lookups
    pub hits: u64,
    /// Lookups that found nothing live
    pub misses: u64,
    /// Entries dropped because they expired
    pub evictions: u64,
}

impl CacheStats {
    /// Fraction of lookups served from cache, 0.0 when there were none
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn test_cache() -> ExpiringCache<String> {
        ExpiringCache::new(CacheConfig::default())
    }

    #[test]
    fn test_set_and_get() {
        let cache = test_cache();

        cache.set("test_key", "test_value".to_string(), None);
        let value = cache.get("test_key");

        assert_eq!(value, Some("test_value".to_string()));
    }

    #[test]
    fn test_get_missing() {
        let cache = test_cache();
        assert!(cache.get("nonexistent").is_none());
    }

    #[test]
    fn test_last_write_wins() {
        let cache = test_cache();

        cache.set("key", "first".to_string(), None);
        cache.set("key", "second".to_string(), None);

        assert_eq!(cache.get("key").as_deref(), Some("second"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_remove() {
        let cache: ExpiringCache<i32> = ExpiringCache::default();

        cache.set("to_remove", 42, None);
        assert!(cache.get("to_remove").is_some());

        assert!(cache.remove("to_remove"));
        assert!(cache.get("to_remove").is_none());
        assert!(!cache.remove("to_remove"));
    }

    #[test]
    fn test_expiry() {
        let cache = test_cache();

        cache.set("expires", "value".to_string(), Some(Duration::from_millis(1)));
        std::thread::sleep(Duration::from_millis(20));

        assert!(cache.get("expires").is_none(), "Value should be expired");
        assert_eq!(cache.len(), 0, "Expired entry should be removed on read");
    }

    #[test]
    fn test_default_ttl_applies() {
        let cache: ExpiringCache<u8> = ExpiringCache::with_default_ttl(Duration::from_millis(1));

        cache.set("k", 1, None);
        cache.set("long", 2, Some(Duration::from_secs(60)));
        std::thread::sleep(Duration::from_millis(20));

        assert_eq!(cache.get("k"), None);
        assert_eq!(cache.get("long"), Some(2));
    }

    #[test]
    fn test_clear() {
        let cache = test_cache();

        cache.set("key1", "value1".to_string(), None);
        cache.set("key2", "value2".to_string(), None);
        cache.clear();

        assert!(cache.is_empty());
        assert!(cache.get("key1").is_none());
        assert!(cache.get("key2").is_none());
    }

    #[test]
    fn test_purge_expired() {
        let cache = test_cache();

        cache.set("old1", "a".to_string(), Some(Duration::from_millis(1)));
        cache.set("old2", "b".to_string(), Some(Duration::from_millis(1)));
        cache.set("fresh", "c".to_string(), None);
        std::thread::sleep(Duration::from_millis(20));

        assert_eq!(cache.stats().expired_entries, 2);
        assert_eq!(cache.purge_expired(), 2);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.purge_expired(), 0);
        assert_eq!(cache.get("fresh").as_deref(), Some("c"));
    }

    #[test]
    fn test_stats() {
        let cache = test_cache();

        cache.set("key1", "value1".to_string(), None);
        cache.get("key1");
        cache.get("key1");
        cache.get("missing");

        let stats = cache.stats();
        assert_eq!(stats.total_entries, 1);
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
        assert!((stats.hit_rate() - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_get_or_insert_with() {
        let cache: ExpiringCache<usize> = ExpiringCache::default();
        let mut calls = 0;

        let first: Result<usize, ()> = cache.get_or_insert_with("k", None, || {
            calls += 1;
            Ok(7)
        });
        let second: Result<usize, ()> = cache.get_or_insert_with("k", None, || {
            calls += 1;
            Ok(8)
        });

        assert_eq!(first, Ok(7));
        assert_eq!(second, Ok(7));
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_get_or_insert_with_error_not_cached() {
        let cache: ExpiringCache<usize> = ExpiringCache::default();

        let result: Result<usize, &str> = cache.get_or_insert_with("k", None, || Err("boom"));

        assert_eq!(result, Err("boom"));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_concurrent_access() {
        let cache: Arc<ExpiringCache<usize>> = Arc::new(ExpiringCache::default());

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    for i in 0..100 {
                        let key = format!("k{}", i % 10);
                        cache.set(key.clone(), t * 1000 + i, None);
                        let _ = cache.get(&key);
                        if i % 25 == 0 {
                            cache.clear();
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert!(cache.len() <= 10);
    }
}
