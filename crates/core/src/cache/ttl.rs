//! Per-entry TTL cache using Moka.

use std::time::{Duration, Instant};

use moka::Expiry;
use moka::sync::Cache;

/// Default cache capacity (number of entries).
const DEFAULT_CACHE_CAPACITY: u64 = 10_000;

/// Default time-to-live for cache entries (1 minute).
const DEFAULT_TTL_SECS: u64 = 60;

#[derive(Clone)]
struct Entry<V> {
    value: V,
    ttl: Duration,
}

/// Expiry policy reading the TTL stored alongside each value.
struct PerEntryTtl;

impl<V> Expiry<String, Entry<V>> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &Entry<V>,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &Entry<V>,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// In-memory key/value cache with per-entry expiry.
///
/// Cloning is cheap and yields a handle to the same entries. Concurrent
/// writers to the same key race; the last completed `set` or `clear` wins.
#[derive(Clone)]
pub struct TtlCache<V> {
    cache: Cache<String, Entry<V>>,
    default_ttl: Duration,
}

impl<V> TtlCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Creates a new cache with default settings.
    ///
    /// Default: 10 000 entries max, 60 second TTL.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(DEFAULT_CACHE_CAPACITY, Duration::from_secs(DEFAULT_TTL_SECS))
    }

    /// Creates a new cache with custom configuration.
    ///
    /// # Arguments
    ///
    /// * `max_capacity` - Maximum number of entries to cache
    /// * `default_ttl` - TTL applied by [`TtlCache::set`]
    #[must_use]
    pub fn with_config(max_capacity: u64, default_ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(PerEntryTtl)
            .build();

        Self { cache, default_ttl }
    }

    /// Returns the TTL used when none is given.
    #[must_use]
    pub const fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Stores a value under `key` with the default TTL.
    pub fn set(&self, key: impl Into<String>, value: V) {
        self.set_with_ttl(key, value, self.default_ttl);
    }

    /// Stores a value under `key` with an explicit TTL.
    pub fn set_with_ttl(&self, key: impl Into<String>, value: V, ttl: Duration) {
        self.cache.insert(key.into(), Entry { value, ttl });
    }

    /// Returns the value stored under `key` if it has not expired.
    ///
    /// A miss also drops whatever is left under the key, so an expired entry
    /// does not linger until the next sweep.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<V> {
        if let Some(entry) = self.cache.get(key) {
            return Some(entry.value);
        }

        self.cache.invalidate(key);
        None
    }

    /// Removes the entry stored under `key`.
    pub fn invalidate(&self, key: &str) {
        self.cache.invalidate(key);
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.cache.invalidate_all();
    }

    /// Reclaims expired and invalidated entries now.
    pub fn sweep(&self) {
        self.cache.run_pending_tasks();
    }

    /// Returns the number of entries currently held.
    ///
    /// The count is refreshed by [`TtlCache::sweep`].
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

impl<V> Default for TtlCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<V> std::fmt::Debug for TtlCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlCache")
            .field("entries", &self.cache.entry_count())
            .field("default_ttl", &self.default_ttl)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread::sleep;

    #[test]
    fn test_set_then_get() {
        let cache = TtlCache::new();
        cache.set("k", 42);
        assert_eq!(cache.get("k"), Some(42));
    }

    #[test]
    fn test_get_missing_key() {
        let cache: TtlCache<i32> = TtlCache::new();
        assert_eq!(cache.get("missing"), None);
    }

    #[test]
    fn test_entry_expires_after_ttl() {
        let cache = TtlCache::new();
        cache.set_with_ttl("k", "v", Duration::from_millis(50));
        assert_eq!(cache.get("k"), Some("v"));

        sleep(Duration::from_millis(120));
        assert_eq!(cache.get("k"), None, "Expired entry must read as a miss");
    }

    #[test]
    fn test_default_ttl_applies_to_set() {
        let cache = TtlCache::with_config(10, Duration::from_millis(50));
        cache.set("k", 1);
        sleep(Duration::from_millis(120));
        assert_eq!(cache.get("k"), None);
    }

    #[test]
    fn test_overwrite_resets_ttl() {
        let cache = TtlCache::new();
        cache.set_with_ttl("k", 1, Duration::from_millis(50));
        cache.set_with_ttl("k", 2, Duration::from_secs(60));
        sleep(Duration::from_millis(120));
        assert_eq!(cache.get("k"), Some(2));
    }

    #[test]
    fn test_invalidate_single_key() {
        let cache = TtlCache::new();
        cache.set("a", 1);
        cache.set("b", 2);

        cache.invalidate("a");

        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), Some(2));
    }

    #[test]
    fn test_clear_removes_everything() {
        let cache = TtlCache::new();
        cache.set("a", 1);
        cache.set("b", 2);

        cache.clear();

        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), None);
    }

    #[test]
    fn test_sweep_reclaims_expired_entries() {
        let cache = TtlCache::new();
        cache.set_with_ttl("short", 1, Duration::from_millis(30));
        cache.set_with_ttl("long", 2, Duration::from_secs(60));
        cache.sweep();
        assert_eq!(cache.entry_count(), 2);

        sleep(Duration::from_millis(100));
        cache.sweep();

        assert_eq!(cache.entry_count(), 1);
        assert_eq!(cache.get("long"), Some(2));
    }

    #[test]
    fn test_clones_share_entries() {
        let cache = TtlCache::new();
        let handle = cache.clone();
        cache.set("k", Arc::new(vec![1, 2, 3]));

        let a = cache.get("k").unwrap();
        let b = handle.get("k").unwrap();
        assert!(Arc::ptr_eq(&a, &b), "Cached value should be the same allocation");
    }
}
