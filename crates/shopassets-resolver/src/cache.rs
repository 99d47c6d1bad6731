//! In-memory cache for temporary signed URLs.
//!
//! Entries are handed out only while `now < expires_at - renewal_buffer`, so a
//! URL is never returned so close to expiry that it dies mid-flight.
//! Housekeeping runs probabilistically on reads instead of on a timer: no
//! background task, at the cost of transient over-capacity between sweeps.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use shopassets_core::constants::{
    DEFAULT_SWEEP_PROBABILITY, MAX_CACHE_SIZE, SIGNED_URL_RENEWAL_BUFFER_SECS,
};

use crate::clock::{Clock, SystemClock};

/// Cache tuning knobs. Tests pin `sweep_probability` to 0.0 or 1.0 for
/// deterministic housekeeping.
#[derive(Clone, Debug)]
pub struct CacheConfig {
    pub max_entries: usize,
    pub renewal_buffer_secs: i64,
    pub sweep_probability: f64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            max_entries: MAX_CACHE_SIZE,
            renewal_buffer_secs: SIGNED_URL_RENEWAL_BUFFER_SECS,
            sweep_probability: DEFAULT_SWEEP_PROBABILITY,
        }
    }
}

#[derive(Clone, Debug)]
struct CachedSignedUrl {
    url: String,
    expires_at: DateTime<Utc>,
}

/// Signed URL cache keyed by `tenants/{tenant}/{kind}/{filename}`.
///
/// Entries appear only as a side effect of successful signing calls, never
/// speculatively. Mutations take a short-lived mutex; nothing is held across
/// await points.
pub struct SignedUrlCache {
    entries: Mutex<HashMap<String, CachedSignedUrl>>,
    config: CacheConfig,
    clock: Arc<dyn Clock>,
}

impl SignedUrlCache {
    pub fn new(config: CacheConfig, clock: Arc<dyn Clock>) -> Self {
        SignedUrlCache {
            entries: Mutex::new(HashMap::new()),
            config,
            clock,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(CacheConfig::default(), Arc::new(SystemClock))
    }

    /// Return the cached URL for `key` if it is still comfortably inside its
    /// validity window. Stale entries are treated as absent; deletion is left
    /// to `sweep`.
    pub fn lookup(&self, key: &str) -> Option<String> {
        self.maybe_sweep();

        let now = self.clock.now();
        let entries = self.entries.lock().expect("cache lock poisoned");
        let entry = entries.get(key)?;
        let deadline = entry.expires_at - Duration::seconds(self.config.renewal_buffer_secs);
        if now < deadline {
            Some(entry.url.clone())
        } else {
            None
        }
    }

    /// Insert or overwrite an entry expiring `ttl_minutes` from now.
    pub fn store(&self, key: impl Into<String>, url: impl Into<String>, ttl_minutes: u32) {
        let expires_at = self.clock.now() + Duration::minutes(i64::from(ttl_minutes));
        self.store_until(key, url, expires_at);
    }

    /// Insert or overwrite an entry with an absolute expiry, as reported by
    /// the signing endpoint.
    pub fn store_until(
        &self,
        key: impl Into<String>,
        url: impl Into<String>,
        expires_at: DateTime<Utc>,
    ) {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        entries.insert(
            key.into(),
            CachedSignedUrl {
                url: url.into(),
                expires_at,
            },
        );
    }

    /// Housekeeping: drop expired entries, then evict earliest-expiring
    /// entries until the cache is back under its cap.
    pub fn sweep(&self) {
        let now = self.clock.now();
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);

        if entries.len() > self.config.max_entries {
            let mut by_expiry: Vec<(String, DateTime<Utc>)> = entries
                .iter()
                .map(|(key, entry)| (key.clone(), entry.expires_at))
                .collect();
            by_expiry.sort_by_key(|(_, expires_at)| *expires_at);

            let excess = entries.len() - self.config.max_entries;
            for (key, _) in by_expiry.into_iter().take(excess) {
                entries.remove(&key);
            }
        }

        let removed = before - entries.len();
        if removed > 0 {
            tracing::debug!(removed, remaining = entries.len(), "Swept signed URL cache");
        }
    }

    /// Empty the cache unconditionally. Signed URLs are tied to a session, so
    /// sign-out must call this.
    pub fn clear(&self) {
        self.entries.lock().expect("cache lock poisoned").clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().expect("cache lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn maybe_sweep(&self) {
        if self.config.sweep_probability >= 1.0 {
            self.sweep();
        } else if self.config.sweep_probability > 0.0
            && rand::random::<f64>() < self.config.sweep_probability
        {
            self.sweep();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ManualClock {
        now: Mutex<DateTime<Utc>>,
    }

    impl ManualClock {
        fn starting_at(now: DateTime<Utc>) -> Arc<Self> {
            Arc::new(ManualClock {
                now: Mutex::new(now),
            })
        }

        fn advance(&self, delta: Duration) {
            let mut now = self.now.lock().unwrap();
            *now += delta;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.now.lock().unwrap()
        }
    }

    fn epoch() -> DateTime<Utc> {
        "2026-01-01T00:00:00Z".parse().unwrap()
    }

    fn quiet_config() -> CacheConfig {
        CacheConfig {
            sweep_probability: 0.0,
            ..CacheConfig::default()
        }
    }

    #[test]
    fn test_store_then_lookup() {
        let clock = ManualClock::starting_at(epoch());
        let cache = SignedUrlCache::new(quiet_config(), clock);

        cache.store("tenants/acme/product/0.jpg", "https://signed.example/a", 10);
        assert_eq!(
            cache.lookup("tenants/acme/product/0.jpg"),
            Some("https://signed.example/a".to_string())
        );
        assert_eq!(cache.lookup("tenants/acme/product/1.jpg"), None);
    }

    #[test]
    fn test_renewal_buffer_invalidates_early() {
        let clock = ManualClock::starting_at(epoch());
        let cache = SignedUrlCache::new(quiet_config(), clock.clone());

        cache.store("k", "https://signed.example/a", 10);

        // 8m59s in: still inside ttl - 60s buffer.
        clock.advance(Duration::seconds(8 * 60 + 59));
        assert!(cache.lookup("k").is_some());

        // Past the 9-minute deadline: treated as absent, entry not deleted.
        clock.advance(Duration::seconds(2));
        assert!(cache.lookup("k").is_none());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_store_overwrites_existing_entry() {
        let clock = ManualClock::starting_at(epoch());
        let cache = SignedUrlCache::new(quiet_config(), clock);

        cache.store("k", "https://signed.example/old", 10);
        cache.store("k", "https://signed.example/new", 10);
        assert_eq!(cache.len(), 1);
        assert_eq!(
            cache.lookup("k"),
            Some("https://signed.example/new".to_string())
        );
    }

    #[test]
    fn test_sweep_removes_expired_entries() {
        let clock = ManualClock::starting_at(epoch());
        let cache = SignedUrlCache::new(quiet_config(), clock.clone());

        cache.store("short", "https://signed.example/a", 5);
        cache.store("long", "https://signed.example/b", 60);

        clock.advance(Duration::minutes(6));
        cache.sweep();

        assert_eq!(cache.len(), 1);
        assert!(cache.lookup("long").is_some());
    }

    #[test]
    fn test_capacity_eviction_drops_earliest_expiring() {
        let clock = ManualClock::starting_at(epoch());
        let config = CacheConfig {
            max_entries: 3,
            ..quiet_config()
        };
        let cache = SignedUrlCache::new(config, clock);

        // Later index = later expiry.
        for i in 0..5u32 {
            cache.store(format!("k{}", i), format!("https://signed.example/{}", i), 10 + i);
        }
        assert_eq!(cache.len(), 5);

        cache.sweep();
        assert_eq!(cache.len(), 3);
        assert!(cache.lookup("k0").is_none());
        assert!(cache.lookup("k1").is_none());
        assert!(cache.lookup("k2").is_some());
        assert!(cache.lookup("k3").is_some());
        assert!(cache.lookup("k4").is_some());
    }

    #[test]
    fn test_forced_sweep_on_read() {
        let clock = ManualClock::starting_at(epoch());
        let config = CacheConfig {
            sweep_probability: 1.0,
            ..CacheConfig::default()
        };
        let cache = SignedUrlCache::new(config, clock.clone());

        cache.store("k", "https://signed.example/a", 5);
        clock.advance(Duration::minutes(6));

        // The read itself triggers housekeeping.
        assert!(cache.lookup("other").is_none());
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_clear_empties_everything() {
        let clock = ManualClock::starting_at(epoch());
        let cache = SignedUrlCache::new(quiet_config(), clock);

        cache.store("a", "https://signed.example/a", 10);
        cache.store("b", "https://signed.example/b", 10);
        cache.clear();

        assert!(cache.is_empty());
        assert_eq!(cache.lookup("a"), None);
    }

    #[test]
    fn test_store_until_uses_reported_expiry() {
        let clock = ManualClock::starting_at(epoch());
        let cache = SignedUrlCache::new(quiet_config(), clock.clone());

        cache.store_until("k", "https://signed.example/a", epoch() + Duration::minutes(2));

        assert!(cache.lookup("k").is_some());
        clock.advance(Duration::seconds(61));
        assert!(cache.lookup("k").is_none());
    }
}
