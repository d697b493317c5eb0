// src/services/cache.rs
// DOCUMENTATION: In-memory TTL cache for public profile pages
// PURPOSE: Avoid rebuilding artist/host pages (profile + tours + photos + reviews)
// on every request. Writes touching a user invalidate that user's entries.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Cache entry with expiration
#[derive(Clone, Debug)]
struct CacheEntry<T> {
    data: T,
    expires_at: Instant,
}

impl<T> CacheEntry<T> {
    fn new(data: T, ttl: Duration) -> Self {
        Self {
            data,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() > self.expires_at
    }
}

/// Which public page an entry holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileKind {
    Artist,
    Host,
}

/// Thread-safe cache of serialized public profiles
pub struct ProfileCache {
    store: Arc<RwLock<HashMap<String, CacheEntry<String>>>>,
    default_ttl: Duration,
}

impl ProfileCache {
    /// Create new cache with default TTL
    pub fn new(ttl_seconds: u64) -> Self {
        Self {
            store: Arc::new(RwLock::new(HashMap::new())),
            default_ttl: Duration::from_secs(ttl_seconds),
        }
    }

    pub fn key(kind: ProfileKind, user_id: Uuid) -> String {
        match kind {
            ProfileKind::Artist => format!("artist:{}", user_id),
            ProfileKind::Host => format!("host:{}", user_id),
        }
    }

    /// Get cached value
    pub async fn get(&self, key: &str) -> Option<String> {
        let store = self.store.read().await;

        match store.get(key) {
            Some(entry) if !entry.is_expired() => {
                log::debug!("Cache HIT for key: {}", key);
                Some(entry.data.clone())
            }
            Some(_) => {
                log::debug!("Cache EXPIRED for key: {}", key);
                None
            }
            None => {
                log::debug!("Cache MISS for key: {}", key);
                None
            }
        }
    }

    /// Set cached value with default TTL
    pub async fn set(&self, key: String, value: String) {
        self.set_with_ttl(key, value, self.default_ttl).await;
    }

    /// Set cached value with custom TTL
    pub async fn set_with_ttl(&self, key: String, value: String, ttl: Duration) {
        let mut store = self.store.write().await;
        log::debug!("Cache SET for key: {} (TTL: {}s)", key, ttl.as_secs());
        store.insert(key, CacheEntry::new(value, ttl));
    }

    /// Drop every page belonging to a user
    pub async fn invalidate_user(&self, user_id: Uuid) {
        let mut store = self.store.write().await;
        for kind in [ProfileKind::Artist, ProfileKind::Host] {
            if store.remove(&Self::key(kind, user_id)).is_some() {
                log::debug!("Cache INVALIDATED for user: {}", user_id);
            }
        }
    }

    /// Clear expired entries
    pub async fn cleanup(&self) {
        let mut store = self.store.write().await;
        let before_count = store.len();
        store.retain(|_, entry| !entry.is_expired());
        let after_count = store.len();

        if before_count > after_count {
            log::info!(
                "Cache cleanup: removed {} expired entries ({} remaining)",
                before_count - after_count,
                after_count
            );
        }
    }

    /// Get cache statistics
    pub async fn stats(&self) -> CacheStats {
        let store = self.store.read().await;
        let total = store.len();
        let expired = store.values().filter(|e| e.is_expired()).count();

        CacheStats {
            total_entries: total,
            expired_entries: expired,
            active_entries: total - expired,
        }
    }
}

/// Cache statistics
#[derive(Debug, Serialize, Deserialize)]
pub struct CacheStats {
    pub total_entries: usize,
    pub expired_entries: usize,
    pub active_entries: usize,
}

/// Start background cleanup task
/// DOCUMENTATION: Periodically removes expired entries
pub fn start_cleanup_task(cache: Arc<ProfileCache>, interval_seconds: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_seconds));

        loop {
            interval.tick().await;
            cache.cleanup().await;
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cache_set_get() {
        let cache = ProfileCache::new(60);
        let key = ProfileCache::key(ProfileKind::Artist, Uuid::new_v4());
        let value = "{\"stage_name\":\"Juniper\"}".to_string();

        cache.set(key.clone(), value.clone()).await;
        assert_eq!(cache.get(&key).await, Some(value));
    }

    #[tokio::test]
    async fn test_cache_expiration() {
        let cache = ProfileCache::new(60);
        let key = "short".to_string();

        cache
            .set_with_ttl(key.clone(), "v".to_string(), Duration::from_millis(50))
            .await;
        assert!(cache.get(&key).await.is_some());

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert!(cache.get(&key).await.is_none());
    }

    #[test]
    fn test_invalidate_user() {
        let cache = ProfileCache::new(60);
        let user = Uuid::new_v4();
        let other = Uuid::new_v4();

        tokio_test::block_on(async {
            cache.set(ProfileCache::key(ProfileKind::Artist, user), "a".into()).await;
            cache.set(ProfileCache::key(ProfileKind::Host, user), "h".into()).await;
            cache.set(ProfileCache::key(ProfileKind::Artist, other), "o".into()).await;

            cache.invalidate_user(user).await;

            assert!(cache.get(&ProfileCache::key(ProfileKind::Artist, user)).await.is_none());
            assert!(cache.get(&ProfileCache::key(ProfileKind::Host, user)).await.is_none());
            assert!(cache.get(&ProfileCache::key(ProfileKind::Artist, other)).await.is_some());
        });
    }

    #[tokio::test]
    async fn test_cache_cleanup() {
        let cache = ProfileCache::new(60);

        cache
            .set_with_ttl("key1".to_string(), "value1".to_string(), Duration::from_millis(10))
            .await;
        cache.set("key2".to_string(), "value2".to_string()).await;

        tokio::time::sleep(Duration::from_millis(50)).await;
        cache.cleanup().await;

        let stats = cache.stats().await;
        assert_eq!(stats.total_entries, 1);
        assert_eq!(stats.active_entries, 1);
    }

    #[test]
    fn test_keys_distinguish_kind() {
        let id = Uuid::new_v4();
        assert_ne!(
            ProfileCache::key(ProfileKind::Artist, id),
            ProfileCache::key(ProfileKind::Host, id)
        );
    }
}
