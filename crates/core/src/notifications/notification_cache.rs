//! Read cache in front of the notification list and unread count.
//!
//! Keys are typed per operation so a shared cache can replace the in-process
//! one without touching call sites.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::lock::Mutex;
use moka::future::Cache;

use log::debug;

use crate::deliveries::NotificationItem;
use crate::errors::{Error, Result};
use crate::notifications::notifications_model::NotificationPolicy;

/// Cache key: which cached read, for which subscriber.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NotificationCacheKey {
    List(String),
    UnreadCount(String),
    Cooldown(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKeyKind {
    List,
    UnreadCount,
    Cooldown,
}

impl NotificationCacheKey {
    pub fn subscriber_id(&self) -> &str {
        match self {
            NotificationCacheKey::List(id)
            | NotificationCacheKey::UnreadCount(id)
            | NotificationCacheKey::Cooldown(id) => id,
        }
    }

    pub fn kind(&self) -> CacheKeyKind {
        match self {
            NotificationCacheKey::List(_) => CacheKeyKind::List,
            NotificationCacheKey::UnreadCount(_) => CacheKeyKind::UnreadCount,
            NotificationCacheKey::Cooldown(_) => CacheKeyKind::Cooldown,
        }
    }
}

/// Cached value; its variant must match the key's kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachedEntry {
    List(Arc<Vec<NotificationItem>>),
    UnreadCount(i64),
    Cooldown,
}

impl CachedEntry {
    pub fn kind(&self) -> CacheKeyKind {
        match self {
            CachedEntry::List(_) => CacheKeyKind::List,
            CachedEntry::UnreadCount(_) => CacheKeyKind::UnreadCount,
            CachedEntry::Cooldown => CacheKeyKind::Cooldown,
        }
    }
}

/// Injected cache used by the notification services.
#[async_trait]
pub trait NotificationCache: Send + Sync {
    async fn get(&self, key: &NotificationCacheKey) -> Result<Option<CachedEntry>>;

    async fn put(&self, key: NotificationCacheKey, entry: CachedEntry) -> Result<()>;

    async fn invalidate(&self, key: &NotificationCacheKey) -> Result<()>;

    /// Drops the cached list and unread count of one subscriber and moves
    /// its read generation forward.
    async fn invalidate_reads(&self, subscriber_id: &str) -> Result<()>;

    /// Generation of a subscriber's cached reads. Taken before loading a
    /// value from the store and handed back to [`put_if_current`].
    ///
    /// [`put_if_current`]: NotificationCache::put_if_current
    async fn read_generation(&self, subscriber_id: &str) -> Result<u64>;

    /// Stores `entry` unless the subscriber's reads were invalidated after
    /// `generation` was taken. Returns whether the entry was stored.
    async fn put_if_current(
        &self,
        key: NotificationCacheKey,
        entry: CachedEntry,
        generation: u64,
    ) -> Result<bool>;
}

/// In-process cache with one TTL per key kind.
///
/// Not shared between instances; multi-instance deployments need a shared
/// [`NotificationCache`] implementation instead.
pub struct MokaNotificationCache {
    /// Notification lists.
    list_cache: Cache<String, CachedEntry>,
    /// Unread counts.
    unread_cache: Cache<String, CachedEntry>,
    /// Reconciliation cooldown markers.
    cooldown_cache: Cache<String, CachedEntry>,
    /// Last read generation handed to each invalidated subscriber.
    generations: Cache<String, u64>,
    next_generation: AtomicU64,
    /// Orders generation-checked writes against invalidations.
    read_guard: Mutex<()>,
}

impl MokaNotificationCache {
    pub fn new(policy: &NotificationPolicy) -> Self {
        Self {
            list_cache: build_cache(policy.list_ttl, policy.cache_capacity),
            unread_cache: build_cache(policy.unread_ttl, policy.cache_capacity),
            cooldown_cache: build_cache(policy.cooldown, policy.cache_capacity),
            generations: Cache::builder()
                .time_to_idle(generation_idle(policy))
                .build(),
            next_generation: AtomicU64::new(1),
            read_guard: Mutex::new(()),
        }
    }

    fn cache_for(&self, kind: CacheKeyKind) -> &Cache<String, CachedEntry> {
        match kind {
            CacheKeyKind::List => &self.list_cache,
            CacheKeyKind::UnreadCount => &self.unread_cache,
            CacheKeyKind::Cooldown => &self.cooldown_cache,
        }
    }

    async fn current_generation(&self, subscriber_id: &str) -> u64 {
        self.generations.get(subscriber_id).await.unwrap_or(0)
    }
}

impl Default for MokaNotificationCache {
    fn default() -> Self {
        Self::new(&NotificationPolicy::default())
    }
}

/// Generations must outlive any read that could still be in flight; they
/// are only dropped after sitting idle far longer than the read TTLs.
fn generation_idle(policy: &NotificationPolicy) -> Duration {
    policy
        .list_ttl
        .max(policy.unread_ttl)
        .saturating_mul(10)
        .max(Duration::from_secs(3600))
}

fn build_cache(ttl: Duration, capacity: u64) -> Cache<String, CachedEntry> {
    Cache::builder()
        .time_to_live(ttl)
        .max_capacity(capacity)
        .build()
}

#[async_trait]
impl NotificationCache for MokaNotificationCache {
    async fn get(&self, key: &NotificationCacheKey) -> Result<Option<CachedEntry>> {
        Ok(self.cache_for(key.kind()).get(key.subscriber_id()).await)
    }

    async fn put(&self, key: NotificationCacheKey, entry: CachedEntry) -> Result<()> {
        check_kind(&key, &entry)?;
        let kind = key.kind();
        let subscriber_id = match key {
            NotificationCacheKey::List(id)
            | NotificationCacheKey::UnreadCount(id)
            | NotificationCacheKey::Cooldown(id) => id,
        };
        self.cache_for(kind).insert(subscriber_id, entry).await;
        Ok(())
    }

    async fn invalidate(&self, key: &NotificationCacheKey) -> Result<()> {
        self.cache_for(key.kind())
            .invalidate(key.subscriber_id())
            .await;
        Ok(())
    }

    async fn invalidate_reads(&self, subscriber_id: &str) -> Result<()> {
        let _guard = self.read_guard.lock().await;
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        self.generations
            .insert(subscriber_id.to_string(), generation)
            .await;
        self.list_cache.invalidate(subscriber_id).await;
        self.unread_cache.invalidate(subscriber_id).await;
        Ok(())
    }

    async fn read_generation(&self, subscriber_id: &str) -> Result<u64> {
        Ok(self.current_generation(subscriber_id).await)
    }

    async fn put_if_current(
        &self,
        key: NotificationCacheKey,
        entry: CachedEntry,
        generation: u64,
    ) -> Result<bool> {
        check_kind(&key, &entry)?;
        let _guard = self.read_guard.lock().await;
        if self.current_generation(key.subscriber_id()).await != generation {
            debug!("Dropping stale cache write for {:?}", key);
            return Ok(false);
        }
        self.cache_for(key.kind())
            .insert(key.subscriber_id().to_string(), entry)
            .await;
        Ok(true)
    }
}

fn check_kind(key: &NotificationCacheKey, entry: &CachedEntry) -> Result<()> {
    if key.kind() != entry.kind() {
        return Err(Error::Cache(format!(
            "entry {:?} cannot be stored under key {:?}",
            entry.kind(),
            key
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn short_lived_cache() -> MokaNotificationCache {
        MokaNotificationCache::new(&NotificationPolicy::default().with_ttls(
            Duration::from_millis(50),
            Duration::from_secs(60),
            Duration::from_secs(60),
        ))
    }

    #[tokio::test]
    async fn test_keys_are_separated_by_kind() {
        let cache = MokaNotificationCache::default();
        cache
            .put(
                NotificationCacheKey::UnreadCount("s1".to_string()),
                CachedEntry::UnreadCount(3),
            )
            .await
            .unwrap();

        let list = cache
            .get(&NotificationCacheKey::List("s1".to_string()))
            .await
            .unwrap();
        assert!(list.is_none());

        let count = cache
            .get(&NotificationCacheKey::UnreadCount("s1".to_string()))
            .await
            .unwrap();
        assert_eq!(count, Some(CachedEntry::UnreadCount(3)));
    }

    #[tokio::test]
    async fn test_put_rejects_mismatched_entry() {
        let cache = MokaNotificationCache::default();
        let result = cache
            .put(
                NotificationCacheKey::List("s1".to_string()),
                CachedEntry::UnreadCount(1),
            )
            .await;
        assert!(matches!(result, Err(Error::Cache(_))));
    }

    #[tokio::test]
    async fn test_invalidate_reads_keeps_cooldown() {
        let cache = MokaNotificationCache::default();
        cache
            .put(
                NotificationCacheKey::List("s1".to_string()),
                CachedEntry::List(Arc::new(Vec::new())),
            )
            .await
            .unwrap();
        cache
            .put(
                NotificationCacheKey::UnreadCount("s1".to_string()),
                CachedEntry::UnreadCount(2),
            )
            .await
            .unwrap();
        cache
            .put(
                NotificationCacheKey::Cooldown("s1".to_string()),
                CachedEntry::Cooldown,
            )
            .await
            .unwrap();

        cache.invalidate_reads("s1").await.unwrap();

        for key in [
            NotificationCacheKey::List("s1".to_string()),
            NotificationCacheKey::UnreadCount("s1".to_string()),
        ] {
            assert!(cache.get(&key).await.unwrap().is_none());
        }
        let cooldown = cache
            .get(&NotificationCacheKey::Cooldown("s1".to_string()))
            .await
            .unwrap();
        assert_eq!(cooldown, Some(CachedEntry::Cooldown));
    }

    #[tokio::test]
    async fn test_put_if_current_skips_after_invalidation() {
        let cache = MokaNotificationCache::default();
        let key = NotificationCacheKey::UnreadCount("s1".to_string());

        let generation = cache.read_generation("s1").await.unwrap();
        cache.invalidate_reads("s1").await.unwrap();
        let stored = cache
            .put_if_current(key.clone(), CachedEntry::UnreadCount(4), generation)
            .await
            .unwrap();
        assert!(!stored);
        assert!(cache.get(&key).await.unwrap().is_none());

        let fresh = cache.read_generation("s1").await.unwrap();
        assert_ne!(fresh, generation);
        let stored = cache
            .put_if_current(key.clone(), CachedEntry::UnreadCount(3), fresh)
            .await
            .unwrap();
        assert!(stored);
        assert_eq!(cache.get(&key).await.unwrap(), Some(CachedEntry::UnreadCount(3)));
    }

    #[tokio::test]
    async fn test_generations_are_per_subscriber() {
        let cache = MokaNotificationCache::default();
        let generation = cache.read_generation("s2").await.unwrap();
        cache.invalidate_reads("s1").await.unwrap();

        let stored = cache
            .put_if_current(
                NotificationCacheKey::List("s2".to_string()),
                CachedEntry::List(Arc::new(Vec::new())),
                generation,
            )
            .await
            .unwrap();
        assert!(stored);
    }

    #[tokio::test]
    async fn test_entries_expire_after_ttl() {
        let cache = short_lived_cache();
        let key = NotificationCacheKey::List("s1".to_string());
        cache
            .put(key.clone(), CachedEntry::List(Arc::new(Vec::new())))
            .await
            .unwrap();
        assert!(cache.get(&key).await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(cache.get(&key).await.unwrap().is_none());
    }
}
