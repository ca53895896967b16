use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, warn};

use crate::deliveries::{
    sort_notifications, ApplicationTrackerTrait, DeliveryRepositoryTrait, MarkReadOutcome,
    NotificationItem,
};
use crate::enrollment::EnrollmentResolver;
use crate::errors::Result;
use crate::notifications::backfill::BackfillSynchronizer;
use crate::notifications::notification_cache::{
    CachedEntry, NotificationCache, NotificationCacheKey,
};
use crate::notifications::notifications_model::{NotificationPolicy, ReconcileOutcome};
use crate::notifications::notifications_traits::NotificationServiceTrait;
use crate::postings::PostingRepositoryTrait;

/// Serves a subscriber's notifications through the read cache, reconciling
/// late enrollments on every read.
pub struct NotificationService {
    backfill: BackfillSynchronizer,
    delivery_repository: Arc<dyn DeliveryRepositoryTrait>,
    application_tracker: Arc<dyn ApplicationTrackerTrait>,
    cache: Arc<dyn NotificationCache>,
}

impl NotificationService {
    pub fn new(
        resolver: Arc<EnrollmentResolver>,
        posting_repository: Arc<dyn PostingRepositoryTrait>,
        delivery_repository: Arc<dyn DeliveryRepositoryTrait>,
        application_tracker: Arc<dyn ApplicationTrackerTrait>,
        cache: Arc<dyn NotificationCache>,
        policy: &NotificationPolicy,
    ) -> Self {
        let backfill = BackfillSynchronizer::new(
            resolver,
            posting_repository,
            delivery_repository.clone(),
            cache.clone(),
            policy.lookback,
        );
        NotificationService {
            backfill,
            delivery_repository,
            application_tracker,
            cache,
        }
    }

    /// Reconciliation is best-effort: a failure is logged and the read goes on.
    async fn reconcile_before_read(&self, subscriber_id: &str) {
        if let Err(e) = self.backfill.reconcile(subscriber_id).await {
            warn!(
                "Reconciliation for subscriber {} failed, serving stored deliveries: {}",
                subscriber_id, e
            );
        }
    }

    async fn cached(&self, key: &NotificationCacheKey) -> Option<CachedEntry> {
        match self.cache.get(key).await {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Notification cache read failed for {:?}: {}", key, e);
                None
            }
        }
    }

    /// Read generation to store a freshly loaded value under, if the cache
    /// can hand one out.
    async fn generation(&self, subscriber_id: &str) -> Option<u64> {
        match self.cache.read_generation(subscriber_id).await {
            Ok(generation) => Some(generation),
            Err(e) => {
                warn!(
                    "Notification cache generation lookup failed for {}: {}",
                    subscriber_id, e
                );
                None
            }
        }
    }

    /// Caches a value loaded at `generation`; skipped when the subscriber's
    /// reads were invalidated while it was loading.
    async fn store(
        &self,
        key: NotificationCacheKey,
        entry: CachedEntry,
        generation: Option<u64>,
    ) {
        let Some(generation) = generation else {
            return;
        };
        match self.cache.put_if_current(key, entry, generation).await {
            Ok(true) => {}
            Ok(false) => debug!("Reads invalidated during load, result not cached"),
            Err(e) => warn!("Notification cache write failed: {}", e),
        }
    }

    fn load_notifications(&self, subscriber_id: &str) -> Result<Vec<NotificationItem>> {
        let rows = self
            .delivery_repository
            .list_active_for_subscriber(subscriber_id)?;
        let applied = self.application_tracker.applied_posting_ids(subscriber_id)?;
        let mut items: Vec<NotificationItem> = rows
            .into_iter()
            .map(|row| {
                let has_applied = applied.contains(&row.delivery.posting_id);
                NotificationItem::from_delivery(row, has_applied)
            })
            .collect();
        sort_notifications(&mut items);
        Ok(items)
    }
}

#[async_trait]
impl NotificationServiceTrait for NotificationService {
    async fn list_for_subscriber(&self, subscriber_id: &str) -> Result<Vec<NotificationItem>> {
        self.reconcile_before_read(subscriber_id).await;

        let key = NotificationCacheKey::List(subscriber_id.to_string());
        if let Some(CachedEntry::List(items)) = self.cached(&key).await {
            debug!("Notification list cache hit for {}", subscriber_id);
            return Ok(items.as_ref().clone());
        }

        let generation = self.generation(subscriber_id).await;
        let items = self.load_notifications(subscriber_id)?;
        self.store(key, CachedEntry::List(Arc::new(items.clone())), generation)
            .await;
        Ok(items)
    }

    async fn unread_count(&self, subscriber_id: &str) -> Result<i64> {
        self.reconcile_before_read(subscriber_id).await;

        let key = NotificationCacheKey::UnreadCount(subscriber_id.to_string());
        if let Some(CachedEntry::UnreadCount(count)) = self.cached(&key).await {
            debug!("Unread count cache hit for {}", subscriber_id);
            return Ok(count);
        }

        let generation = self.generation(subscriber_id).await;
        let count = self.delivery_repository.count_unread_active(subscriber_id)?;
        self.store(key, CachedEntry::UnreadCount(count), generation)
            .await;
        Ok(count)
    }

    async fn mark_read(&self, subscriber_id: &str, posting_id: &str) -> Result<MarkReadOutcome> {
        let outcome = self
            .delivery_repository
            .mark_read(subscriber_id, posting_id)
            .await?;

        if outcome != MarkReadOutcome::NotFound {
            self.cache.invalidate_reads(subscriber_id).await?;
        }
        Ok(outcome)
    }

    async fn reconcile(&self, subscriber_id: &str) -> Result<ReconcileOutcome> {
        self.backfill.reconcile(subscriber_id).await
    }
}
